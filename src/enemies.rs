//! Opponent archetypes and their decision policies.
//!
//! Every opponent turn is one call to `choose_action`: the policy draws a
//! uniform roll in [0,1), maps it into weighted bands of actions, executes
//! the chosen action against the target and narrates the result. Bosses
//! first check their phase threshold; the transition fires exactly once and
//! its side effects land before the action draw of the same turn.

use rand::Rng;

use crate::actor::{Actor, Gender};
use crate::effects::Effect;

/// Closed set of opponent policies, each carrying its own one-shot flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Archetype {
    /// Default policy: basic attack, plus a generic heavy-hit band in
    /// phase 2 when a threshold is set.
    Grunt,
    ForestSpirit,
    Kikimora,
    Ghoul,
    WaterSpirit { drown_used: bool },
    Nightingale { whistle_used: bool },
    BabaYaga,
    Leshy { roots_used: bool },
    KoscheiShadow { death_touch_used: bool },
}

#[derive(Debug, Clone)]
pub struct Opponent {
    pub actor: Actor,
    pub description: String,
    pub archetype: Archetype,
    /// Starts at 1; permanently becomes 2 after the threshold transition.
    pub phase: u32,
    /// One-shot latch for the phase transition.
    pub phase_changed: bool,
    /// Fraction of max HP below which phase 2 triggers. `None` for
    /// opponents without phases.
    pub phase_threshold: Option<f64>,
    /// Set for opponents whose defeat the story records.
    pub boss_id: Option<String>,
}

impl Opponent {
    pub fn new(
        actor: Actor,
        description: &str,
        archetype: Archetype,
        phase_threshold: Option<f64>,
        boss_id: Option<&str>,
    ) -> Self {
        Self {
            actor,
            description: description.to_string(),
            archetype,
            phase: 1,
            phase_changed: false,
            phase_threshold,
            boss_id: boss_id.map(str::to_string),
        }
    }

    /// A plain opponent with the default policy.
    pub fn grunt(name: &str, hp: u32, strength: u32, agility: u32, description: &str) -> Self {
        Self::new(
            Actor::new(name, hp, strength, agility, 5, Gender::Male),
            description,
            Archetype::Grunt,
            None,
            None,
        )
    }

    /// A boss with the default policy: basic attacks in phase 1, with the
    /// heavy-hit band unlocked once the threshold is crossed.
    pub fn boss(
        name: &str,
        hp: u32,
        strength: u32,
        agility: u32,
        description: &str,
        phase_threshold: f64,
        boss_id: &str,
    ) -> Self {
        Self::new(
            Actor::new(name, hp, strength, agility, 5, Gender::Male),
            description,
            Archetype::Grunt,
            Some(phase_threshold),
            Some(boss_id),
        )
    }

    pub fn forest_spirit() -> Self {
        Self::new(
            Actor::new("Forest Spirit", 35, 7, 15, 10, Gender::Male),
            "The wandering ghost of a lost traveller.",
            Archetype::ForestSpirit,
            None,
            Some("forest-spirit"),
        )
    }

    pub fn kikimora() -> Self {
        Self::new(
            Actor::new("Kikimora", 50, 10, 12, 8, Gender::Female),
            "A swamp fiend with needle-sharp claws.",
            Archetype::Kikimora,
            None,
            Some("kikimora"),
        )
    }

    pub fn ghoul() -> Self {
        Self::new(
            Actor::new("Ghoul", 70, 14, 8, 5, Gender::Male),
            "A restless corpse, thirsty for blood.",
            Archetype::Ghoul,
            None,
            Some("ghoul"),
        )
    }

    pub fn water_spirit() -> Self {
        Self::new(
            Actor::new("Water Spirit", 100, 15, 8, 15, Gender::Male),
            "Lord of the dark pool, ancient spirit of the river.",
            Archetype::WaterSpirit { drown_used: false },
            Some(0.4),
            Some("water-spirit"),
        )
    }

    pub fn nightingale() -> Self {
        Self::new(
            Actor::new("Nightingale the Robber", 90, 16, 15, 8, Gender::Male),
            "His whistle knocks warriors off their feet.",
            Archetype::Nightingale {
                whistle_used: false,
            },
            Some(0.5),
            Some("nightingale"),
        )
    }

    pub fn baba_yaga() -> Self {
        Self::new(
            Actor::new("Baba Yaga", 70, 10, 12, 20, Gender::Female),
            "Bone leg, iron teeth, and old, old cunning.",
            Archetype::BabaYaga,
            Some(0.3),
            Some("baba-yaga"),
        )
    }

    pub fn leshy() -> Self {
        Self::new(
            Actor::new("Leshy", 120, 18, 5, 18, Gender::Male),
            "Ancient spirit of the forest, keeper of the thicket.",
            Archetype::Leshy { roots_used: false },
            Some(0.4),
            Some("leshy"),
        )
    }

    pub fn koschei_shadow() -> Self {
        Self::new(
            Actor::new("Shadow of Koschei", 150, 18, 12, 15, Gender::Male),
            "The deathless tyrant's shadow, given form.",
            Archetype::KoscheiShadow {
                death_touch_used: false,
            },
            Some(0.5),
            Some("koschei-shadow"),
        )
    }

    /// Permanent strength gain on the phase transition.
    fn phase_strength_bonus(&self) -> u32 {
        match self.archetype {
            Archetype::Grunt => 3,
            Archetype::WaterSpirit { .. }
            | Archetype::Leshy { .. }
            | Archetype::KoscheiShadow { .. } => 5,
            _ => 0,
        }
    }

    fn phase_message(&self) -> String {
        let hp = format!("(HP: {}/{})", self.actor.hp, self.actor.max_hp);
        match self.archetype {
            Archetype::WaterSpirit { .. } => format!(
                "{} {} ROARS!\n\"You will drown in my pool!\"",
                self.actor.name, hp
            ),
            Archetype::Nightingale { .. } => format!(
                "{} {} DRAWS A DEEP BREATH!\n\"Now I'll deafen you!\"",
                self.actor.name, hp
            ),
            Archetype::BabaYaga => format!(
                "{} {} IS FURIOUS!\n\"I'll eat you whole, wretch!\"",
                self.actor.name, hp
            ),
            Archetype::Leshy { .. } => format!(
                "THE FOREST WAKES! {} {}\n\"You will never leave my thicket!\"",
                self.actor.name, hp
            ),
            Archetype::KoscheiShadow { .. } => format!(
                "THE SHADOW {} THICKENS!\n\"I am DEATHLESS!\"",
                hp
            ),
            _ => format!("{} {} flies into a rage!", self.actor.name, hp),
        }
    }

    /// Fires the phase transition once, before the action draw. Returns the
    /// one-time narration.
    fn check_phase_transition(&mut self) -> Option<String> {
        let threshold = self.phase_threshold?;
        if self.phase_changed {
            return None;
        }
        if (self.actor.hp as f64) < self.actor.max_hp as f64 * threshold {
            self.phase = 2;
            self.phase_changed = true;
            self.actor.strength += self.phase_strength_bonus();
            Some(self.phase_message())
        } else {
            None
        }
    }

    /// Selects and executes this opponent's action for the turn, mutating
    /// `target` and/or itself, and returns the narration.
    pub fn choose_action(&mut self, target: &mut Actor, rng: &mut impl Rng) -> String {
        let mut messages: Vec<String> = Vec::new();
        if let Some(msg) = self.check_phase_transition() {
            messages.push(msg);
        }

        let name = self.actor.name.clone();
        let roll = rng.gen::<f64>();

        match &mut self.archetype {
            Archetype::Grunt => {
                if self.phase == 2 && roll < 0.25 {
                    let damage = self.actor.strength + rng.gen_range(2..=6);
                    messages.push(format!("{name} lands a crushing blow!"));
                    messages.push(target.take_damage(damage, rng));
                } else {
                    messages.push(self.actor.attack(target, rng));
                }
            }
            Archetype::ForestSpirit => {
                if roll < 0.25 {
                    target.add_effect(Effect::freeze(1));
                    messages.push(format!(
                        "{name} lets out a ghastly wail! {} skips a turn!",
                        target.name
                    ));
                } else {
                    messages.push(self.actor.attack(target, rng));
                }
            }
            Archetype::Kikimora => {
                if roll < 0.2 {
                    target.add_effect(Effect::poison(2, 4));
                    messages.push(format!(
                        "{name} rakes with her claws! {} is poisoned!",
                        target.name
                    ));
                } else {
                    messages.push(self.actor.attack(target, rng));
                }
            }
            Archetype::Ghoul => {
                if roll < 0.25 {
                    let damage = 12 + rng.gen_range(0..=8);
                    messages.push(format!("{name} sinks his fangs in!"));
                    messages.push(target.take_damage(damage, rng));
                    let healed = (self.actor.max_hp - self.actor.hp).min(damage / 2);
                    if healed > 0 {
                        self.actor.hp += healed;
                        messages.push(format!("{name} recovers {healed} HP!"));
                    }
                } else {
                    messages.push(self.actor.attack(target, rng));
                }
            }
            Archetype::WaterSpirit { drown_used } => {
                if self.phase == 2 && !*drown_used && roll < 0.25 {
                    *drown_used = true;
                    let damage = 30 + rng.gen_range(0..=15);
                    messages.push(format!("{name} drags you to the bottom!"));
                    messages.push(target.take_damage(damage, rng));
                } else if roll < 0.4 {
                    let damage = self.actor.strength + rng.gen_range(3..=8);
                    messages.push(format!("{name} lashes out with a whip of water!"));
                    messages.push(target.take_damage(damage, rng));
                } else if roll < 0.55 {
                    messages.push(format!("{name} calls up the cold of the depths!"));
                    target.add_effect(Effect::freeze(1));
                    messages.push(format!("{} is locked in ice!", target.name));
                } else {
                    messages.push(self.actor.attack(target, rng));
                }
            }
            Archetype::Nightingale { whistle_used } => {
                if self.phase == 2 && !*whistle_used && roll < 0.3 {
                    *whistle_used = true;
                    let damage = 35 + rng.gen_range(0..=10);
                    messages.push(format!("{name}: THE DEADLY WHISTLE!"));
                    messages.push(target.take_damage(damage, rng));
                } else if roll < 0.45 {
                    let damage = self.actor.strength + rng.gen_range(0..=8);
                    messages.push(format!("{name} whistles!"));
                    messages.push(target.take_damage(damage, rng));
                    if rng.gen::<f64>() < 0.25 {
                        target.add_effect(Effect::freeze(1));
                        messages.push(format!("{} is stunned!", target.name));
                    }
                } else {
                    messages.push(format!("{name} swings his club!"));
                    messages.push(self.actor.attack(target, rng));
                }
            }
            Archetype::BabaYaga => {
                if roll < 0.25 {
                    messages.push(format!("{name} mutters a curse!"));
                    target.add_effect(Effect::poison(3, 5));
                    messages.push(format!(
                        "{} shudders — {} is cursed!",
                        target.name,
                        target.gender.pronoun()
                    ));
                } else if roll < 0.45 {
                    let damage = self.actor.intellect + rng.gen_range(3..=10);
                    messages.push(format!("{name} hurls a ball of fire!"));
                    messages.push(target.take_damage(damage, rng));
                    if rng.gen::<f64>() < 0.2 {
                        target.add_effect(Effect::burn(2, 4));
                        messages.push(format!("{} is burning!", target.name));
                    }
                } else if self.phase == 2 && roll < 0.6 {
                    messages.push(format!("{name}: \"Become a frog!\""));
                    target.add_effect(Effect::freeze(1));
                } else {
                    messages.push(format!("{name} strikes with her broom!"));
                    messages.push(self.actor.attack(target, rng));
                }
            }
            Archetype::Leshy { roots_used } => {
                if self.phase == 2 && !*roots_used && roll < 0.25 {
                    *roots_used = true;
                    let damage = 25 + rng.gen_range(0..=10);
                    messages.push("Roots burst out of the earth!".to_string());
                    messages.push(target.take_damage(damage, rng));
                    target.add_effect(Effect::freeze(1));
                    messages.push(format!("{} is tangled in roots!", target.name));
                } else if roll < 0.4 {
                    let damage = 12 + rng.gen_range(3..=10);
                    messages.push(format!("{name} calls the beasts of the wood!"));
                    messages.push(target.take_damage(damage, rng));
                } else if roll < 0.55 {
                    messages.push(format!("{name} breathes out a spore haze!"));
                    target.add_effect(Effect::poison(2, 6));
                    messages.push(format!("{} is dazed by the fumes!", target.name));
                } else {
                    messages.push(format!("{name} swings a gnarled root!"));
                    messages.push(self.actor.attack(target, rng));
                }
            }
            Archetype::KoscheiShadow { death_touch_used } => {
                if !*death_touch_used && roll < 0.15 {
                    *death_touch_used = true;
                    let damage = 35 + rng.gen_range(0..=15);
                    messages.push(format!("{name}: THE TOUCH OF DEATH!"));
                    messages.push(target.take_damage(damage, rng));
                } else if roll < 0.3 {
                    let damage = self.actor.strength + 8 + rng.gen_range(0..=8);
                    messages.push(format!("{name} conjures a whirlwind of darkness!"));
                    messages.push(target.take_damage(damage, rng));
                } else if roll < 0.45 {
                    messages.push(format!("{name}: \"Be cursed, mortal!\""));
                    target.add_effect(Effect::poison(3, 6));
                    messages.push(format!(
                        "{} staggers — {} is cursed!",
                        target.name,
                        target.gender.pronoun()
                    ));
                } else if self.phase == 2 && roll < 0.6 {
                    let damage = 20 + rng.gen_range(0..=8);
                    messages.push(format!("{name} drinks your life!"));
                    messages.push(target.take_damage(damage, rng));
                    let healed = (self.actor.max_hp - self.actor.hp).min(damage / 3);
                    if healed > 0 {
                        self.actor.hp += healed;
                        messages.push(format!(
                            "{name} recovers {healed} HP! (HP: {}/{})",
                            self.actor.hp, self.actor.max_hp
                        ));
                    }
                } else {
                    messages.push(format!("{name} strikes with a blade of shadow!"));
                    messages.push(self.actor.attack(target, rng));
                }
            }
        }

        messages.join("\n")
    }
}
