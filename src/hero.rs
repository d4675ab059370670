//! Player archetypes.
//!
//! Each archetype is a variant of a closed enum carrying only its own extra
//! state (shared ability counter, mana pool, per-spell flags). The battle
//! loop never matches on the archetype; it goes through `Hero`'s uniform
//! attack/ability/item surface.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, Gender};
use crate::constants::{FOOL_ABILITY_USES, MAGIC_ATTACK_COST, POST_COMBAT_RESTORE_DIVISOR,
    SERVANT_ABILITY_USES};
use crate::content;
use crate::effects::Effect;
use crate::error::ActionError;
use crate::items::{Item, ItemKind};

/// Stable class identifier, used by snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassId {
    Fool,
    Sorceress,
    Servant,
}

/// Secondary resource pool for the mana archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    pub mp: u32,
    pub max_mp: u32,
}

impl ManaPool {
    pub fn new(max_mp: u32) -> Self {
        Self { mp: max_mp, max_mp }
    }

    /// Spends `cost` MP if available. Returns false without mutating when
    /// the pool is short.
    pub fn spend(&mut self, cost: u32) -> bool {
        if self.mp >= cost {
            self.mp -= cost;
            true
        } else {
            false
        }
    }

    /// Restores up to `amount` MP, capped at the pool maximum. Returns the
    /// amount actually restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let restored = (self.max_mp - self.mp).min(amount);
        self.mp += restored;
        restored
    }
}

/// Archetype-specific state. One instance per hero.
#[derive(Debug, Clone)]
pub enum HeroClass {
    /// Lucky simpleton: shared ability counter, critical hits.
    Fool { ability_uses: u32 },
    /// Mana caster: resource-gated magic attack, per-spell one-shot flags.
    Sorceress { mana: ManaPool, spells_used: [bool; 3] },
    /// Rogue: shared ability counter, sneak attacks.
    Servant { ability_uses: u32 },
}

/// One entry of a class's fixed ability list.
#[derive(Debug, Clone, Copy)]
pub struct AbilitySpec {
    pub name: &'static str,
    pub description: &'static str,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct Hero {
    pub actor: Actor,
    pub class: HeroClass,
}

impl Hero {
    /// Ivan the Fool: luck over brains.
    pub fn new_fool() -> Self {
        let mut actor = Actor::new("Ivan the Fool", 120, 14, 18, 5, Gender::Male);
        actor.inventory.push(
            Item::new(
                "Loaf of bread",
                "Mother gave it for the road. Eat it, or give it away.",
                ItemKind::Quest,
            )
            .with_hp_restore(40)
            .not_usable(),
        );
        Self {
            actor,
            class: HeroClass::Fool { ability_uses: 0 },
        }
    }

    /// Vasilisa the Wise: magic in her blood.
    pub fn new_sorceress() -> Self {
        let mut actor = Actor::new("Vasilisa the Wise", 100, 10, 12, 25, Gender::Female);
        actor.inventory.push(
            Item::new("Mana potion", "Restores 30 MP.", ItemKind::Mana).with_mp_restore(30),
        );
        if let Some(mirror) = content::artifact("truth-mirror") {
            actor.add_artifact(mirror);
        }
        Self {
            actor,
            class: HeroClass::Sorceress {
                mana: ManaPool::new(80),
                spells_used: [false; 3],
            },
        }
    }

    /// Koschei's former servant: cunning and dark knowledge.
    pub fn new_servant() -> Self {
        let mut actor = Actor::new("Koschei's Servant", 110, 18, 15, 12, Gender::Male);
        actor.inventory.push(
            Item::new(
                "Venom vial",
                "A poisoned blade's worth in one throw. 35 damage.",
                ItemKind::Damage,
            )
            .with_damage(35),
        );
        if let Some(ring) = content::artifact("koschei-ring") {
            actor.add_artifact(ring);
        }
        Self {
            actor,
            class: HeroClass::Servant { ability_uses: 0 },
        }
    }

    pub fn class_id(&self) -> ClassId {
        match self.class {
            HeroClass::Fool { .. } => ClassId::Fool,
            HeroClass::Sorceress { .. } => ClassId::Sorceress,
            HeroClass::Servant { .. } => ClassId::Servant,
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self.class {
            HeroClass::Fool { .. } => "Fool",
            HeroClass::Sorceress { .. } => "Sorceress",
            HeroClass::Servant { .. } => "Servant",
        }
    }

    /// The secondary resource pool, present only for mana archetypes.
    /// Consumers check presence explicitly instead of probing fields.
    pub fn mana(&self) -> Option<&ManaPool> {
        match &self.class {
            HeroClass::Sorceress { mana, .. } => Some(mana),
            _ => None,
        }
    }

    pub fn mana_mut(&mut self) -> Option<&mut ManaPool> {
        match &mut self.class {
            HeroClass::Sorceress { mana, .. } => Some(mana),
            _ => None,
        }
    }

    /// The class's fixed ability list with current availability.
    pub fn abilities(&self) -> Vec<AbilitySpec> {
        match &self.class {
            HeroClass::Fool { ability_uses } => {
                let available = *ability_uses < FOOL_ABILITY_USES;
                vec![
                    AbilitySpec {
                        name: "Fool's Luck",
                        description: "Improbable luck: a heavy blow, or healing",
                        available,
                    },
                    AbilitySpec {
                        name: "Kind Smile",
                        description: "Disarms the enemy for 1 round",
                        available,
                    },
                    AbilitySpec {
                        name: "Come What May",
                        description: "A random powerful outcome",
                        available,
                    },
                ]
            }
            HeroClass::Sorceress { spells_used, .. } => vec![
                AbilitySpec {
                    name: "Guiding Light",
                    description: "Damage, strong healing, regeneration",
                    available: !spells_used[0],
                },
                AbilitySpec {
                    name: "Silent Step",
                    description: "Agility +40 (nearly impossible to hit)",
                    available: !spells_used[1],
                },
                AbilitySpec {
                    name: "Seer's Gaze",
                    description: "Heavy damage and 2 rounds of freeze",
                    available: !spells_used[2],
                },
            ],
            HeroClass::Servant { ability_uses } => {
                let available = *ability_uses < SERVANT_ABILITY_USES;
                vec![
                    AbilitySpec {
                        name: "Backstab",
                        description: "Massive damage plus poison",
                        available,
                    },
                    AbilitySpec {
                        name: "Dark Knowledge",
                        description: "Weakens the enemy (-10 strength)",
                        available,
                    },
                ]
            }
        }
    }

    pub fn can_use_ability(&self) -> bool {
        self.abilities().iter().any(|a| a.available)
    }

    /// Remaining/total display, e.g. `2/3`.
    pub fn ability_status(&self) -> String {
        match &self.class {
            HeroClass::Fool { ability_uses } => {
                format!("{}/{}", FOOL_ABILITY_USES - ability_uses, FOOL_ABILITY_USES)
            }
            HeroClass::Sorceress { spells_used, .. } => {
                let remaining = spells_used.iter().filter(|used| !**used).count();
                format!("{}/{}", remaining, spells_used.len())
            }
            HeroClass::Servant { ability_uses } => format!(
                "{}/{}",
                SERVANT_ABILITY_USES - ability_uses,
                SERVANT_ABILITY_USES
            ),
        }
    }

    /// Activates an ability by index into the class list. Rejections leave
    /// the budget untouched; the turn is re-solicited by the caller.
    pub fn use_ability(
        &mut self,
        index: usize,
        target: &mut Actor,
        rng: &mut impl Rng,
    ) -> Result<String, ActionError> {
        let abilities = self.abilities();
        let spec = abilities.get(index).ok_or(ActionError::InvalidAbility)?;
        if !spec.available {
            return Err(ActionError::AbilityExhausted);
        }

        // Spend the budget only once the selection is valid.
        match &mut self.class {
            HeroClass::Fool { ability_uses } | HeroClass::Servant { ability_uses } => {
                *ability_uses += 1;
            }
            HeroClass::Sorceress { spells_used, .. } => {
                spells_used[index] = true;
            }
        }

        match self.class_id() {
            ClassId::Fool => Ok(self.fool_ability(index, target, rng)),
            ClassId::Sorceress => Ok(self.sorceress_spell(index, target, rng)),
            ClassId::Servant => Ok(self.servant_ability(index, target, rng)),
        }
    }

    fn fool_ability(&mut self, index: usize, target: &mut Actor, rng: &mut impl Rng) -> String {
        match index {
            0 => {
                let mut messages = vec!["FOOL'S LUCK!".to_string()];
                if rng.gen::<f64>() < 0.5 {
                    let damage = self.actor.strength * 3 + rng.gen_range(10..=25);
                    messages.push("\"Here goes nothing!\"".to_string());
                    messages.push(target.take_damage(damage, rng));
                } else {
                    let heal = rng.gen_range(40..=70);
                    messages.push(format!("Luck smiles on him! {}", self.actor.heal(heal)));
                }
                messages.join("\n")
            }
            1 => {
                let mut messages = vec!["KIND SMILE!".to_string()];
                target.add_effect(Effect::freeze(1));
                messages.push(format!(
                    "{} is disarmed by sheer kindness and skips a turn!",
                    target.name
                ));
                messages.join("\n")
            }
            _ => {
                let mut messages = vec!["COME WHAT MAY!".to_string()];
                let roll = rng.gen::<f64>();
                if roll < 0.33 {
                    let damage = self.actor.strength * 4;
                    messages.push(target.take_damage(damage, rng));
                } else if roll < 0.66 {
                    self.actor.hp = self.actor.max_hp;
                    messages.push(format!(
                        "A full recovery! HP: {}/{}",
                        self.actor.hp, self.actor.max_hp
                    ));
                } else {
                    self.actor.add_effect(Effect::strength_buff(3, 10));
                    messages.push("Strength +10 for 3 rounds!".to_string());
                }
                messages.join("\n")
            }
        }
    }

    fn sorceress_spell(&mut self, index: usize, target: &mut Actor, rng: &mut impl Rng) -> String {
        match index {
            0 => {
                let mut messages = vec!["GUIDING LIGHT!".to_string()];
                let damage = self.actor.intellect * 2;
                messages.push(target.take_damage(damage, rng));
                let heal = self.actor.intellect * 2;
                messages.push(self.actor.heal(heal));
                self.actor.add_effect(Effect::regen(3, 15));
                messages.push("Regeneration for 3 rounds!".to_string());
                messages.join("\n")
            }
            1 => {
                let mut messages = vec!["SILENT STEP!".to_string()];
                self.actor.agility = (self.actor.agility + 40).min(100);
                messages.push("She fades from sight. Agility +40, permanently.".to_string());
                messages.join("\n")
            }
            _ => {
                let mut messages = vec!["SEER'S GAZE!".to_string()];
                let damage = self.actor.intellect * 3;
                messages.push(target.take_damage(damage, rng));
                target.add_effect(Effect::freeze(2));
                messages.push(format!("{} is frozen for 2 rounds!", target.name));
                messages.join("\n")
            }
        }
    }

    fn servant_ability(&mut self, index: usize, target: &mut Actor, rng: &mut impl Rng) -> String {
        match index {
            0 => {
                let mut messages = vec!["BACKSTAB!".to_string()];
                let damage = self.actor.strength * 3 + rng.gen_range(15..=30);
                messages.push("\"Koschei taught me a thing or two...\"".to_string());
                messages.push(target.take_damage(damage, rng));
                target.add_effect(Effect::poison(3, 10));
                messages.push(format!("{} is poisoned!", target.name));
                messages.join("\n")
            }
            _ => {
                let mut messages = vec!["DARK KNOWLEDGE!".to_string()];
                target.strength = target.strength.saturating_sub(10).max(1);
                messages.push("\"I know your weaknesses...\"".to_string());
                messages.push(format!("{}'s strength drops by 10!", target.name));
                messages.join("\n")
            }
        }
    }

    /// Class-specific attack. Critical and magic hits bypass the dodge roll;
    /// the plain fallback goes through the normal attack path.
    pub fn attack(&mut self, target: &mut Actor, rng: &mut impl Rng) -> String {
        match &mut self.class {
            HeroClass::Fool { .. } => {
                if rng.gen::<f64>() < 0.25 {
                    let damage = self.actor.strength * 2 + rng.gen_range(5..=10);
                    target.hp = target.hp.saturating_sub(damage);
                    format!(
                        "CRIT! {} deals {} damage to {}! (HP: {}/{})",
                        self.actor.name, damage, target.name, target.hp, target.max_hp
                    )
                } else {
                    self.actor.attack(target, rng)
                }
            }
            HeroClass::Sorceress { mana, .. } => {
                if mana.spend(MAGIC_ATTACK_COST) {
                    let damage = self.actor.intellect + rng.gen_range(8..=18);
                    target.hp = target.hp.saturating_sub(damage);
                    format!(
                        "Magic bolt! {} damage to {} (HP: {}/{}, MP: {}/{})",
                        damage, target.name, target.hp, target.max_hp, mana.mp, mana.max_mp
                    )
                } else {
                    let damage = self.actor.strength + rng.gen_range(0..=3);
                    target.hp = target.hp.saturating_sub(damage);
                    format!(
                        "Staff strike: {} damage to {} (mana exhausted!)",
                        damage, target.name
                    )
                }
            }
            HeroClass::Servant { .. } => {
                if rng.gen::<f64>() < 0.30 {
                    let damage = self.actor.strength * 2 + rng.gen_range(5..=15);
                    target.hp = target.hp.saturating_sub(damage);
                    format!(
                        "STRIKE FROM THE SHADOWS! {} damage to {}! (HP: {}/{})",
                        damage, target.name, target.hp, target.max_hp
                    )
                } else {
                    self.actor.attack(target, rng)
                }
            }
        }
    }

    /// Item use with the hero's mana layered on top of the actor-level
    /// mechanics.
    pub fn use_item(
        &mut self,
        index: usize,
        target: Option<&mut Actor>,
    ) -> Result<String, ActionError> {
        let mp_restore = self
            .actor
            .inventory
            .get(index)
            .ok_or(ActionError::InvalidItem)?
            .mp_restore;
        let mut msg = self.actor.use_item(index, target)?;
        if mp_restore > 0 {
            if let Some(mana) = self.mana_mut() {
                let restored = mana.restore(mp_restore);
                let (mp, max_mp) = (mana.mp, mana.max_mp);
                msg.push_str(&format!("\nRestored {restored} MP (MP: {mp}/{max_mp})"));
            }
        }
        Ok(msg)
    }

    /// Post-victory recovery: a quarter of missing HP, and a quarter of
    /// missing MP for mana archetypes.
    pub fn restore_after_combat(&mut self) -> String {
        let heal = (self.actor.max_hp - self.actor.hp) / POST_COMBAT_RESTORE_DIVISOR;
        let mut lines = vec![format!("Victory's respite: {}", self.actor.heal(heal))];
        if let Some(mana) = self.mana_mut() {
            let amount = (mana.max_mp - mana.mp) / POST_COMBAT_RESTORE_DIVISOR;
            let restored = mana.restore(amount);
            lines.push(format!(
                "Restored {} MP (MP: {}/{})",
                restored, mana.mp, mana.max_mp
            ));
        }
        lines.join("\n")
    }
}
