//! The shared combat base for heroes and opponents.
//!
//! An actor owns its vitals, its active effects, its inventory and its
//! artifacts, and exposes the primitive combat operations. Every mutation
//! keeps `hp` in `[0, max_hp]`; an actor at 0 HP is dead and performs no
//! further actions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{ATTACK_SPREAD_MAX, ATTACK_SPREAD_MIN, MIN_DAMAGE};
use crate::effects::{Effect, EffectKind};
use crate::error::ActionError;
use crate::items::{Artifact, Item};

/// Affects narrated grammar only, never mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn pronoun(&self) -> &'static str {
        match self {
            Gender::Male => "he",
            Gender::Female => "she",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub name: String,
    pub gender: Gender,
    pub hp: u32,
    pub max_hp: u32,
    /// Current strength, including any active buffs or debuffs.
    pub strength: u32,
    /// Undoctored baseline, kept so buffs can be sanity-checked and reverted.
    pub base_strength: u32,
    /// 0-100. Doubles as dodge chance and flee chance input.
    pub agility: u32,
    pub intellect: u32,
    /// Active effects in attachment order, at most one per kind.
    pub effects: Vec<Effect>,
    /// Insertion order preserved for display.
    pub inventory: Vec<Item>,
    /// Unique by id.
    pub artifacts: Vec<Artifact>,
}

impl Actor {
    pub fn new(
        name: &str,
        hp: u32,
        strength: u32,
        agility: u32,
        intellect: u32,
        gender: Gender,
    ) -> Self {
        Self {
            name: name.to_string(),
            gender,
            hp,
            max_hp: hp,
            strength,
            base_strength: strength,
            agility,
            intellect,
            effects: Vec::new(),
            inventory: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// False while dead or under any active disabling (freeze-kind) effect.
    pub fn can_act(&self) -> bool {
        if !self.is_alive() {
            return false;
        }
        !self
            .effects
            .iter()
            .any(|e| matches!(e.kind, EffectKind::Freeze) && e.is_active())
    }

    /// Attaches an effect, replacing any existing instance of the same kind.
    /// The old instance's remaining duration is discarded, but a stat delta
    /// it already applied is reverted so the delta never leaks.
    pub fn add_effect(&mut self, effect: Effect) -> String {
        if let Some(pos) = self
            .effects
            .iter()
            .position(|e| e.kind.same_kind(&effect.kind))
        {
            let mut old = self.effects.remove(pos);
            old.revert(self);
        }
        let msg = format!(
            "{} is affected by {} for {} rounds!",
            self.name,
            effect.kind.name(),
            effect.duration
        );
        self.effects.push(effect);
        msg
    }

    /// Round-start pass: ticks every active effect in attachment order.
    /// A dead actor is no longer a target: once a tick brings HP to 0 the
    /// remaining effects in the pass do not fire.
    pub fn process_effects(&mut self) -> Vec<String> {
        let mut effects = std::mem::take(&mut self.effects);
        let mut messages = Vec::new();
        for effect in &mut effects {
            if !self.is_alive() {
                break;
            }
            let msg = effect.tick(self);
            if !msg.is_empty() {
                messages.push(msg);
            }
        }
        self.effects = effects;
        messages
    }

    /// Round-end pass: decrements every effect, reports expirations, and
    /// drops effects that are no longer active.
    pub fn end_round_effects(&mut self) -> Vec<String> {
        let mut effects = std::mem::take(&mut self.effects);
        let mut messages = Vec::new();
        for effect in &mut effects {
            let msg = effect.end_round(self);
            if !msg.is_empty() {
                messages.push(msg);
            }
        }
        effects.retain(|e| e.is_active());
        self.effects = effects;
        messages
    }

    /// Takes a hit. With probability `agility`% the attack is evaded;
    /// otherwise damage is clamped to at least 1 and subtracted, floored
    /// at 0 HP.
    pub fn take_damage(&mut self, damage: u32, rng: &mut impl Rng) -> String {
        if rng.gen_range(1..=100) <= self.agility {
            return format!("{} dodges the attack!", self.name);
        }
        let actual = damage.max(MIN_DAMAGE);
        self.hp = self.hp.saturating_sub(actual);
        format!(
            "{} takes {} damage (HP: {}/{})",
            self.name, actual, self.hp, self.max_hp
        )
    }

    pub fn heal(&mut self, amount: u32) -> String {
        let healed = (self.max_hp - self.hp).min(amount);
        self.hp += healed;
        format!(
            "{} recovers {} HP (HP: {}/{})",
            self.name, healed, self.hp, self.max_hp
        )
    }

    /// Basic attack: strength plus a small uniform spread, delivered through
    /// the target's `take_damage` (so it can be dodged).
    pub fn attack(&self, target: &mut Actor, rng: &mut impl Rng) -> String {
        let spread = rng.gen_range(ATTACK_SPREAD_MIN..=ATTACK_SPREAD_MAX);
        let damage = (self.strength as i32 + spread).max(MIN_DAMAGE as i32) as u32;
        target.take_damage(damage, rng)
    }

    pub fn add_item(&mut self, item: Item) -> String {
        let summary = item.effect_summary();
        let suffix = if summary.is_empty() {
            String::new()
        } else {
            format!(" ({summary})")
        };
        let msg = format!("Obtained: {}{}", item.name, suffix);
        self.inventory.push(item);
        msg
    }

    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        if index < self.inventory.len() {
            Some(self.inventory.remove(index))
        } else {
            None
        }
    }

    /// Finds the first inventory item whose name contains `fragment`
    /// (case-insensitive).
    pub fn find_item(&self, fragment: &str) -> Option<usize> {
        let needle = fragment.to_lowercase();
        self.inventory
            .iter()
            .position(|item| item.name.to_lowercase().contains(&needle))
    }

    /// Inventory indices of items usable right now, in display order.
    pub fn usable_items(&self) -> Vec<usize> {
        self.inventory
            .iter()
            .enumerate()
            .filter(|(_, item)| item.can_use())
            .map(|(i, _)| i)
            .collect()
    }

    /// Activates an inventory item: restores HP to the user, deals flat
    /// damage to `target` when the item carries damage, and consumes the
    /// item if it is consumable. MP restoration is layered on by the hero
    /// wrapper, since only mana-pool archetypes carry MP.
    pub fn use_item(
        &mut self,
        index: usize,
        mut target: Option<&mut Actor>,
    ) -> Result<String, ActionError> {
        let item = self.inventory.get(index).ok_or(ActionError::InvalidItem)?;
        if !item.can_use() {
            return Err(ActionError::ItemNotUsable);
        }
        let item = item.clone();

        let mut messages = Vec::new();
        if item.hp_restore > 0 {
            let healed = (self.max_hp - self.hp).min(item.hp_restore);
            self.hp += healed;
            messages.push(format!(
                "{} uses {}: +{} HP (HP: {}/{})",
                self.name, item.name, healed, self.hp, self.max_hp
            ));
        }
        if item.damage > 0 {
            if let Some(target) = target.as_deref_mut() {
                target.hp = target.hp.saturating_sub(item.damage);
                messages.push(format!(
                    "{}: {} damage to {}! (HP: {}/{})",
                    item.name, item.damage, target.name, target.hp, target.max_hp
                ));
            }
        }

        if item.consumable {
            self.inventory.remove(index);
        }

        if messages.is_empty() {
            Ok(format!("{} uses {}...", self.name, item.name))
        } else {
            Ok(messages.join("\n"))
        }
    }

    /// Grants an artifact by value; duplicates (by id) are ignored.
    pub fn add_artifact(&mut self, artifact: Artifact) -> String {
        if self.has_artifact(&artifact.id) {
            return String::new();
        }
        let msg = format!("Artifact obtained: {}\n{}", artifact.name, artifact.description);
        self.artifacts.push(artifact);
        msg
    }

    pub fn has_artifact(&self, id: &str) -> bool {
        self.artifacts.iter().any(|a| a.id == id)
    }

    /// How many of the three treasure keys this actor carries.
    pub fn key_count(&self) -> usize {
        ["golden-key", "silver-key", "bone-key"]
            .iter()
            .filter(|id| self.has_artifact(id))
            .count()
    }

    /// One-line status with active effect labels, used for round headers.
    pub fn status_line(&self) -> String {
        let mut line = format!("{}: HP {}/{}", self.name, self.hp, self.max_hp);
        if !self.effects.is_empty() {
            let labels: Vec<String> = self.effects.iter().map(|e| e.label()).collect();
            line.push_str(&format!(" [{}]", labels.join(", ")));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn hero_actor() -> Actor {
        // agility 0 so damage always lands in deterministic tests
        Actor::new("Ivan", 100, 14, 0, 5, Gender::Male)
    }

    #[test]
    fn test_take_damage_clamps_and_floors() {
        let mut actor = hero_actor();
        let mut rng = rng();

        actor.take_damage(0, &mut rng);
        assert_eq!(actor.hp, 99, "zero damage is clamped up to 1");

        actor.take_damage(500, &mut rng);
        assert_eq!(actor.hp, 0, "hp floors at zero");
        assert!(!actor.is_alive());
    }

    #[test]
    fn test_hp_stays_in_range_after_any_damage() {
        let mut rng = rng();
        for damage in [0u32, 1, 7, 99, 100, 101, 10_000] {
            let mut actor = hero_actor();
            actor.take_damage(damage, &mut rng);
            assert!(actor.hp <= actor.max_hp);
        }
    }

    #[test]
    fn test_full_agility_always_dodges() {
        let mut actor = hero_actor();
        actor.agility = 100;
        let mut rng = rng();
        for _ in 0..50 {
            let msg = actor.take_damage(20, &mut rng);
            assert!(msg.contains("dodges"));
        }
        assert_eq!(actor.hp, 100);
    }

    #[test]
    fn test_dodge_rate_converges_to_agility() {
        let mut actor = hero_actor();
        actor.agility = 50;
        actor.max_hp = u32::MAX;
        actor.hp = u32::MAX;
        let mut rng = rng();
        let trials = 10_000;
        let mut dodges = 0;
        for _ in 0..trials {
            if actor.take_damage(1, &mut rng).contains("dodges") {
                dodges += 1;
            }
        }
        let rate = dodges as f64 / trials as f64;
        assert!((rate - 0.5).abs() < 0.03, "observed dodge rate {rate}");
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut actor = hero_actor();
        actor.hp = 90;
        let msg = actor.heal(40);
        assert_eq!(actor.hp, 100);
        assert!(msg.contains("recovers 10 HP"));
    }

    #[test]
    fn test_can_act_under_freeze_and_death() {
        let mut actor = hero_actor();
        assert!(actor.can_act());

        actor.add_effect(Effect::freeze(1));
        assert!(!actor.can_act());

        actor.effects.clear();
        actor.hp = 0;
        assert!(!actor.can_act());
    }

    #[test]
    fn test_add_effect_replaces_same_kind() {
        let mut actor = hero_actor();
        actor.add_effect(Effect::poison(3, 5));
        actor.add_effect(Effect::burn(2, 8));
        actor.add_effect(Effect::poison(1, 9));

        assert_eq!(actor.effects.len(), 2);
        let poison = actor
            .effects
            .iter()
            .find(|e| matches!(e.kind, EffectKind::Poison { .. }))
            .unwrap();
        assert_eq!(poison.duration, 1, "old progress discarded");
        assert_eq!(poison.kind, EffectKind::Poison { damage: 9 });
    }

    #[test]
    fn test_replacing_applied_buff_reverts_delta_once() {
        let mut actor = hero_actor();
        let base = actor.strength;
        actor.add_effect(Effect::strength_buff(3, 10));
        actor.process_effects(); // suppressed tick
        actor.process_effects(); // delta applied
        assert_eq!(actor.strength, base + 10);

        // Replacement discards the old buff but must revert its delta first
        actor.add_effect(Effect::strength_buff(3, 5));
        assert_eq!(actor.strength, base);

        actor.process_effects();
        actor.process_effects();
        assert_eq!(actor.strength, base + 5);

        for _ in 0..3 {
            actor.end_round_effects();
        }
        assert_eq!(actor.strength, base);
        assert!(actor.effects.is_empty());
    }

    #[test]
    fn test_effect_ticks_run_in_attachment_order() {
        let mut actor = hero_actor();
        actor.add_effect(Effect::poison(3, 5));
        actor.add_effect(Effect::burn(3, 8));
        actor.process_effects(); // both suppressed
        let messages = actor.process_effects();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("poison"));
        assert!(messages[1].contains("fire"));
    }

    #[test]
    fn test_effects_stop_ticking_once_the_actor_falls() {
        let mut actor = hero_actor();
        actor.add_effect(Effect::poison(3, 5));
        actor.add_effect(Effect::burn(3, 8));
        actor.process_effects(); // both suppressed

        actor.hp = 4; // the poison tick is lethal
        let messages = actor.process_effects();
        assert_eq!(actor.hp, 0);
        assert_eq!(messages.len(), 1, "the burn never fires against the fallen");
        assert!(messages[0].contains("poison"));
    }

    #[test]
    fn test_end_round_removes_expired_effects() {
        let mut actor = hero_actor();
        actor.add_effect(Effect::freeze(1));
        actor.add_effect(Effect::poison(2, 5));

        let messages = actor.end_round_effects();
        assert_eq!(messages.len(), 1, "only the freeze expires this round");
        assert_eq!(actor.effects.len(), 1);
        assert!(matches!(actor.effects[0].kind, EffectKind::Poison { .. }));
    }

    #[test]
    fn test_use_item_heals_exact_clamped_amount() {
        let mut actor = hero_actor();
        actor.hp = 90;
        actor.add_item(
            Item::new("Healing draught", "Herbal.", ItemKind::Heal).with_hp_restore(40),
        );

        let msg = actor.use_item(0, None).unwrap();
        assert!(msg.contains("+10 HP"));
        assert_eq!(actor.hp, 100);
        assert!(actor.inventory.is_empty(), "consumable removed after use");
    }

    #[test]
    fn test_use_item_damage_targets_opponent() {
        let mut actor = hero_actor();
        let mut foe = Actor::new("Ghoul", 70, 14, 0, 5, Gender::Male);
        actor.add_item(
            Item::new("Venom vial", "Koschei's own.", ItemKind::Damage).with_damage(35),
        );

        let msg = actor.use_item(0, Some(&mut foe)).unwrap();
        assert!(msg.contains("35 damage"));
        assert_eq!(foe.hp, 35);
    }

    #[test]
    fn test_use_item_rejections() {
        let mut actor = hero_actor();
        assert_eq!(
            actor.use_item(0, None),
            Err(ActionError::InvalidItem)
        );

        actor.add_item(
            Item::new("Loaf of bread", "From mother.", ItemKind::Quest)
                .with_hp_restore(40)
                .not_usable(),
        );
        assert_eq!(
            actor.use_item(0, None),
            Err(ActionError::ItemNotUsable)
        );
        assert_eq!(actor.inventory.len(), 1, "rejected item is not consumed");
    }

    #[test]
    fn test_artifacts_unique_by_id() {
        let mut actor = hero_actor();
        actor.add_artifact(Artifact::new("golden-key", "Golden Key", "One of three."));
        let msg = actor.add_artifact(Artifact::new("golden-key", "Golden Key", "One of three."));
        assert!(msg.is_empty());
        assert_eq!(actor.artifacts.len(), 1);
        assert_eq!(actor.key_count(), 1);
    }

    #[test]
    fn test_status_line_shows_effects_before_tick() {
        let mut actor = hero_actor();
        actor.add_effect(Effect::poison(3, 5));
        let line = actor.status_line();
        assert!(line.contains("HP 100/100"));
        assert!(line.contains("Poison (3)"));
    }
}
