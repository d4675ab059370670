//! Timed status effects attached to actors.
//!
//! An effect lives on exactly one actor. It ticks once per round at round
//! start (applying damage, healing or nothing), is decremented once per round
//! at round end, and fires an expiry hook when its duration reaches zero.
//! An effect applied mid-round does not also fire that round: the
//! `just_applied` flag suppresses its first tick.

use serde::{Deserialize, Serialize};

use crate::actor::Actor;

/// Closed set of effect kinds. The payload travels with the kind so a
/// snapshot round-trips magnitudes (and the strength buff's bookkeeping)
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectKind {
    /// Damage over time.
    Poison { damage: u32 },
    /// Damage over time, typically shorter and harder than poison.
    Burn { damage: u32 },
    /// Disables the actor: `can_act` is false while this is active.
    Freeze,
    /// Healing over time.
    Regen { heal: u32 },
    /// Flat strength bonus. `applied` tracks whether the delta is currently
    /// on the actor so it is reverted exactly once, even on early removal.
    StrengthBuff { bonus: u32, applied: bool },
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Poison { .. } => "Poison",
            EffectKind::Burn { .. } => "Burning",
            EffectKind::Freeze => "Frozen",
            EffectKind::Regen { .. } => "Regeneration",
            EffectKind::StrengthBuff { .. } => "Empowered",
        }
    }

    /// True when two kinds are the same variant, ignoring payload. Used for
    /// the one-instance-per-kind replacement rule.
    pub fn same_kind(&self, other: &EffectKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

fn default_just_applied() -> bool {
    true
}

/// A timed modifier on an actor.
///
/// `just_applied` is deliberately not persisted: a restored effect ticks
/// fully on the first round after restore. This is a documented, bounded
/// drift of the snapshot boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(flatten)]
    pub kind: EffectKind,
    pub duration: u32,
    #[serde(skip_serializing, default = "default_just_applied")]
    just_applied: bool,
}

impl Effect {
    pub fn new(kind: EffectKind, duration: u32) -> Self {
        Self {
            kind,
            duration,
            just_applied: true,
        }
    }

    pub fn poison(duration: u32, damage: u32) -> Self {
        Self::new(EffectKind::Poison { damage }, duration)
    }

    pub fn burn(duration: u32, damage: u32) -> Self {
        Self::new(EffectKind::Burn { damage }, duration)
    }

    pub fn freeze(duration: u32) -> Self {
        Self::new(EffectKind::Freeze, duration)
    }

    pub fn regen(duration: u32, heal: u32) -> Self {
        Self::new(EffectKind::Regen { heal }, duration)
    }

    pub fn strength_buff(duration: u32, bonus: u32) -> Self {
        Self::new(
            EffectKind::StrengthBuff {
                bonus,
                applied: false,
            },
            duration,
        )
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0
    }

    /// Round-start hook. The first call after creation only clears the
    /// suppression flag; later calls apply the payload. Returns an empty
    /// string when nothing visible happened.
    pub fn tick(&mut self, target: &mut Actor) -> String {
        if self.just_applied {
            self.just_applied = false;
            return String::new();
        }
        match &mut self.kind {
            EffectKind::Poison { damage } => {
                target.hp = target.hp.saturating_sub(*damage);
                format!(
                    "{} loses {} HP to poison (HP: {}/{})",
                    target.name, damage, target.hp, target.max_hp
                )
            }
            EffectKind::Burn { damage } => {
                target.hp = target.hp.saturating_sub(*damage);
                format!(
                    "{} takes {} fire damage (HP: {}/{})",
                    target.name, damage, target.hp, target.max_hp
                )
            }
            // The cannot-act message is narrated by the battle loop when
            // can_act() is checked.
            EffectKind::Freeze => String::new(),
            EffectKind::Regen { heal } => {
                let healed = (target.max_hp - target.hp).min(*heal);
                target.hp += healed;
                if healed > 0 {
                    format!(
                        "{} regenerates {} HP (HP: {}/{})",
                        target.name, healed, target.hp, target.max_hp
                    )
                } else {
                    String::new()
                }
            }
            EffectKind::StrengthBuff { bonus, applied } => {
                if !*applied {
                    target.strength += *bonus;
                    *applied = true;
                }
                String::new()
            }
        }
    }

    /// Round-end hook: decrements duration and fires `on_expire` when it
    /// reaches zero. Returns the expiry narration, or an empty string while
    /// the effect is still running. Calling this on an already-expired
    /// effect is a no-op, so `on_expire` fires at most once.
    pub fn end_round(&mut self, target: &mut Actor) -> String {
        if self.duration == 0 {
            return String::new();
        }
        self.duration -= 1;
        if self.duration == 0 {
            self.on_expire(target)
        } else {
            String::new()
        }
    }

    /// Expiry side effect. For most kinds this is informational; the
    /// strength buff reverts its delta here.
    pub fn on_expire(&mut self, target: &mut Actor) -> String {
        if let EffectKind::StrengthBuff { bonus, applied } = &mut self.kind {
            if *applied {
                target.strength = target.strength.saturating_sub(*bonus);
                *applied = false;
            }
            return format!(
                "The {} effect has worn off. Strength returns to normal.",
                self.kind.name()
            );
        }
        format!("The {} effect has worn off.", self.kind.name())
    }

    /// Reverts any stat delta this effect currently holds without waiting
    /// for expiry. Called when the effect is removed early by replacement.
    pub fn revert(&mut self, target: &mut Actor) {
        if let EffectKind::StrengthBuff { bonus, applied } = &mut self.kind {
            if *applied {
                target.strength = target.strength.saturating_sub(*bonus);
                *applied = false;
            }
        }
    }

    /// Display form with remaining duration, e.g. `Poison (3)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.kind.name(), self.duration)
    }
}
