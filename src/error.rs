//! Error types for the action-selection and snapshot boundaries.
//!
//! Everything here is caller-recoverable: a rejected selection re-solicits
//! the turn, a failed restore leaves the prior state untouched.

use std::error::Error;
use std::fmt;

/// Why a hero action was rejected. The turn does not advance; the action
/// source is asked again with the rejection attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Ability index outside the class's ability list.
    InvalidAbility,
    /// The ability exists but its budget (shared counter or one-shot flag)
    /// is spent.
    AbilityExhausted,
    /// Item index outside the inventory.
    InvalidItem,
    /// The item exists but is not usable in combat (story item, or flagged
    /// unusable).
    ItemNotUsable,
    /// Flee was requested in an encounter where flight is disabled.
    FleeNotAllowed,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::InvalidAbility => write!(f, "no such ability"),
            ActionError::AbilityExhausted => write!(f, "ability already spent"),
            ActionError::InvalidItem => write!(f, "no such item"),
            ActionError::ItemNotUsable => write!(f, "item cannot be used here"),
            ActionError::FleeNotAllowed => write!(f, "there is no escape from this fight"),
        }
    }
}

impl Error for ActionError {}

/// Why a hero snapshot failed to restore. The restore fails as a whole;
/// no fields are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// `hp` exceeds `max_hp`.
    HpAboveMax { hp: u32, max_hp: u32 },
    /// Agility outside the 0-100 percent range.
    AgilityOutOfRange(u32),
    /// Mana fields inconsistent (missing for a mana class, present for a
    /// non-mana class, or mp above max_mp).
    ManaMismatch,
    /// Spell flags missing for a class that tracks per-spell use.
    MissingSpellFlags,
    /// Shared ability counter above the class budget.
    AbilityUsesOutOfRange(u32),
    /// Artifact id not present in the catalog.
    UnknownArtifact(String),
    /// The record itself could not be parsed.
    Parse(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::HpAboveMax { hp, max_hp } => {
                write!(f, "hp {hp} exceeds max_hp {max_hp}")
            }
            SnapshotError::AgilityOutOfRange(a) => write!(f, "agility {a} outside 0-100"),
            SnapshotError::ManaMismatch => write!(f, "mana fields inconsistent with class"),
            SnapshotError::MissingSpellFlags => write!(f, "spell flags missing for class"),
            SnapshotError::AbilityUsesOutOfRange(n) => {
                write!(f, "ability uses {n} above class budget")
            }
            SnapshotError::UnknownArtifact(id) => write!(f, "unknown artifact id: {id}"),
            SnapshotError::Parse(e) => write!(f, "malformed snapshot: {e}"),
        }
    }
}

impl Error for SnapshotError {}
