//! Tuning constants for the combat engine.

/// Hard cap on encounter length. A fight still running after this many
/// rounds ends without a winner.
pub const ROUND_LIMIT: u32 = 50;

/// Base percent chance to flee before agility is added.
pub const FLEE_BASE_CHANCE: u32 = 30;
/// Flee chance never exceeds this percent regardless of agility.
pub const FLEE_CHANCE_CAP: u32 = 80;

/// Minimum damage a landed hit deals after all adjustments.
pub const MIN_DAMAGE: u32 = 1;

/// Spread added to strength on a basic attack: uniform in [-2, 3].
pub const ATTACK_SPREAD_MIN: i32 = -2;
pub const ATTACK_SPREAD_MAX: i32 = 3;

/// Fraction of *missing* HP (and MP, for mana users) restored after a victory.
pub const POST_COMBAT_RESTORE_DIVISOR: u32 = 4;

/// Mana cost of the sorceress's magic attack. Below this she falls back to
/// a staff hit.
pub const MAGIC_ATTACK_COST: u32 = 8;

/// Shared ability budget per encounter chain for the fool archetype.
pub const FOOL_ABILITY_USES: u32 = 3;
/// Shared ability budget for the servant archetype.
pub const SERVANT_ABILITY_USES: u32 = 2;
