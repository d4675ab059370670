//! Skazka - Turn-Based Fairy-Tale Combat Engine
//!
//! Round-based combat resolution for a narrative adventure: a player hero
//! fights scripted opponents (including multi-phase bosses) under a timed
//! status-effect system. The engine mutates the two participating actors in
//! place and reports everything that happened as narration strings; rendering,
//! story flow and save files live in the surrounding layers.

pub mod actor;
pub mod combat;
pub mod constants;
pub mod content;
pub mod effects;
pub mod enemies;
pub mod error;
pub mod hero;
pub mod items;
pub mod snapshot;

pub use actor::{Actor, Gender};
pub use combat::logic::{run_battle, run_boss_battle};
pub use combat::types::{
    ActionSource, BattleReport, DefeatLedger, HeroAction, MemoryLedger, Outcome, TurnView,
};
pub use effects::{Effect, EffectKind};
pub use enemies::{Archetype, Opponent};
pub use error::{ActionError, SnapshotError};
pub use hero::{ClassId, Hero, HeroClass, ManaPool};
pub use items::{Artifact, Item, ItemKind};
pub use snapshot::{hero_from_json, hero_to_json, HeroRecord};
