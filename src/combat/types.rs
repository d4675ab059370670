//! Battle loop surface: hero actions, the action source seam, outcomes and
//! the defeat ledger.

use serde::{Deserialize, Serialize};

use crate::enemies::Opponent;
use crate::error::ActionError;
use crate::hero::Hero;

/// What the hero attempts this turn. Indices refer to the class ability
/// list and the inventory, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroAction {
    Attack,
    Ability(usize),
    UseItem(usize),
    Flee,
}

/// Read-only view of the battle handed to the action source each time a
/// decision is needed.
pub struct TurnView<'a> {
    pub hero: &'a Hero,
    pub opponent: &'a Opponent,
    pub round: u32,
    pub can_flee: bool,
}

/// Where hero decisions come from. The battle loop is agnostic to whether
/// this is an interactive prompt, a script, or an AI.
///
/// When the previous selection was rejected, the rejection is passed back
/// in `rejected` so the source can surface it before choosing again. The
/// turn does not advance on a rejection.
pub trait ActionSource {
    fn choose(&mut self, view: TurnView<'_>, rejected: Option<&ActionError>) -> HeroAction;
}

/// Records which named opponents the hero has beaten. Recording is
/// idempotent.
pub trait DefeatLedger {
    fn record_defeat(&mut self, boss_id: &str);
    fn is_defeated(&self, boss_id: &str) -> bool;
}

/// In-memory ledger, also the persisted form of story progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLedger {
    defeated: Vec<String>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defeated(&self) -> &[String] {
        &self.defeated
    }
}

impl DefeatLedger for MemoryLedger {
    fn record_defeat(&mut self, boss_id: &str) {
        if !self.is_defeated(boss_id) {
            self.defeated.push(boss_id.to_string());
        }
    }

    fn is_defeated(&self, boss_id: &str) -> bool {
        self.defeated.iter().any(|id| id == boss_id)
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
    Fled,
    /// Neither side fell within the round limit.
    Stalemate,
}

/// Everything that happened in one battle, in order.
#[derive(Debug, Clone)]
pub struct BattleReport {
    pub outcome: Outcome,
    /// Rounds that started, including the one the battle ended in.
    pub rounds: u32,
    pub transcript: Vec<String>,
}
