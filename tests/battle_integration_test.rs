use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skazka::{
    hero_from_json, hero_to_json, run_battle, run_boss_battle, ActionError, ActionSource,
    DefeatLedger, Hero, HeroAction, MemoryLedger, Opponent, Outcome, TurnView,
};

/// Plays back a fixed list of actions, then keeps attacking.
struct Script {
    actions: Vec<HeroAction>,
    cursor: usize,
    rejections: Vec<ActionError>,
}

impl Script {
    fn new(actions: Vec<HeroAction>) -> Self {
        Self {
            actions,
            cursor: 0,
            rejections: Vec::new(),
        }
    }

    fn attacks() -> Self {
        Self::new(Vec::new())
    }
}

impl ActionSource for Script {
    fn choose(&mut self, _view: TurnView<'_>, rejected: Option<&ActionError>) -> HeroAction {
        if let Some(err) = rejected {
            self.rejections.push(err.clone());
        }
        let action = self
            .actions
            .get(self.cursor)
            .copied()
            .unwrap_or(HeroAction::Attack);
        self.cursor += 1;
        action
    }
}

#[test]
fn test_fool_beats_the_early_roster() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut hero = Hero::new_fool();
    hero.actor.strength = 25;
    hero.actor.base_strength = 25;
    let mut ledger = MemoryLedger::new();

    for opponent in [Opponent::forest_spirit(), Opponent::kikimora()] {
        let mut opponent = opponent;
        let mut script = Script::attacks();
        let report = run_battle(
            &mut hero,
            &mut opponent,
            &mut script,
            &mut ledger,
            &mut rng,
            true,
        );
        assert_eq!(report.outcome, Outcome::Victory);
        assert!(report.rounds <= 50);
        assert!(hero.actor.is_alive());
    }

    assert!(ledger.is_defeated("forest-spirit"));
    assert!(ledger.is_defeated("kikimora"));
    assert_eq!(ledger.defeated().len(), 2);
}

#[test]
fn test_boss_battle_has_a_phase_and_no_escape() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut hero = Hero::new_servant();
    let mut ledger = MemoryLedger::new();
    let mut opponent = Opponent::water_spirit();

    // Open with a flee attempt, then a backstab, then plain attacks.
    let mut script = Script::new(vec![HeroAction::Flee, HeroAction::Ability(0)]);
    let report = run_boss_battle(&mut hero, &mut opponent, &mut script, &mut ledger, &mut rng);

    assert_eq!(script.rejections[0], ActionError::FleeNotAllowed);
    assert_ne!(report.outcome, Outcome::Fled);
    if report.outcome == Outcome::Victory {
        assert!(ledger.is_defeated("water-spirit"));
        // A win over a phased boss passes through its second phase.
        assert!(report.transcript.iter().any(|line| line.contains("ROARS")));
    } else {
        assert!(!ledger.is_defeated("water-spirit"));
    }
}

#[test]
fn test_sorceress_spell_budget_holds_across_battles() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut hero = Hero::new_sorceress();
    let mut ledger = MemoryLedger::new();

    let mut opponent = Opponent::forest_spirit();
    let mut script = Script::new(vec![HeroAction::Ability(2)]);
    let first = run_battle(
        &mut hero,
        &mut opponent,
        &mut script,
        &mut ledger,
        &mut rng,
        true,
    );
    assert_eq!(first.outcome, Outcome::Victory);
    assert_eq!(hero.ability_status(), "2/3");

    // The spent spell stays spent in the next encounter.
    let mut opponent = Opponent::ghoul();
    let mut script = Script::new(vec![HeroAction::Ability(2), HeroAction::Ability(0)]);
    run_battle(
        &mut hero,
        &mut opponent,
        &mut script,
        &mut ledger,
        &mut rng,
        true,
    );
    assert_eq!(script.rejections[0], ActionError::AbilityExhausted);
    assert_eq!(hero.ability_status(), "1/3");
}

#[test]
fn test_snapshot_round_trip_mid_adventure() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut hero = Hero::new_sorceress();
    let mut ledger = MemoryLedger::new();

    let mut opponent = Opponent::forest_spirit();
    let mut script = Script::attacks();
    let report = run_battle(
        &mut hero,
        &mut opponent,
        &mut script,
        &mut ledger,
        &mut rng,
        true,
    );
    assert_eq!(report.outcome, Outcome::Victory);

    let json = hero_to_json(&hero).unwrap();
    let mut restored = hero_from_json(&json).unwrap();
    assert_eq!(restored.actor.hp, hero.actor.hp);
    assert_eq!(restored.mana().unwrap().mp, hero.mana().unwrap().mp);
    assert!(restored.actor.has_artifact("truth-mirror"));

    // The restored hero fights on.
    let mut opponent = Opponent::kikimora();
    let mut script = Script::attacks();
    let report = run_battle(
        &mut restored,
        &mut opponent,
        &mut script,
        &mut ledger,
        &mut rng,
        true,
    );
    assert_eq!(report.outcome, Outcome::Victory);
    assert!(ledger.is_defeated("kikimora"));
}

#[test]
fn test_hopeless_fight_ends_one_way_or_another() {
    // An unwinnable matchup must still terminate: defeat, escape, or the
    // round limit.
    let mut rng = ChaCha8Rng::seed_from_u64(23);
    let mut hero = Hero::new_fool();
    hero.actor.hp = 10;
    let mut ledger = MemoryLedger::new();
    let mut opponent = Opponent::koschei_shadow();

    let mut script = Script::attacks();
    let report = run_battle(
        &mut hero,
        &mut opponent,
        &mut script,
        &mut ledger,
        &mut rng,
        true,
    );
    assert!(report.rounds <= 50);
    assert_ne!(report.outcome, Outcome::Victory);
    assert!(ledger.defeated().is_empty());
}
