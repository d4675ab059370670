//! The battle loop.
//!
//! One battle is a sequence of rounds: the hero's effect ticks, the hero's
//! turn, the opponent's effect ticks, the opponent's turn, then the
//! round-end effect pass on both sides. A death is checked immediately
//! after the step that could have caused it, so a round in which both
//! sides would fall resolves in favor of whichever death comes first in
//! that ordering. Battles that reach the round limit break off as a
//! stalemate.

use rand::Rng;

use crate::combat::types::{
    ActionSource, BattleReport, DefeatLedger, HeroAction, Outcome, TurnView,
};
use crate::constants::{FLEE_BASE_CHANCE, FLEE_CHANCE_CAP, ROUND_LIMIT};
use crate::enemies::Opponent;
use crate::error::ActionError;
use crate::hero::Hero;

/// Runs a battle to completion and returns what happened.
///
/// On victory over a named opponent the defeat is recorded in `ledger` and
/// the hero receives the post-combat recovery. The action source is asked
/// again, with the rejection attached, whenever it picks an action the
/// rules refuse; a rejected pick never consumes the turn.
pub fn run_battle(
    hero: &mut Hero,
    opponent: &mut Opponent,
    source: &mut impl ActionSource,
    ledger: &mut impl DefeatLedger,
    rng: &mut impl Rng,
    can_flee: bool,
) -> BattleReport {
    let mut transcript = Vec::new();
    transcript.push(format!(
        "{} stands against {}!",
        hero.actor.name, opponent.actor.name
    ));
    if !opponent.description.is_empty() {
        transcript.push(opponent.description.clone());
    }

    for round in 1..=ROUND_LIMIT {
        transcript.push(format!("--- Round {round} ---"));
        transcript.push(hero.actor.status_line());
        transcript.push(opponent.actor.status_line());

        // The hero's effects tick first. A tick can kill, and a death here
        // skips everything else in the round.
        transcript.extend(hero.actor.process_effects());
        if !hero.actor.is_alive() {
            transcript.push(format!("{} falls!", hero.actor.name));
            return BattleReport {
                outcome: Outcome::Defeat,
                rounds: round,
                transcript,
            };
        }

        // Hero turn. Rejected selections re-solicit without advancing.
        if hero.actor.can_act() {
            let mut rejected: Option<ActionError> = None;
            loop {
                let view = TurnView {
                    hero: &*hero,
                    opponent: &*opponent,
                    round,
                    can_flee,
                };
                match source.choose(view, rejected.as_ref()) {
                    HeroAction::Attack => {
                        transcript.push(hero.attack(&mut opponent.actor, rng));
                        break;
                    }
                    HeroAction::Ability(index) => {
                        match hero.use_ability(index, &mut opponent.actor, rng) {
                            Ok(msg) => {
                                transcript.push(msg);
                                break;
                            }
                            Err(err) => rejected = Some(err),
                        }
                    }
                    HeroAction::UseItem(index) => {
                        match hero.use_item(index, Some(&mut opponent.actor)) {
                            Ok(msg) => {
                                transcript.push(msg);
                                break;
                            }
                            Err(err) => rejected = Some(err),
                        }
                    }
                    HeroAction::Flee => {
                        if !can_flee {
                            rejected = Some(ActionError::FleeNotAllowed);
                            continue;
                        }
                        let chance =
                            (FLEE_BASE_CHANCE + hero.actor.agility).min(FLEE_CHANCE_CAP);
                        if rng.gen_range(1..=100) <= chance {
                            transcript.push(format!(
                                "{} escapes the fight!",
                                hero.actor.name
                            ));
                            return BattleReport {
                                outcome: Outcome::Fled,
                                rounds: round,
                                transcript,
                            };
                        }
                        // A failed attempt still spends the turn.
                        transcript.push(format!(
                            "{} tries to flee, but {} blocks the way!",
                            hero.actor.name, opponent.actor.name
                        ));
                        break;
                    }
                }
            }
            if !opponent.actor.is_alive() {
                return conclude_victory(hero, opponent, ledger, round, transcript);
            }
        } else {
            transcript.push(format!("{} cannot move!", hero.actor.name));
        }

        // The opponent's effects tick only after the hero has acted, so an
        // effect the hero just inflicted gets its suppressed first tick
        // this round rather than next.
        transcript.extend(opponent.actor.process_effects());
        if !opponent.actor.is_alive() {
            return conclude_victory(hero, opponent, ledger, round, transcript);
        }

        // Opponent turn.
        if opponent.actor.can_act() {
            transcript.push(opponent.choose_action(&mut hero.actor, rng));
            if !hero.actor.is_alive() {
                transcript.push(format!("{} falls!", hero.actor.name));
                return BattleReport {
                    outcome: Outcome::Defeat,
                    rounds: round,
                    transcript,
                };
            }
        } else {
            transcript.push(format!("{} cannot move!", opponent.actor.name));
        }

        // Durations wind down at round end, hero first.
        transcript.extend(hero.actor.end_round_effects());
        transcript.extend(opponent.actor.end_round_effects());
    }

    transcript.push("Neither side can prevail. The fight breaks off.".to_string());
    BattleReport {
        outcome: Outcome::Stalemate,
        rounds: ROUND_LIMIT,
        transcript,
    }
}

/// A boss battle is a battle with flight disabled: any flee attempt is
/// rejected and the turn re-solicited.
pub fn run_boss_battle(
    hero: &mut Hero,
    opponent: &mut Opponent,
    source: &mut impl ActionSource,
    ledger: &mut impl DefeatLedger,
    rng: &mut impl Rng,
) -> BattleReport {
    run_battle(hero, opponent, source, ledger, rng, false)
}

fn conclude_victory(
    hero: &mut Hero,
    opponent: &Opponent,
    ledger: &mut impl DefeatLedger,
    round: u32,
    mut transcript: Vec<String>,
) -> BattleReport {
    transcript.push(format!("{} is defeated!", opponent.actor.name));
    if let Some(id) = &opponent.boss_id {
        ledger.record_defeat(id);
    }
    transcript.push(hero.restore_after_combat());
    BattleReport {
        outcome: Outcome::Victory,
        rounds: round,
        transcript,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::MemoryLedger;
    use crate::effects::Effect;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(5)
    }

    /// Plays back a fixed action list, falling back to plain attacks, and
    /// records every rejection and the round of every solicitation.
    struct Scripted {
        actions: Vec<HeroAction>,
        cursor: usize,
        rejections: Vec<ActionError>,
        rounds_seen: Vec<u32>,
    }

    impl Scripted {
        fn new(actions: Vec<HeroAction>) -> Self {
            Self {
                actions,
                cursor: 0,
                rejections: Vec::new(),
                rounds_seen: Vec::new(),
            }
        }

        fn attacks() -> Self {
            Self::new(Vec::new())
        }
    }

    impl ActionSource for Scripted {
        fn choose(&mut self, view: TurnView<'_>, rejected: Option<&ActionError>) -> HeroAction {
            if let Some(err) = rejected {
                self.rejections.push(err.clone());
            }
            self.rounds_seen.push(view.round);
            let action = self
                .actions
                .get(self.cursor)
                .copied()
                .unwrap_or(HeroAction::Attack);
            self.cursor += 1;
            action
        }
    }

    /// An opponent that can barely scratch and never dies within the limit.
    fn wall() -> Opponent {
        Opponent::grunt("Stone Idol", 1_000_000, 0, 0, "It just stands there.")
    }

    #[test]
    fn test_victory_records_boss_defeat_and_restores() {
        let mut hero = Hero::new_fool();
        let mut opponent = Opponent::forest_spirit();
        let mut source = Scripted::attacks();
        let mut ledger = MemoryLedger::new();
        let mut rng = rng();

        let report = run_battle(
            &mut hero,
            &mut opponent,
            &mut source,
            &mut ledger,
            &mut rng,
            true,
        );

        assert_eq!(report.outcome, Outcome::Victory);
        assert!(ledger.is_defeated("forest-spirit"));
        assert!(!opponent.actor.is_alive());
        assert!(hero.actor.is_alive());
        assert!(report
            .transcript
            .iter()
            .any(|line| line.contains("Victory's respite")));
    }

    #[test]
    fn test_stalemate_at_round_limit() {
        let mut hero = Hero::new_fool();
        let mut opponent = wall();
        let mut source = Scripted::attacks();
        let mut ledger = MemoryLedger::new();
        let mut rng = rng();

        let report = run_battle(
            &mut hero,
            &mut opponent,
            &mut source,
            &mut ledger,
            &mut rng,
            true,
        );

        assert_eq!(report.outcome, Outcome::Stalemate);
        assert_eq!(report.rounds, ROUND_LIMIT);
        assert!(hero.actor.is_alive());
        assert!(opponent.actor.is_alive());
        assert!(ledger.defeated().is_empty());
    }

    #[test]
    fn test_boss_battle_rejects_flee_and_re_solicits() {
        let mut hero = Hero::new_servant();
        let mut opponent = Opponent::forest_spirit();
        let mut source = Scripted::new(vec![HeroAction::Flee]);
        let mut ledger = MemoryLedger::new();
        let mut rng = rng();

        let report = run_boss_battle(&mut hero, &mut opponent, &mut source, &mut ledger, &mut rng);

        assert_eq!(source.rejections[0], ActionError::FleeNotAllowed);
        assert_ne!(report.outcome, Outcome::Fled);
    }

    #[test]
    fn test_flee_chance_is_capped_at_eighty_percent() {
        let mut rng = rng();
        let trials = 2_000;
        let mut fled_first_round = 0;
        for _ in 0..trials {
            let mut hero = Hero::new_fool();
            hero.actor.agility = 90; // 30 + 90 hits the 80% cap
            let mut opponent = wall();
            let mut source = Scripted::new(vec![HeroAction::Flee; 60]);
            let mut ledger = MemoryLedger::new();

            let report = run_battle(
                &mut hero,
                &mut opponent,
                &mut source,
                &mut ledger,
                &mut rng,
                true,
            );
            if report.outcome == Outcome::Fled && report.rounds == 1 {
                fled_first_round += 1;
            }
        }
        let rate = fled_first_round as f64 / trials as f64;
        assert!((rate - 0.80).abs() < 0.03, "observed first-round flee rate {rate}");
    }

    #[test]
    fn test_failed_flee_spends_the_turn() {
        let mut rng = rng();
        let mut saw_failure = false;
        for _ in 0..50 {
            let mut hero = Hero::new_fool();
            hero.actor.agility = 0; // flee chance stays at the 30% base
            let mut opponent = wall();
            let mut source = Scripted::new(vec![HeroAction::Flee; 60]);
            let mut ledger = MemoryLedger::new();

            let report = run_battle(
                &mut hero,
                &mut opponent,
                &mut source,
                &mut ledger,
                &mut rng,
                true,
            );
            if report
                .transcript
                .iter()
                .any(|line| line.contains("blocks the way"))
            {
                saw_failure = true;
                assert!(
                    report.outcome != Outcome::Fled || report.rounds > 1,
                    "a failed attempt must not end the battle in the same round"
                );
            }
        }
        assert!(saw_failure);
    }

    #[test]
    fn test_rejected_selection_does_not_spend_budget() {
        let mut hero = Hero::new_fool();
        hero.actor.agility = 90; // flees quickly once done
        let mut opponent = wall();
        let mut source = Scripted::new({
            let mut actions = vec![HeroAction::Ability(9), HeroAction::Ability(1)];
            actions.extend(vec![HeroAction::Flee; 60]);
            actions
        });
        let mut ledger = MemoryLedger::new();
        let mut rng = rng();

        run_battle(
            &mut hero,
            &mut opponent,
            &mut source,
            &mut ledger,
            &mut rng,
            true,
        );

        assert_eq!(source.rejections[0], ActionError::InvalidAbility);
        assert_eq!(hero.ability_status(), "2/3", "only the valid pick spent a use");
    }

    #[test]
    fn test_lethal_tick_on_both_sides_is_a_defeat() {
        // Both carry poison that becomes lethal on the round-3 tick. The
        // hero's pass runs first, so the battle is lost, not won.
        let mut hero = Hero::new_fool();
        hero.actor.hp = 60;
        hero.actor.agility = 0;
        hero.actor.add_effect(Effect::poison(3, 50));

        let mut opponent = wall();
        opponent.actor.agility = 100; // basic attacks never land
        opponent.actor.add_effect(Effect::poison(3, 500_000));

        let mut source = Scripted::attacks();
        let mut ledger = MemoryLedger::new();
        let mut rng = rng();

        let report = run_battle(
            &mut hero,
            &mut opponent,
            &mut source,
            &mut ledger,
            &mut rng,
            true,
        );

        assert_eq!(report.outcome, Outcome::Defeat);
        assert_eq!(report.rounds, 3);
        assert!(!hero.actor.is_alive());
        assert!(opponent.actor.is_alive(), "the opponent's pass never ran");
    }

    #[test]
    fn test_frozen_hero_is_not_solicited() {
        let mut hero = Hero::new_fool();
        hero.actor.agility = 90;
        hero.actor.add_effect(Effect::freeze(1));

        let mut opponent = wall();
        let mut source = Scripted::new(vec![HeroAction::Flee; 60]);
        let mut ledger = MemoryLedger::new();
        let mut rng = rng();

        let report = run_battle(
            &mut hero,
            &mut opponent,
            &mut source,
            &mut ledger,
            &mut rng,
            true,
        );

        assert!(report
            .transcript
            .iter()
            .any(|line| line.contains("cannot move")));
        assert_eq!(
            source.rounds_seen.first(),
            Some(&2),
            "the first decision comes after the freeze expires"
        );
    }
}
