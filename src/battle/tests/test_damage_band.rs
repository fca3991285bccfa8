#[cfg(test)]
mod tests {
    use crate::battle::calculators::resolve_move;
    use crate::battle::commands::{BattleCommand, PlayerTarget};
    use crate::battle::state::{BattleEvent, TurnRng};
    use crate::battle::tests::common::{create_test_battle, TestCombatantBuilder};
    use crate::move_data::get_move_data;
    use crate::species::Species;
    use proptest::prelude::*;
    use rstest::rstest;
    use schema::{Effectiveness, Move};
    use strum::IntoEnumIterator;

    fn dealt(commands: &[BattleCommand]) -> Option<(u32, bool, Effectiveness)> {
        commands.iter().find_map(|c| match c {
            BattleCommand::DealDamage {
                amount,
                critical,
                effectiveness,
                ..
            } => Some((*amount, *critical, *effectiveness)),
            _ => None,
        })
    }

    // Level 1 fire (22 atk) vs level 1 nature (12 def) with a 40 power move:
    // base = (2.4 * 40 * 22 / 12) / 6 + 2 = 31.33, x1.5 strong, x[0.92, 1.08] jitter.
    #[rstest]
    #[case(0.0)]
    #[case(0.25)]
    #[case(0.5)]
    #[case(0.75)]
    #[case(0.999)]
    fn test_first_hit_falls_in_formula_band(#[case] jitter_draw: f64) {
        let state = create_test_battle(
            TestCombatantBuilder::new(Species::Suimander, 1).build(),
            TestCombatantBuilder::new(Species::Basaurimon, 1).build(),
        );
        // hit, no crit, jitter, no burn
        let mut rng = TurnRng::new_for_test(vec![0.0, 0.99, jitter_draw, 0.99]);
        let commands = resolve_move(&state, PlayerTarget::Player1, Move::Ember, &mut rng).unwrap();

        let (amount, critical, effectiveness) = dealt(&commands).expect("ember should hit");
        assert!(!critical);
        assert_eq!(effectiveness, Effectiveness::Strong);
        assert!((43..=51).contains(&amount), "damage {} outside [43, 51]", amount);
    }

    #[test]
    fn test_crit_multiplies_damage() {
        let state = create_test_battle(
            TestCombatantBuilder::new(Species::Suimander, 1).build(),
            TestCombatantBuilder::new(Species::Basaurimon, 1).build(),
        );
        // crit, lowest jitter
        let mut rng = TurnRng::new_for_test(vec![0.0, 0.0, 0.0, 0.99]);
        let commands = resolve_move(&state, PlayerTarget::Player1, Move::Ember, &mut rng).unwrap();
        // 31.33 * 0.92 * 1.5 * 1.5 = 64.86
        assert_eq!(dealt(&commands), Some((65, true, Effectiveness::Strong)));
    }

    #[test]
    fn test_perfect_accuracy_moves_never_miss() {
        let state = create_test_battle(
            TestCombatantBuilder::new(Species::Suimander, 1).build(),
            TestCombatantBuilder::new(Species::Suiqrtle, 1).build(),
        );
        let sure_moves: Vec<Move> = Move::iter()
            .filter(|m| get_move_data(*m).unwrap().accuracy >= 1.0)
            .collect();
        assert!(!sure_moves.is_empty());

        for move_used in sure_moves {
            // the largest draw the source can produce
            let mut rng = TurnRng::new_for_test(vec![0.999_999; 8]);
            let commands = resolve_move(&state, PlayerTarget::Player1, move_used, &mut rng).unwrap();
            assert!(!commands.iter().any(|c| matches!(
                c,
                BattleCommand::EmitEvent(BattleEvent::MoveMissed { .. })
            )));
        }
    }

    proptest! {
        #[test]
        fn prop_landed_hits_deal_at_least_one(
            level in 1u32..60,
            crit in 0.0f64..1.0,
            jitter in 0.0f64..1.0,
            burn in 0.0f64..1.0,
        ) {
            for attacker in Species::iter() {
                for defender in Species::iter() {
                    let state = create_test_battle(
                        TestCombatantBuilder::new(attacker, level).build(),
                        TestCombatantBuilder::new(defender, 60).build(),
                    );
                    let moves = state.players[0].combatant.moves.clone();
                    for move_used in moves {
                        if !get_move_data(move_used).unwrap().kind.is_damaging() {
                            continue;
                        }
                        let mut rng = TurnRng::new_for_test(vec![0.0, crit, jitter, burn]);
                        let commands =
                            resolve_move(&state, PlayerTarget::Player1, move_used, &mut rng).unwrap();
                        let (amount, _, _) = dealt(&commands).expect("accuracy draw of 0 always hits");
                        prop_assert!(amount >= 1);
                    }
                }
            }
        }
    }
}
