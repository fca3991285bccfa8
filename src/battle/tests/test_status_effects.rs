#[cfg(test)]
mod tests {
    use crate::battle::ai::random_behaviors;
    use crate::battle::engine::start_battle;
    use crate::battle::state::{BattleEvent, BattleState, EndReason, GameState, TurnRng};
    use crate::battle::tests::common::{
        assert_ok, create_test_player, predictable_rng, TestCombatantBuilder,
    };
    use crate::config::EngineConfig;
    use crate::species::Species;
    use pretty_assertions::assert_eq;
    use schema::Move;

    fn capped_battle(
        p1: crate::champion::Combatant,
        p2: crate::champion::Combatant,
        round_cap: u32,
    ) -> BattleState {
        let config = EngineConfig {
            round_cap,
            ..EngineConfig::default()
        };
        BattleState::with_config(
            "status_test",
            create_test_player("p1", "Player 1", p1),
            create_test_player("p2", "Player 2", p2),
            config,
        )
    }

    #[test]
    fn test_sleep_two_skips_two_turns_then_acts() {
        let sleeper = TestCombatantBuilder::new(Species::Suimander, 1)
            .with_moves(vec![Move::Ember])
            .with_sleep(2)
            .build();
        let wall = TestCombatantBuilder::new(Species::Basaurimon, 1)
            .with_moves(vec![Move::Withdraw])
            .build();
        let mut state = capped_battle(sleeper, wall, 3);
        let mut rng = predictable_rng();

        let events = assert_ok(start_battle(&mut state, &mut rng, &random_behaviors())).into_events();

        let skipped: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, BattleEvent::CannotMove { player_index: 0, .. }))
            .map(|(i, _)| i)
            .collect();
        let acted: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, BattleEvent::MoveUsed { player_index: 0, .. }))
            .map(|(i, _)| i)
            .collect();
        let round_three = events
            .iter()
            .position(|e| *e == BattleEvent::RoundStarted { round: 3 })
            .expect("battle reaches round 3");

        assert_eq!(skipped.len(), 2);
        assert_eq!(acted.len(), 1);
        assert!(acted[0] > round_three);
        assert_eq!(state.players[0].combatant.sleep_turns, 0);
    }

    #[test]
    fn test_burn_ticks_three_times_regardless_of_heals() {
        let burned = TestCombatantBuilder::new(Species::Basaurimon, 1)
            .with_moves(vec![Move::Synthesis])
            .with_hp(60)
            .with_burn(3)
            .build();
        let wall = TestCombatantBuilder::new(Species::Suiqrtle, 1)
            .with_moves(vec![Move::Withdraw])
            .build();
        let mut state = capped_battle(burned, wall, 5);
        let mut rng = predictable_rng();

        let events = assert_ok(start_battle(&mut state, &mut rng, &random_behaviors())).into_events();

        let ticks: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                BattleEvent::BurnDamage {
                    player_index: 0,
                    damage,
                    ..
                } => Some(*damage),
                _ => None,
            })
            .collect();
        // max(2, round(110 * 0.06)) = 7
        assert_eq!(ticks, vec![7, 7, 7]);
        assert_eq!(state.players[0].combatant.burn_turns, 0);
        assert!(state.players[0].combatant.current_hp() <= state.players[0].combatant.max_hp());
    }

    #[test]
    fn test_burn_tick_can_end_the_battle() {
        let doomed = TestCombatantBuilder::new(Species::Suimander, 1)
            .with_hp(3)
            .with_burn(1)
            .build();
        let foe = TestCombatantBuilder::new(Species::Basaurimon, 1).build();
        let mut state = capped_battle(doomed, foe, 24);
        // initiative only: p1 moves first and never gets to act
        let mut rng = TurnRng::new_for_test(vec![0.0]);

        let events = assert_ok(start_battle(&mut state, &mut rng, &random_behaviors())).into_events();

        assert_eq!(state.game_state, GameState::Player2Win);
        assert_eq!(state.end_reason, Some(EndReason::Knockout));
        assert!(!events
            .iter()
            .any(|e| matches!(e, BattleEvent::MoveUsed { .. })));
        assert_eq!(
            events.last(),
            Some(&BattleEvent::BattleEnded {
                winner: 1,
                reason: EndReason::Knockout
            })
        );
    }
}
