//! Turn and round state machine.
//!
//! A battle is driven by three entry points: [`start_battle`], [`submit_action`]
//! and [`forfeit`]. Each runs the battle forward until it either ends or
//! needs a move from an interactive player, then returns the events it
//! produced. Nothing blocks; a waiting battle simply sits in a
//! `WaitingForPlayer*Move` state until the next call.

use crate::battle::ai::BehaviorSet;
use crate::battle::calculators::resolve_move;
use crate::battle::commands::{execute_command_batch, BattleCommand, PlayerTarget};
use crate::battle::state::{BattleEvent, BattleState, EndReason, EventBus, GameState, TurnRng};
use crate::battle::stats::{
    burn_tick_damage, effective_speed, first_mover_probability, speed_multiplier,
};
use crate::errors::{ActionError, BattleResult, BattleStateError, PreconditionError};
use crate::player::{PlayerAction, PlayerType};
use std::cmp::Ordering;

/// How the start-of-turn phase left the acting combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnStart {
    /// Free to act.
    Ready,
    /// Asleep; the turn passes without a move.
    Skipped,
    /// The battle ended during the status tick.
    BattleOver,
}

/// Validate both combatants, roll initiative and run until the first
/// interactive prompt or the end of the battle.
pub fn start_battle(
    state: &mut BattleState,
    rng: &mut TurnRng,
    behaviors: &BehaviorSet,
) -> BattleResult<EventBus> {
    if state.game_state != GameState::NotStarted {
        return Err(ActionError::BattleNotAcceptingActions.into());
    }
    for player in &state.players {
        if player.combatant.is_fainted() {
            return Err(PreconditionError::ChampionFainted {
                player_id: player.player_id.clone(),
            }
            .into());
        }
    }

    let mut bus = EventBus::new();
    bus.push(BattleEvent::BattleStarted {
        round_cap: state.config.round_cap,
    });
    for (player_index, player) in state.players.iter().enumerate() {
        bus.push(BattleEvent::ChampionSentOut {
            player_index,
            species: player.combatant.species,
            level: player.combatant.level,
            hp: player.combatant.current_hp(),
            max_hp: player.combatant.max_hp(),
        });
    }

    let first_actor = roll_initiative(state, rng);
    state.first_actor = first_actor;
    state.current_actor = first_actor;
    state.round = 1;
    state.game_state = GameState::TurnInProgress;
    bus.push(BattleEvent::FirstMover {
        player_index: first_actor,
    });
    bus.push(state.hp_status());
    bus.push(BattleEvent::RoundStarted { round: 1 });

    tracing::info!(
        battle_id = %state.battle_id,
        p1 = %state.players[0].player_id,
        p2 = %state.players[1].player_id,
        first_actor,
        "battle started"
    );

    advance(state, rng, behaviors, &mut bus)?;
    Ok(bus)
}

/// Speed-weighted coin flip; equal speeds give a fair coin.
fn roll_initiative(state: &BattleState, rng: &mut TurnRng) -> usize {
    let config = &state.config;
    let speed1 = effective_speed(&state.players[0].combatant, config);
    let speed2 = effective_speed(&state.players[1].combatant, config);
    let p1_first = first_mover_probability(speed1, speed2);
    if rng.chance(p1_first, "Initiative") {
        0
    } else {
        1
    }
}

/// Handle an action from an interactive player.
///
/// Every rejection happens before any state is touched.
pub fn submit_action(
    state: &mut BattleState,
    player_index: usize,
    action: PlayerAction,
    rng: &mut TurnRng,
    behaviors: &BehaviorSet,
) -> BattleResult<EventBus> {
    if player_index >= state.players.len() {
        return Err(BattleStateError::InvalidPlayerIndex(player_index).into());
    }

    let move_index = match action {
        PlayerAction::Forfeit => return forfeit(state, player_index),
        PlayerAction::UseMove { move_index } => move_index,
    };

    match state.game_state.waiting_for() {
        Some(waiting) if waiting == player_index => {}
        Some(_) => {
            tracing::warn!(battle_id = %state.battle_id, player_index, "move submitted out of turn");
            return Err(ActionError::NotYourTurn(player_index).into());
        }
        None => return Err(ActionError::BattleNotAcceptingActions.into()),
    }
    if move_index >= state.players[player_index].combatant.moves.len() {
        tracing::warn!(battle_id = %state.battle_id, player_index, move_index, "invalid move index");
        return Err(ActionError::InvalidMoveIndex(move_index).into());
    }

    let mut bus = EventBus::new();
    state.game_state = GameState::TurnInProgress;
    perform_move(state, player_index, move_index, rng, &mut bus)?;
    end_turn(state, rng, &mut bus)?;
    advance(state, rng, behaviors, &mut bus)?;
    Ok(bus)
}

/// Concede the battle. Allowed for either participant at any point before it ends.
pub fn forfeit(state: &mut BattleState, player_index: usize) -> BattleResult<EventBus> {
    if player_index >= state.players.len() {
        return Err(BattleStateError::InvalidPlayerIndex(player_index).into());
    }
    if state.game_state.is_finished() {
        return Err(ActionError::BattleNotAcceptingActions.into());
    }

    let mut bus = EventBus::new();
    bus.push(BattleEvent::Forfeited { player_index });
    end_battle(state, 1 - player_index, EndReason::Forfeit, &mut bus);
    Ok(bus)
}

/// Run turns until the battle ends or an interactive player must choose.
fn advance(
    state: &mut BattleState,
    rng: &mut TurnRng,
    behaviors: &BehaviorSet,
    bus: &mut EventBus,
) -> BattleResult<()> {
    while state.game_state == GameState::TurnInProgress {
        let actor = state.current_actor;
        match begin_turn(state, actor, bus)? {
            TurnStart::BattleOver => break,
            TurnStart::Skipped => end_turn(state, rng, bus)?,
            TurnStart::Ready => {
                let player = &state.players[actor];
                if player.player_type == PlayerType::Human {
                    bus.push(BattleEvent::MoveRequested {
                        player_index: actor,
                        moves: player.combatant.moves.clone(),
                    });
                    state.game_state = GameState::waiting_for_player(actor);
                    return Ok(());
                }

                match behaviors[actor].decide_action(actor, state, rng) {
                    PlayerAction::UseMove { move_index } => {
                        perform_move(state, actor, move_index, rng, bus)?;
                        end_turn(state, rng, bus)?;
                    }
                    PlayerAction::Forfeit => {
                        bus.extend(forfeit(state, actor)?);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Burn tick then sleep gate, both on the acting combatant only.
fn begin_turn(state: &mut BattleState, actor: usize, bus: &mut EventBus) -> BattleResult<TurnStart> {
    let target = PlayerTarget::from_index(actor)?;
    let combatant = &state.players[actor].combatant;

    if combatant.is_burned() {
        let damage = burn_tick_damage(combatant.max_hp(), &state.config);
        let commands = vec![
            BattleCommand::SetBurnTurns {
                target,
                turns: combatant.burn_turns - 1,
            },
            BattleCommand::BurnDamage {
                target,
                amount: damage,
            },
        ];
        execute_command_batch(commands, state, bus)?;
        if check_win_conditions(state, bus) {
            return Ok(TurnStart::BattleOver);
        }
    }

    let combatant = &state.players[actor].combatant;
    if combatant.is_asleep() {
        let commands = vec![
            BattleCommand::SetSleepTurns {
                target,
                turns: combatant.sleep_turns - 1,
            },
            BattleCommand::EmitEvent(BattleEvent::CannotMove {
                player_index: actor,
                species: combatant.species,
            }),
        ];
        execute_command_batch(commands, state, bus)?;
        return Ok(TurnStart::Skipped);
    }

    Ok(TurnStart::Ready)
}

fn perform_move(
    state: &mut BattleState,
    actor: usize,
    move_index: usize,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let move_used = *state.players[actor]
        .combatant
        .moves
        .get(move_index)
        .ok_or(ActionError::InvalidMoveIndex(move_index))?;
    tracing::debug!(battle_id = %state.battle_id, actor, move_used = %move_used, "resolving move");

    let commands = resolve_move(state, PlayerTarget::from_index(actor)?, move_used, rng)?;
    execute_command_batch(commands, state, bus)?;
    check_win_conditions(state, bus);
    Ok(())
}

/// Close the current turn: HUD, hand over to the other combatant, or close
/// the round and apply the round cap.
fn end_turn(state: &mut BattleState, rng: &mut TurnRng, bus: &mut EventBus) -> BattleResult<()> {
    if state.game_state.is_finished() {
        return Ok(());
    }
    bus.push(state.hp_status());

    let next_actor = 1 - state.current_actor;
    if next_actor != state.first_actor {
        execute_command_batch(
            vec![BattleCommand::SetCurrentActor(PlayerTarget::from_index(next_actor)?)],
            state,
            bus,
        )?;
        return Ok(());
    }

    if state.round >= state.config.round_cap {
        resolve_round_cap(state, rng, bus);
        return Ok(());
    }

    let mut commands = vec![BattleCommand::IncrementRound];
    let mut leader = state.first_actor;
    if let Some(overtaker) = speed_overtake(state) {
        leader = overtaker;
        commands.push(BattleCommand::SetFirstActor(PlayerTarget::from_index(overtaker)?));
    }
    commands.push(BattleCommand::SetCurrentActor(PlayerTarget::from_index(leader)?));
    commands.push(BattleCommand::EmitEvent(BattleEvent::RoundStarted {
        round: state.round + 1,
    }));
    if leader != state.first_actor {
        commands.push(BattleCommand::EmitEvent(BattleEvent::FirstMover {
            player_index: leader,
        }));
    }
    execute_command_batch(commands, state, bus)?;
    Ok(())
}

/// The round's second mover takes the lead once speed stages leave it both
/// more boosted and faster than the current leader. Draws no randomness, so
/// battles without speed buffs keep their opening order throughout.
fn speed_overtake(state: &BattleState) -> Option<usize> {
    let config = &state.config;
    let leader = state.first_actor;
    let chaser = 1 - leader;
    let lead = &state.players[leader].combatant;
    let chase = &state.players[chaser].combatant;
    let boosted = speed_multiplier(chase, config) > speed_multiplier(lead, config);
    let faster = effective_speed(chase, config) > effective_speed(lead, config);
    (boosted && faster).then_some(chaser)
}

/// Both combatants survived the final round: most cumulative damage wins,
/// then most remaining HP, then a coin flip.
fn resolve_round_cap(state: &mut BattleState, rng: &mut TurnRng, bus: &mut EventBus) {
    let dealt = [state.players[0].damage_dealt, state.players[1].damage_dealt];
    bus.push(BattleEvent::RoundCapReached { damage_dealt: dealt });

    let hp = [
        state.players[0].combatant.current_hp(),
        state.players[1].combatant.current_hp(),
    ];
    let winner = match dealt[0].cmp(&dealt[1]).then(hp[0].cmp(&hp[1])) {
        Ordering::Greater => 0,
        Ordering::Less => 1,
        Ordering::Equal => {
            if rng.chance(0.5, "Round Cap Tie Break") {
                0
            } else {
                1
            }
        }
    };
    end_battle(state, winner, EndReason::RoundCap, bus);
}

/// End the battle if exactly one side is down. Returns true when it ended.
fn check_win_conditions(state: &mut BattleState, bus: &mut EventBus) -> bool {
    if state.game_state.is_finished() {
        return true;
    }
    let fainted = [
        state.players[0].combatant.is_fainted(),
        state.players[1].combatant.is_fainted(),
    ];
    let winner = match fainted {
        [true, false] => 1,
        [false, true] => 0,
        // Only the acting side's move or tick can land, so the opponent takes it.
        [true, true] => 1 - state.current_actor,
        [false, false] => return false,
    };
    end_battle(state, winner, EndReason::Knockout, bus);
    true
}

fn end_battle(state: &mut BattleState, winner: usize, reason: EndReason, bus: &mut EventBus) {
    state.game_state = GameState::win_for(winner);
    state.end_reason = Some(reason);
    bus.push(state.hp_status());
    bus.push(BattleEvent::BattleEnded { winner, reason });
    tracing::info!(
        battle_id = %state.battle_id,
        winner = %state.players[winner].player_id,
        ?reason,
        round = state.round,
        "battle ended"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::random_behaviors;
    use crate::battle::tests::common::{create_test_battle, TestCombatantBuilder};
    use crate::errors::BattleEngineError;
    use pretty_assertions::assert_eq;
    use schema::Species;

    #[test]
    fn test_fainted_combatant_cannot_start() {
        let mut state = create_test_battle(
            TestCombatantBuilder::new(Species::Suimander, 1).with_hp(0).build(),
            TestCombatantBuilder::new(Species::Basaurimon, 1).build(),
        );
        let mut rng = TurnRng::new_for_test(vec![]);
        let result = start_battle(&mut state, &mut rng, &random_behaviors());
        assert!(matches!(
            result,
            Err(BattleEngineError::Precondition(PreconditionError::ChampionFainted { .. }))
        ));
        assert_eq!(state.game_state, GameState::NotStarted);
    }

    #[test]
    fn test_forfeit_before_start_declares_opponent() {
        let mut state = create_test_battle(
            TestCombatantBuilder::new(Species::Suimander, 1).build(),
            TestCombatantBuilder::new(Species::Basaurimon, 1).build(),
        );
        forfeit(&mut state, 1).unwrap();
        assert_eq!(state.game_state, GameState::Player1Win);
        assert_eq!(state.end_reason, Some(EndReason::Forfeit));
        assert!(forfeit(&mut state, 0).is_err());
    }

    #[test]
    fn test_speedier_side_favored_on_initiative_draw() {
        let mut state = create_test_battle(
            TestCombatantBuilder::new(Species::Suimander, 1).build(),
            TestCombatantBuilder::new(Species::Basaurimon, 1).build(),
        );
        // 12 vs 9 speed gives p1 a 0.575 chance; a draw of 0.56 still favors p1.
        let mut rng = TurnRng::new_for_test(vec![0.56]);
        assert_eq!(roll_initiative(&state, &mut rng), 0);
        state.players[1].combatant.speed_stage = 3;
        // 12 vs 9 * 1.36 = 12.24 tilts it just below one half
        let mut rng = TurnRng::new_for_test(vec![0.5]);
        assert_eq!(roll_initiative(&state, &mut rng), 1);
    }
}
