use crate::battle::commands::{BattleCommand, PlayerTarget};
use crate::battle::state::{BattleEvent, BattleState, TurnRng};
use crate::battle::stats::{
    base_damage, effective_defense, finalize_damage, heal_amount, move_hits, roll_critical_hit,
};
use crate::errors::BattleResult;
use crate::move_data::get_move_data;
use schema::{ElementType, Move, MoveData, MoveKind};

/// Resolve one move into the commands that apply it.
///
/// Pure with respect to the battle state: nothing is mutated here, the
/// returned commands are executed by the caller. Draw order is accuracy,
/// then kind-specific draws (sleep length, or crit then jitter then burn).
pub fn resolve_move(
    state: &BattleState,
    attacker: PlayerTarget,
    move_used: Move,
    rng: &mut TurnRng,
) -> BattleResult<Vec<BattleCommand>> {
    let move_data = get_move_data(move_used)?;
    let attacker_player = &state.players[attacker.to_index()];
    let mut commands = Vec::new();

    if !move_hits(move_data, rng) {
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
            player_index: attacker.to_index(),
            species: attacker_player.combatant.species,
            move_used,
        }));
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveMissed {
            player_index: attacker.to_index(),
            move_used,
        }));
        return Ok(commands);
    }

    commands.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        player_index: attacker.to_index(),
        species: attacker_player.combatant.species,
        move_used,
    }));

    match &move_data.kind {
        MoveKind::SleepStatus { min_turns, max_turns } => {
            commands.extend(calculate_sleep(state, attacker.opponent(), *min_turns, *max_turns, rng));
        }
        MoveKind::Heal { fraction } => {
            let amount = heal_amount(attacker_player.combatant.max_hp(), *fraction);
            commands.push(BattleCommand::Heal { target: attacker, amount });
        }
        MoveKind::BuffStat { stat, stages } => {
            commands.push(BattleCommand::RaiseStatStage {
                target: attacker,
                stat: *stat,
                stages: *stages,
            });
        }
        MoveKind::Damage | MoveKind::DamageWithBurn { .. } | MoveKind::HighCritDamage { .. } => {
            commands.extend(calculate_damage(state, attacker, move_data, rng));
        }
    }

    Ok(commands)
}

fn calculate_sleep(
    state: &BattleState,
    target: PlayerTarget,
    min_turns: u8,
    max_turns: u8,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let defender = &state.players[target.to_index()].combatant;
    if defender.is_asleep() {
        return vec![BattleCommand::EmitEvent(BattleEvent::AlreadyAsleep {
            target: target.to_index(),
            species: defender.species,
        })];
    }

    let turns = rng.range_inclusive(min_turns, max_turns, "Sleep Duration");
    vec![
        BattleCommand::SetSleepTurns { target, turns },
        BattleCommand::EmitEvent(BattleEvent::FellAsleep {
            target: target.to_index(),
            species: defender.species,
            turns,
        }),
    ]
}

/// Draws crit, then jitter, then the burn roll. The burn roll is skipped
/// when the hit is lethal or the defender is already burned.
fn calculate_damage(
    state: &BattleState,
    attacker: PlayerTarget,
    move_data: &MoveData,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let config = &state.config;
    let target = attacker.opponent();
    let attacker_combatant = &state.players[attacker.to_index()].combatant;
    let defender = &state.players[target.to_index()].combatant;

    let (type_multiplier, effectiveness) =
        ElementType::effectiveness(attacker_combatant.element, defender.element);
    let critical = roll_critical_hit(&move_data.kind, config, rng);
    let crit_multiplier = if critical { config.crit_multiplier } else { 1.0 };
    let jitter = rng.uniform(config.jitter_min, config.jitter_max, "Damage Jitter");

    let base = base_damage(
        attacker_combatant.level,
        move_data.power,
        attacker_combatant.attack,
        effective_defense(defender, config),
    );
    let amount = finalize_damage(base, jitter, type_multiplier, crit_multiplier);

    tracing::debug!(
        attacker = attacker_combatant.name(),
        move_used = %move_data.id,
        base,
        jitter,
        critical,
        amount,
        "damage resolved"
    );

    let mut commands = vec![BattleCommand::DealDamage {
        target,
        amount,
        critical,
        effectiveness,
    }];

    // A knocked-out defender takes no secondary effect. The burn roll is not
    // drawn at all on a lethal hit, so such a hit consumes one draw fewer.
    let lethal = amount >= defender.current_hp();
    if let MoveKind::DamageWithBurn { burn_chance } = move_data.kind {
        if !lethal && !defender.is_burned() && rng.chance(burn_chance, "Burn Chance") {
            commands.push(BattleCommand::SetBurnTurns {
                target,
                turns: config.burn_turns,
            });
            commands.push(BattleCommand::EmitEvent(BattleEvent::Burned {
                target: target.to_index(),
                species: defender.species,
                turns: config.burn_turns,
            }));
        }
    }

    commands
}
