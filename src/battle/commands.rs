use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState};
use crate::errors::BattleStateError;
use schema::{BuffStat, Effectiveness};

/// Player target for commands - provides type safety over raw indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTarget {
    Player1,
    Player2,
}

impl PlayerTarget {
    pub fn to_index(self) -> usize {
        match self {
            PlayerTarget::Player1 => 0,
            PlayerTarget::Player2 => 1,
        }
    }

    pub fn opponent(self) -> PlayerTarget {
        match self {
            PlayerTarget::Player1 => PlayerTarget::Player2,
            PlayerTarget::Player2 => PlayerTarget::Player1,
        }
    }

    pub fn from_index(index: usize) -> Result<PlayerTarget, BattleStateError> {
        match index {
            0 => Ok(PlayerTarget::Player1),
            1 => Ok(PlayerTarget::Player2),
            _ => Err(BattleStateError::InvalidPlayerIndex(index)),
        }
    }
}

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Direct state changes
    SetGameState(GameState),
    SetCurrentActor(PlayerTarget),
    /// Who opens each round from now on.
    SetFirstActor(PlayerTarget),
    IncrementRound,

    // Combatant modifications
    /// Damage from the opponent's move; credited to the opponent's running total.
    DealDamage {
        target: PlayerTarget,
        amount: u32,
        critical: bool,
        effectiveness: Effectiveness,
    },
    /// Damage-over-time from burn. Not credited to either side's damage total,
    /// so it never sways the round-cap decision.
    BurnDamage {
        target: PlayerTarget,
        amount: u32,
    },
    Heal {
        target: PlayerTarget,
        amount: u32,
    },
    SetBurnTurns {
        target: PlayerTarget,
        turns: u8,
    },
    SetSleepTurns {
        target: PlayerTarget,
        turns: u8,
    },
    RaiseStatStage {
        target: PlayerTarget,
        stat: BuffStat,
        stages: u8,
    },

    // Battle flow
    EmitEvent(BattleEvent),
}

/// Execute a batch of commands in order.
pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), BattleStateError> {
    for command in commands {
        execute_command(command, state, bus)?;
    }
    Ok(())
}

fn ensure_running(state: &BattleState) -> Result<(), BattleStateError> {
    if state.game_state.is_finished() {
        return Err(BattleStateError::InconsistentState(format!(
            "battle {} already ended; refusing further mutation",
            state.battle_id
        )));
    }
    Ok(())
}

/// Emit a faint event when the target has just reached zero HP.
fn emit_if_fainted(target: PlayerTarget, state: &BattleState, bus: &mut EventBus) {
    let combatant = &state.players[target.to_index()].combatant;
    if combatant.is_fainted() {
        bus.push(BattleEvent::Fainted {
            player_index: target.to_index(),
            species: combatant.species,
        });
    }
}

fn execute_command(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), BattleStateError> {
    match command {
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
        }
        BattleCommand::SetGameState(game_state) => {
            state.game_state = game_state;
        }
        BattleCommand::SetCurrentActor(target) => {
            state.current_actor = target.to_index();
        }
        BattleCommand::SetFirstActor(target) => {
            state.first_actor = target.to_index();
        }
        BattleCommand::IncrementRound => {
            state.round += 1;
        }
        BattleCommand::DealDamage {
            target,
            amount,
            critical,
            effectiveness,
        } => {
            ensure_running(state)?;
            let defender = &mut state.players[target.to_index()].combatant;
            let lost = defender.take_damage(amount);
            let species = defender.species;
            let remaining_hp = defender.current_hp();
            let attacker = &mut state.players[target.opponent().to_index()];
            attacker.damage_dealt = attacker.damage_dealt.saturating_add(lost);

            bus.push(BattleEvent::DamageDealt {
                target: target.to_index(),
                species,
                damage: amount,
                remaining_hp,
                critical,
                effectiveness,
            });
            emit_if_fainted(target, state, bus);
        }
        BattleCommand::BurnDamage { target, amount } => {
            ensure_running(state)?;
            let combatant = &mut state.players[target.to_index()].combatant;
            combatant.take_damage(amount);
            bus.push(BattleEvent::BurnDamage {
                player_index: target.to_index(),
                species: combatant.species,
                damage: amount,
                remaining_hp: combatant.current_hp(),
            });
            emit_if_fainted(target, state, bus);
        }
        BattleCommand::Heal { target, amount } => {
            ensure_running(state)?;
            let combatant = &mut state.players[target.to_index()].combatant;
            let restored = combatant.heal(amount);
            bus.push(BattleEvent::Healed {
                player_index: target.to_index(),
                species: combatant.species,
                amount: restored,
                new_hp: combatant.current_hp(),
            });
        }
        BattleCommand::SetBurnTurns { target, turns } => {
            state.players[target.to_index()].combatant.burn_turns = turns;
        }
        BattleCommand::SetSleepTurns { target, turns } => {
            state.players[target.to_index()].combatant.sleep_turns = turns;
        }
        BattleCommand::RaiseStatStage {
            target,
            stat,
            stages,
        } => {
            let max_stage = state.config.max_stat_stage;
            let combatant = &mut state.players[target.to_index()].combatant;
            let new_stage = combatant.raise_stat_stage(stat, stages, max_stage);
            bus.push(BattleEvent::StatStageRaised {
                player_index: target.to_index(),
                species: combatant.species,
                stat,
                new_stage,
            });
        }
    }
    Ok(())
}
