//! A module for defining AI behaviors for automated combatants.

use crate::battle::state::{BattleState, TurnRng};
use crate::move_data::get_move_data;
use crate::player::PlayerAction;
use ordered_float::OrderedFloat;
use schema::{ElementType, MoveKind};

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI strategies.
pub trait Behavior: Send + Sync {
    /// Inspects the battle state and decides on the next action for the given player.
    fn decide_action(
        &self,
        player_index: usize,
        battle_state: &BattleState,
        rng: &mut TurnRng,
    ) -> PlayerAction;
}

/// One behavior per battle slot.
pub type BehaviorSet = [Box<dyn Behavior>; 2];

pub fn random_behaviors() -> BehaviorSet {
    [Box::new(RandomAI), Box::new(RandomAI)]
}

/// Indices of the moves an automated combatant may draw from.
fn offensive_move_indices(player_index: usize, battle_state: &BattleState) -> Vec<usize> {
    battle_state.players[player_index]
        .combatant
        .moves
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            get_move_data(**m)
                .map(|data| data.kind.is_offensive())
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Uniform choice among damage and status moves.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAI;

impl Behavior for RandomAI {
    fn decide_action(
        &self,
        player_index: usize,
        battle_state: &BattleState,
        rng: &mut TurnRng,
    ) -> PlayerAction {
        let candidates = offensive_move_indices(player_index, battle_state);
        if candidates.is_empty() {
            return PlayerAction::UseMove { move_index: 0 };
        }
        let pick = rng.pick_index(candidates.len(), "AI Move Choice");
        PlayerAction::UseMove {
            move_index: candidates[pick],
        }
    }
}

/// Heals when low, occasionally buffs, otherwise picks the move with the
/// best expected damage against the current opponent.
#[derive(Debug, Default, Clone, Copy)]
pub struct TacticalAI;

impl TacticalAI {
    pub fn new() -> Self {
        Self
    }

    fn score_move(&self, move_index: usize, player_index: usize, state: &BattleState) -> f64 {
        let attacker = &state.players[player_index].combatant;
        let defender = &state.players[1 - player_index].combatant;
        let Ok(move_data) = get_move_data(attacker.moves[move_index]) else {
            return -1.0;
        };

        match &move_data.kind {
            MoveKind::SleepStatus { .. } => {
                // Only worth it against an awake target.
                if defender.is_asleep() {
                    -1.0
                } else {
                    30.0 * move_data.accuracy
                }
            }
            kind if kind.is_damaging() => {
                let (multiplier, _) = ElementType::effectiveness(attacker.element, defender.element);
                let crit_bonus = match kind {
                    MoveKind::HighCritDamage { crit_bonus } => 1.0 + crit_bonus,
                    _ => 1.0,
                };
                move_data.power as f64 * move_data.accuracy * multiplier * crit_bonus
            }
            _ => -1.0,
        }
    }

    fn find_move(
        &self,
        player_index: usize,
        state: &BattleState,
        wanted: impl Fn(&MoveKind) -> bool,
    ) -> Option<usize> {
        state.players[player_index]
            .combatant
            .moves
            .iter()
            .position(|m| get_move_data(*m).map(|d| wanted(&d.kind)).unwrap_or(false))
    }
}

impl Behavior for TacticalAI {
    fn decide_action(
        &self,
        player_index: usize,
        battle_state: &BattleState,
        rng: &mut TurnRng,
    ) -> PlayerAction {
        let config = &battle_state.config;
        let me = &battle_state.players[player_index].combatant;

        if me.hp_fraction() < config.heal_threshold {
            if let Some(move_index) =
                self.find_move(player_index, battle_state, |k| matches!(k, MoveKind::Heal { .. }))
            {
                tracing::debug!(player_index, move_index, "tactical AI heals");
                return PlayerAction::UseMove { move_index };
            }
        }

        let usable_buff = self.find_move(player_index, battle_state, |k| match k {
            MoveKind::BuffStat { stat, .. } => me.stat_stage(*stat) < config.max_stat_stage,
            _ => false,
        });
        if let Some(move_index) = usable_buff {
            if rng.chance(config.buff_chance, "AI Buff Roll") {
                tracing::debug!(player_index, move_index, "tactical AI buffs");
                return PlayerAction::UseMove { move_index };
            }
        }

        offensive_move_indices(player_index, battle_state)
            .into_iter()
            .max_by_key(|&i| OrderedFloat(self.score_move(i, player_index, battle_state)))
            .map(|move_index| PlayerAction::UseMove { move_index })
            .unwrap_or(PlayerAction::UseMove { move_index: 0 })
    }
}
