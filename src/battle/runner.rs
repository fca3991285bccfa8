use crate::battle::ai::{random_behaviors, Behavior, BehaviorSet};
use crate::battle::engine;
use crate::battle::state::{BattleEvent, BattleState, EndReason, EventBus, GameState, TurnRng};
use crate::config::EngineConfig;
use crate::errors::{BattleResult, BattleStateError};
use crate::player::{BattlePlayer, PlayerAction};

/// High-level battle management interface over the engine's entry points.
/// Owns the state, the random source and the AI for automated combatants.
pub struct BattleRunner {
    battle_state: BattleState,
    rng: TurnRng,
    behaviors: BehaviorSet,
    accumulated_events: Vec<BattleEvent>,
}

/// Final result of a finished battle, consumed by settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub winner_index: usize,
    pub loser_index: usize,
    pub reason: EndReason,
    pub rounds: u32,
    pub damage_dealt: [u32; 2],
    pub final_hp: [u32; 2],
}

impl BattleRunner {
    pub fn new(
        battle_id: impl Into<String>,
        player1: BattlePlayer,
        player2: BattlePlayer,
        config: EngineConfig,
        rng: TurnRng,
    ) -> Self {
        Self {
            battle_state: BattleState::with_config(battle_id, player1, player2, config),
            rng,
            behaviors: random_behaviors(),
            accumulated_events: Vec::new(),
        }
    }

    /// Swap the AI used for an automated slot.
    pub fn with_behavior(mut self, player_index: usize, behavior: Box<dyn Behavior>) -> Self {
        if let Some(slot) = self.behaviors.get_mut(player_index) {
            *slot = behavior;
        }
        self
    }

    pub fn state(&self) -> &BattleState {
        &self.battle_state
    }

    pub fn is_battle_ended(&self) -> bool {
        self.battle_state.game_state.is_finished()
    }

    pub fn get_winner(&self) -> Option<usize> {
        self.battle_state.winner()
    }

    /// The player whose move is awaited, if any.
    pub fn awaiting(&self) -> Option<usize> {
        self.battle_state.game_state.waiting_for()
    }

    /// Every event emitted so far, in order.
    pub fn get_all_events(&self) -> &[BattleEvent] {
        &self.accumulated_events
    }

    pub fn start(&mut self) -> BattleResult<Vec<BattleEvent>> {
        let bus = engine::start_battle(&mut self.battle_state, &mut self.rng, &self.behaviors)?;
        Ok(self.record(bus))
    }

    pub fn submit_action(
        &mut self,
        player_index: usize,
        action: PlayerAction,
    ) -> BattleResult<Vec<BattleEvent>> {
        let bus = engine::submit_action(
            &mut self.battle_state,
            player_index,
            action,
            &mut self.rng,
            &self.behaviors,
        )?;
        Ok(self.record(bus))
    }

    pub fn forfeit(&mut self, player_index: usize) -> BattleResult<Vec<BattleEvent>> {
        let bus = engine::forfeit(&mut self.battle_state, player_index)?;
        Ok(self.record(bus))
    }

    /// Start if needed and play an all-automated battle to the end.
    pub fn run_to_completion(&mut self) -> BattleResult<Vec<BattleEvent>> {
        let mut events = Vec::new();
        if self.battle_state.game_state == GameState::NotStarted {
            events.extend(self.start()?);
        }
        if let Some(waiting) = self.awaiting() {
            return Err(BattleStateError::InconsistentState(format!(
                "battle {} is waiting on interactive player {}",
                self.battle_state.battle_id, waiting
            ))
            .into());
        }
        Ok(events)
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        let winner_index = self.battle_state.winner()?;
        let reason = self.battle_state.end_reason?;
        let players = &self.battle_state.players;
        Some(BattleOutcome {
            winner_index,
            loser_index: 1 - winner_index,
            reason,
            rounds: self.battle_state.round,
            damage_dealt: [players[0].damage_dealt, players[1].damage_dealt],
            final_hp: [
                players[0].combatant.current_hp(),
                players[1].combatant.current_hp(),
            ],
        })
    }

    /// Render the full log with the default text format.
    pub fn render_log(&self) -> Vec<String> {
        self.accumulated_events
            .iter()
            .filter_map(|e| e.format(&self.battle_state))
            .collect()
    }

    fn record(&mut self, bus: EventBus) -> Vec<BattleEvent> {
        let events = bus.into_events();
        self.accumulated_events.extend(events.iter().cloned());
        events
    }
}

impl std::fmt::Debug for BattleRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleRunner")
            .field("battle_state", &self.battle_state)
            .field("events", &self.accumulated_events.len())
            .finish()
    }
}
