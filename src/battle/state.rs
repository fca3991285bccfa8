use crate::config::EngineConfig;
use crate::player::BattlePlayer;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use schema::{BuffStat, Effectiveness, Move, Species};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Copy)]
pub enum GameState {
    NotStarted,
    TurnInProgress,
    WaitingForPlayer1Move, // Interactive player 1 must pick a move
    WaitingForPlayer2Move, // Interactive player 2 must pick a move
    Player1Win,
    Player2Win,
}

impl GameState {
    pub fn is_finished(self) -> bool {
        matches!(self, GameState::Player1Win | GameState::Player2Win)
    }

    pub fn waiting_for(self) -> Option<usize> {
        match self {
            GameState::WaitingForPlayer1Move => Some(0),
            GameState::WaitingForPlayer2Move => Some(1),
            _ => None,
        }
    }

    pub fn waiting_for_player(player_index: usize) -> GameState {
        if player_index == 0 {
            GameState::WaitingForPlayer1Move
        } else {
            GameState::WaitingForPlayer2Move
        }
    }

    pub fn win_for(player_index: usize) -> GameState {
        if player_index == 0 {
            GameState::Player1Win
        } else {
            GameState::Player2Win
        }
    }
}

/// Why a battle stopped.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Knockout,
    RoundCap,
    Forfeit,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Battle Setup
    BattleStarted {
        round_cap: u32,
    },
    ChampionSentOut {
        player_index: usize,
        species: Species,
        level: u32,
        hp: u32,
        max_hp: u32,
    },
    FirstMover {
        player_index: usize,
    },
    RoundStarted {
        round: u32,
    },

    // Move Resolution
    MoveUsed {
        player_index: usize,
        species: Species,
        move_used: Move,
    },
    MoveMissed {
        player_index: usize,
        move_used: Move,
    },
    DamageDealt {
        target: usize,
        species: Species,
        damage: u32,
        remaining_hp: u32,
        critical: bool,
        effectiveness: Effectiveness,
    },
    Healed {
        player_index: usize,
        species: Species,
        amount: u32,
        new_hp: u32,
    },
    StatStageRaised {
        player_index: usize,
        species: Species,
        stat: BuffStat,
        new_stage: u8,
    },

    // Status Effects
    FellAsleep {
        target: usize,
        species: Species,
        turns: u8,
    },
    AlreadyAsleep {
        target: usize,
        species: Species,
    },
    Burned {
        target: usize,
        species: Species,
        turns: u8,
    },
    BurnDamage {
        player_index: usize,
        species: Species,
        damage: u32,
        remaining_hp: u32,
    },
    CannotMove {
        player_index: usize,
        species: Species,
    },

    // Interactive Mode
    MoveRequested {
        player_index: usize,
        moves: Vec<Move>,
    },

    // HUD
    HpStatus {
        hp: [u32; 2],
        max_hp: [u32; 2],
    },

    // Battle End
    Fainted {
        player_index: usize,
        species: Species,
    },
    Forfeited {
        player_index: usize,
    },
    RoundCapReached {
        damage_dealt: [u32; 2],
    },
    BattleEnded {
        winner: usize,
        reason: EndReason,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let player_name = |index: usize| battle_state.players[index].player_name.as_str();

        match self {
            // === Setup Events ===
            BattleEvent::BattleStarted { .. } => Some("BATTLE START".to_string()),
            BattleEvent::ChampionSentOut { player_index, species, level, hp, max_hp } => Some(format!(
                "{} sent out {} (Lv.{})! HP {}/{}",
                player_name(*player_index),
                species,
                level,
                hp,
                max_hp
            )),
            BattleEvent::FirstMover { player_index } => Some(format!(
                "{} moves first!",
                battle_state.players[*player_index].combatant.name()
            )),
            BattleEvent::RoundStarted { round } => Some(format!("=== Round {} ===", round)),

            // === Move Events ===
            BattleEvent::MoveUsed { species, move_used, .. } => {
                Some(format!("{} used {}!", species, move_used))
            }
            BattleEvent::MoveMissed { .. } => Some("It missed!".to_string()),
            BattleEvent::DamageDealt { damage, critical, effectiveness, .. } => {
                let mut text = format!("Hit: {} damage", damage);
                if *critical {
                    text.push_str(" CRIT!");
                }
                match effectiveness {
                    Effectiveness::Strong => text.push_str(" It's super effective!"),
                    Effectiveness::Weak => text.push_str(" It's not very effective..."),
                    Effectiveness::Neutral => {}
                }
                Some(text)
            }
            BattleEvent::Healed { species, amount, .. } => {
                Some(format!("{} recovered {} HP!", species, amount))
            }
            BattleEvent::StatStageRaised { species, stat, new_stage, .. } => {
                Some(format!("{}'s {} rose! (stage {})", species, stat, new_stage))
            }

            // === Status Events ===
            BattleEvent::FellAsleep { species, turns, .. } => Some(format!(
                "{} fell asleep! ({} turn{})",
                species,
                turns,
                if *turns == 1 { "" } else { "s" }
            )),
            BattleEvent::AlreadyAsleep { species, .. } => {
                Some(format!("{} is already asleep!", species))
            }
            BattleEvent::Burned { species, turns, .. } => {
                Some(format!("{} was burned! ({} turns)", species, turns))
            }
            BattleEvent::BurnDamage { species, damage, .. } => {
                Some(format!("{} is hurt by burn! (-{})", species, damage))
            }
            BattleEvent::CannotMove { species, .. } => {
                Some(format!("{} is asleep and can't move!", species))
            }

            // === Interactive Events ===
            BattleEvent::MoveRequested { player_index, moves } => {
                let options: Vec<String> = moves
                    .iter()
                    .enumerate()
                    .map(|(i, m)| format!("{}. {}", i + 1, m))
                    .collect();
                Some(format!(
                    "{}, choose a move: {}",
                    player_name(*player_index),
                    options.join(" | ")
                ))
            }

            // === HUD ===
            BattleEvent::HpStatus { hp, max_hp } => Some(format!(
                "{}: {}/{} | {}: {}/{}",
                battle_state.players[0].combatant.name(),
                hp[0],
                max_hp[0],
                battle_state.players[1].combatant.name(),
                hp[1],
                max_hp[1]
            )),

            // === Battle End Events ===
            BattleEvent::Fainted { species, .. } => Some(format!("{} fainted!", species)),
            BattleEvent::Forfeited { player_index } => {
                Some(format!("{} forfeits the battle!", player_name(*player_index)))
            }
            BattleEvent::RoundCapReached { .. } => {
                Some("Time is up! The judges compare damage dealt...".to_string())
            }
            BattleEvent::BattleEnded { winner, .. } => Some(format!(
                "Winner: {} with {}!",
                player_name(*winner),
                battle_state.players[*winner].combatant.name()
            )),
        }
    }
}

/// Event bus for collecting and managing battle events.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, other: EventBus) {
        self.events.extend(other.events);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(Box<ChaCha8Rng>),
    Scripted { outcomes: Vec<f64>, index: usize },
}

/// The single source of randomness for a battle.
///
/// Seeded sources make whole battles reproducible; scripted sources replay a
/// fixed list of uniform draws so tests can force specific outcomes.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(Box::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    pub fn new_random() -> Self {
        Self::seeded(rand::random::<u64>())
    }

    /// Replay the given draws in order. Each value must lie in `[0, 1)`.
    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    /// A uniform draw in `[0, 1)`.
    pub fn next_outcome(&mut self, reason: &str) -> f64 {
        let outcome = match &mut self.source {
            RngSource::Seeded(rng) => rng.random::<f64>(),
            RngSource::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;
                outcome
            }
        };
        tracing::trace!(outcome, reason, "rng draw");
        outcome
    }

    /// True with the given probability.
    pub fn chance(&mut self, probability: f64, reason: &str) -> bool {
        self.next_outcome(reason) < probability
    }

    /// A uniform value in `[low, high)`.
    pub fn uniform(&mut self, low: f64, high: f64, reason: &str) -> f64 {
        low + (high - low) * self.next_outcome(reason)
    }

    /// A uniform integer in `low..=high`.
    pub fn range_inclusive(&mut self, low: u8, high: u8, reason: &str) -> u8 {
        let span = high.saturating_sub(low);
        let offset = (self.next_outcome(reason) * (span as f64 + 1.0)) as u8;
        low + offset.min(span)
    }

    /// A uniform index into a collection of `len` items. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize, reason: &str) -> usize {
        let index = (self.next_outcome(reason) * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub players: [BattlePlayer; 2],
    pub round: u32,
    /// Index of the player who acts first in every round.
    pub first_actor: usize,
    /// Index of the player whose turn is being resolved or awaited.
    pub current_actor: usize,
    pub game_state: GameState,
    pub end_reason: Option<EndReason>,
    pub config: EngineConfig,
}

impl BattleState {
    pub fn new(id: impl Into<String>, player1: BattlePlayer, player2: BattlePlayer) -> Self {
        Self::with_config(id, player1, player2, EngineConfig::default())
    }

    pub fn with_config(
        id: impl Into<String>,
        player1: BattlePlayer,
        player2: BattlePlayer,
        config: EngineConfig,
    ) -> Self {
        Self {
            battle_id: id.into(),
            players: [player1, player2],
            round: 0,
            first_actor: 0,
            current_actor: 0,
            game_state: GameState::NotStarted,
            end_reason: None,
            config,
        }
    }

    pub fn winner(&self) -> Option<usize> {
        match self.game_state {
            GameState::Player1Win => Some(0),
            GameState::Player2Win => Some(1),
            _ => None,
        }
    }

    pub fn hp_status(&self) -> BattleEvent {
        BattleEvent::HpStatus {
            hp: [
                self.players[0].combatant.current_hp(),
                self.players[1].combatant.current_hp(),
            ],
            max_hp: [
                self.players[0].combatant.max_hp(),
                self.players[1].combatant.max_hp(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestCombatantBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scripted_rng_replays_in_order() {
        let mut rng = TurnRng::new_for_test(vec![0.1, 0.9, 0.5]);
        assert_eq!(rng.next_outcome("a"), 0.1);
        assert!(!rng.chance(0.5, "b"));
        assert_eq!(rng.range_inclusive(1, 2, "c"), 2);
    }

    #[test]
    #[should_panic(expected = "TurnRng exhausted")]
    fn test_scripted_rng_panics_when_exhausted() {
        let mut rng = TurnRng::new_for_test(vec![]);
        rng.next_outcome("nothing left");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = TurnRng::seeded(7);
        let mut b = TurnRng::seeded(7);
        for _ in 0..10 {
            assert_eq!(a.next_outcome("x"), b.next_outcome("x"));
        }
    }

    #[test]
    fn test_range_inclusive_covers_both_ends() {
        let mut rng = TurnRng::new_for_test(vec![0.0, 0.999]);
        assert_eq!(rng.range_inclusive(1, 3, "low"), 1);
        assert_eq!(rng.range_inclusive(1, 3, "high"), 3);
    }

    #[test]
    fn test_damage_event_text() {
        let state = create_test_battle(
            TestCombatantBuilder::new(schema::Species::Suimander, 1).build(),
            TestCombatantBuilder::new(schema::Species::Basaurimon, 1).build(),
        );
        let event = BattleEvent::DamageDealt {
            target: 1,
            species: schema::Species::Basaurimon,
            damage: 55,
            remaining_hp: 55,
            critical: true,
            effectiveness: Effectiveness::Strong,
        };
        assert_eq!(
            event.format(&state),
            Some("Hit: 55 damage CRIT! It's super effective!".to_string())
        );
    }

    #[test]
    fn test_round_header_text() {
        let state = create_test_battle(
            TestCombatantBuilder::new(schema::Species::Suimander, 1).build(),
            TestCombatantBuilder::new(schema::Species::Basaurimon, 1).build(),
        );
        assert_eq!(
            BattleEvent::RoundStarted { round: 3 }.format(&state),
            Some("=== Round 3 ===".to_string())
        );
    }
}
