//! Suimon Arena battle engine
//!
//! A turn-based creature battle system for chat-style hosts: one champion per
//! player, seeded and replayable battle resolution, structured narrative
//! events, and persistent progression settled once per battle.

// --- MODULE DECLARATIONS ---
pub mod arena;
pub mod battle;
pub mod champion;
pub mod config;
pub mod errors;
pub mod move_data;
pub mod player;
pub mod progression;
pub mod repository;
pub mod species;

// --- PUBLIC API RE-EXPORTS ---

// Static data definitions from the `schema` crate.
pub use schema::{
    BaseStats, BuffStat, Effectiveness, ElementType, Move, MoveData, MoveKind, Species, SpeciesData,
};

// Battle engine entry points and state.
pub use battle::ai::{Behavior, RandomAI, TacticalAI};
pub use battle::engine::{forfeit, start_battle, submit_action};
pub use battle::runner::{BattleOutcome, BattleRunner};
pub use battle::state::{BattleEvent, BattleState, EndReason, EventBus, GameState, TurnRng};

// Runtime types.
pub use champion::Combatant;
pub use player::{BattlePlayer, PlayerAction, PlayerRecord, PlayerType};

// Catalog access.
pub use move_data::get_move_data;
pub use species::get_species_data;

pub use arena::{Arena, ArenaError, ArenaResult, BattleReport, InteractiveUpdate};
pub use config::{ArenaConfig, ConfigError, EngineConfig, XpPolicy};
pub use progression::{settle, RewardCalculator, SettlementReport};
pub use repository::{InMemoryPlayerRepo, JsonFilePlayerRepo, PlayerRepository, RepositoryError};

pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, MoveDataError, MoveDataResult,
    PreconditionError, SpeciesDataError, SpeciesDataResult,
};
