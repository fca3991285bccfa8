//! Post-battle progression: experience, levels and record updates.

pub mod leveling;
pub mod rewards;
pub mod settlement;

pub use leveling::{apply_experience, xp_needed, LevelUpResult};
pub use rewards::{RewardCalculator, XpAward};
pub use settlement::{settle, PlayerSettlement, SettlementError, SettlementReport};
