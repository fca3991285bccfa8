//! Tunable constants for the engine and the arena, loadable from RON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed config: {0}")]
    Parse(String),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Battle tunables. Defaults match the canonical rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub round_cap: u32,
    pub crit_multiplier: f64,
    pub base_crit_chance: f64,
    pub burn_turns: u8,
    pub burn_fraction: f64,
    pub min_burn_damage: u16,
    pub defense_stage_step: f64,
    pub speed_stage_step: f64,
    pub max_stat_stage: u8,
    pub jitter_min: f64,
    pub jitter_max: f64,
    /// Below this HP fraction the tactical AI reaches for a heal move.
    pub heal_threshold: f64,
    /// Chance per turn that the tactical AI uses an available buff.
    pub buff_chance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_cap: 24,
            crit_multiplier: 1.5,
            base_crit_chance: 0.08,
            burn_turns: 3,
            burn_fraction: 0.06,
            min_burn_damage: 2,
            defense_stage_step: 0.12,
            speed_stage_step: 0.12,
            max_stat_stage: 3,
            jitter_min: 0.92,
            jitter_max: 1.08,
            heal_threshold: 0.38,
            buff_chance: 0.15,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_cap == 0 {
            return Err(ConfigError::Invalid("round_cap must be at least 1".to_string()));
        }
        if self.crit_multiplier < 1.0 {
            return Err(ConfigError::Invalid("crit_multiplier must be >= 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.base_crit_chance) {
            return Err(ConfigError::Invalid("base_crit_chance must lie in [0, 1]".to_string()));
        }
        if self.jitter_min <= 0.0 || self.jitter_min > self.jitter_max {
            return Err(ConfigError::Invalid("jitter band must be positive and ordered".to_string()));
        }
        Ok(())
    }
}

/// How much experience each side receives after a decisive battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XpPolicy {
    Flat { winner: u32, loser: u32 },
    /// Rewards grow with battle length and damage dealt.
    Scaled,
}

impl Default for XpPolicy {
    fn default() -> Self {
        XpPolicy::Flat { winner: 45, loser: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub engine: EngineConfig,
    pub xp_policy: XpPolicy,
    /// Seconds an interactive player has to pick a move before forfeiting.
    pub move_timeout_secs: u64,
    pub daily_item_grant: u32,
    pub item_cap: u32,
    /// Backing file for the JSON player store; in-memory when absent.
    pub player_store_path: Option<PathBuf>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            xp_policy: XpPolicy::default(),
            move_timeout_secs: 120,
            daily_item_grant: 1,
            item_cap: 5,
            player_store_path: None,
        }
    }
}

impl ArenaConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: ArenaConfig =
            ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.engine.validate()?;
        if let XpPolicy::Flat { winner, loser } = config.xp_policy {
            if winner <= loser {
                return Err(ConfigError::Invalid(
                    "winner XP must exceed loser XP".to_string(),
                ));
            }
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = ArenaConfig::from_ron_str("(move_timeout_secs: 30, engine: (round_cap: 10))")
            .expect("valid config");
        assert_eq!(config.move_timeout_secs, 30);
        assert_eq!(config.engine.round_cap, 10);
        assert_eq!(config.engine.crit_multiplier, 1.5);
        assert_eq!(config.xp_policy, XpPolicy::Flat { winner: 45, loser: 20 });
    }

    #[test]
    fn test_rejects_flat_policy_that_favors_loser() {
        let result = ArenaConfig::from_ron_str("(xp_policy: Flat(winner: 10, loser: 20))");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_round_cap() {
        let result = ArenaConfig::from_ron_str("(engine: (round_cap: 0))");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
