use crate::battle::runner::BattleOutcome;
use crate::config::XpPolicy;

// Scaled policy coefficients
const SCALED_WINNER_BASE: f64 = 50.0;
const SCALED_WINNER_PER_ROUND: f64 = 4.0;
const SCALED_WINNER_PER_DAMAGE: f64 = 0.06;
const SCALED_LOSER_BASE: f64 = 28.0;
const SCALED_LOSER_PER_ROUND: f64 = 3.0;
const SCALED_LOSER_PER_DAMAGE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    pub winner: u32,
    pub loser: u32,
}

/// Calculator for experience awarded after a decisive battle.
#[derive(Debug, Clone, Default)]
pub struct RewardCalculator {
    policy: XpPolicy,
}

impl RewardCalculator {
    pub fn new(policy: XpPolicy) -> Self {
        Self { policy }
    }

    /// The winner always receives strictly more than the loser.
    pub fn award(&self, outcome: &BattleOutcome) -> XpAward {
        match self.policy {
            XpPolicy::Flat { winner, loser } => XpAward {
                winner: winner.max(loser + 1),
                loser,
            },
            XpPolicy::Scaled => {
                let rounds = outcome.rounds as f64;
                let winner_dealt = outcome.damage_dealt[outcome.winner_index] as f64;
                let loser_dealt = outcome.damage_dealt[outcome.loser_index] as f64;

                let winner = (SCALED_WINNER_BASE
                    + rounds * SCALED_WINNER_PER_ROUND
                    + winner_dealt * SCALED_WINNER_PER_DAMAGE) as u32;
                let loser = (SCALED_LOSER_BASE
                    + rounds * SCALED_LOSER_PER_ROUND
                    + loser_dealt * SCALED_LOSER_PER_DAMAGE) as u32;

                XpAward {
                    winner,
                    loser: loser.min(winner.saturating_sub(1)),
                }
            }
        }
    }
}
