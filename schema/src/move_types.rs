use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Move {
    // Nature
    VineWhip,
    RazorLeaf,
    LeafStorm,
    SleepSpore,
    Synthesis,

    // Fire
    Ember,
    Flamethrower,
    InfernoClaw,
    FireFang,
    FlameCharge,

    // Water
    WaterGun,
    BubbleBeam,
    AquaTail,
    HydroBurst,
    Withdraw,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Move::VineWhip => "Vine Whip",
            Move::RazorLeaf => "Razor Leaf",
            Move::LeafStorm => "Leaf Storm",
            Move::SleepSpore => "Sleep Spore",
            Move::Synthesis => "Synthesis",
            Move::Ember => "Ember",
            Move::Flamethrower => "Flamethrower",
            Move::InfernoClaw => "Inferno Claw",
            Move::FireFang => "Fire Fang",
            Move::FlameCharge => "Flame Charge",
            Move::WaterGun => "Water Gun",
            Move::BubbleBeam => "Bubble Beam",
            Move::AquaTail => "Aqua Tail",
            Move::HydroBurst => "Hydro Burst",
            Move::Withdraw => "Withdraw",
        };
        write!(f, "{}", display_name)
    }
}

/// Stats that support moves can raise in stages.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuffStat {
    Defense,
    Speed,
}

impl fmt::Display for BuffStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuffStat::Defense => write!(f, "Defense"),
            BuffStat::Speed => write!(f, "Speed"),
        }
    }
}

/// What a move does once it connects. Each variant carries only the
/// parameters its kind needs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum MoveKind {
    Damage,
    DamageWithBurn { burn_chance: f64 },
    HighCritDamage { crit_bonus: f64 },
    SleepStatus { min_turns: u8, max_turns: u8 },
    Heal { fraction: f64 },
    BuffStat { stat: BuffStat, stages: u8 },
}

impl MoveKind {
    /// Damage-dealing kinds. These use the damage formula.
    pub fn is_damaging(&self) -> bool {
        matches!(
            self,
            MoveKind::Damage | MoveKind::DamageWithBurn { .. } | MoveKind::HighCritDamage { .. }
        )
    }

    /// Kinds that inflict a status on the target.
    pub fn is_status(&self) -> bool {
        matches!(self, MoveKind::SleepStatus { .. })
    }

    /// Kinds the fully automated opponent draws from.
    pub fn is_offensive(&self) -> bool {
        self.is_damaging() || self.is_status()
    }
}

/// Immutable catalog entry for a move.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveData {
    pub id: Move,
    pub power: u16,
    pub accuracy: f64,
    pub kind: MoveKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offensive_kinds() {
        assert!(MoveKind::Damage.is_offensive());
        assert!(MoveKind::DamageWithBurn { burn_chance: 0.3 }.is_offensive());
        assert!(MoveKind::HighCritDamage { crit_bonus: 0.1 }.is_offensive());
        assert!(MoveKind::SleepStatus { min_turns: 1, max_turns: 2 }.is_offensive());
        assert!(!MoveKind::Heal { fraction: 0.25 }.is_offensive());
        assert!(!MoveKind::BuffStat { stat: BuffStat::Speed, stages: 1 }.is_offensive());
    }

    #[test]
    fn test_move_display_names() {
        assert_eq!(Move::VineWhip.to_string(), "Vine Whip");
        assert_eq!(Move::InfernoClaw.to_string(), "Inferno Claw");
        assert_eq!(Move::Flamethrower.to_string(), "Flamethrower");
    }
}
