use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// The elemental affinity of a champion.
///
/// The three elements form a closed dominance cycle:
/// Fire beats Nature, Nature beats Water, Water beats Fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum ElementType {
    Fire,
    Water,
    Nature,
}

/// Qualitative label attached to a type matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effectiveness {
    Strong,
    Weak,
    Neutral,
}

pub const STRONG_MULTIPLIER: f64 = 1.5;
pub const WEAK_MULTIPLIER: f64 = 0.67;
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl ElementType {
    /// The element this one deals boosted damage to.
    pub fn strong_against(self) -> ElementType {
        match self {
            ElementType::Fire => ElementType::Nature,
            ElementType::Nature => ElementType::Water,
            ElementType::Water => ElementType::Fire,
        }
    }

    /// The element this one deals reduced damage to.
    pub fn weak_to(self) -> ElementType {
        match self {
            ElementType::Fire => ElementType::Water,
            ElementType::Water => ElementType::Nature,
            ElementType::Nature => ElementType::Fire,
        }
    }

    /// Calculate the damage multiplier and label for an attacking element
    /// against a defending element.
    pub fn effectiveness(attacking: ElementType, defending: ElementType) -> (f64, Effectiveness) {
        if attacking.strong_against() == defending {
            (STRONG_MULTIPLIER, Effectiveness::Strong)
        } else if attacking.weak_to() == defending {
            (WEAK_MULTIPLIER, Effectiveness::Weak)
        } else {
            (NEUTRAL_MULTIPLIER, Effectiveness::Neutral)
        }
    }
}

impl Effectiveness {
    pub fn multiplier(self) -> f64 {
        match self {
            Effectiveness::Strong => STRONG_MULTIPLIER,
            Effectiveness::Weak => WEAK_MULTIPLIER,
            Effectiveness::Neutral => NEUTRAL_MULTIPLIER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_cycle_is_closed() {
        assert_eq!(ElementType::Fire.strong_against(), ElementType::Nature);
        assert_eq!(ElementType::Nature.strong_against(), ElementType::Water);
        assert_eq!(ElementType::Water.strong_against(), ElementType::Fire);
    }

    #[test]
    fn test_no_mutual_dominance_and_no_self_dominance() {
        for a in ElementType::iter() {
            assert_ne!(a.strong_against(), a, "{} must not beat itself", a);
            for b in ElementType::iter() {
                if a.strong_against() == b {
                    assert_ne!(b.strong_against(), a, "{} and {} both dominate each other", a, b);
                    assert_eq!(ElementType::effectiveness(b, a).1, Effectiveness::Weak);
                }
            }
        }
    }

    #[test]
    fn test_same_element_is_neutral() {
        for a in ElementType::iter() {
            assert_eq!(ElementType::effectiveness(a, a), (1.0, Effectiveness::Neutral));
        }
    }

    #[test]
    fn test_strong_and_weak_multipliers_differ() {
        assert_ne!(Effectiveness::Strong.multiplier(), Effectiveness::Weak.multiplier());
        assert_eq!(
            ElementType::effectiveness(ElementType::Fire, ElementType::Nature),
            (1.5, Effectiveness::Strong)
        );
        assert_eq!(
            ElementType::effectiveness(ElementType::Fire, ElementType::Water),
            (0.67, Effectiveness::Weak)
        );
    }
}
