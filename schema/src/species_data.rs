use crate::{ElementType, Move};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Species {
    Basaurimon,
    Suimander,
    Suiqrtle,
}

impl Species {
    pub fn name(&self) -> &'static str {
        match self {
            Species::Basaurimon => "Basaurimon",
            Species::Suimander => "Suimander",
            Species::Suiqrtle => "Suiqrtle",
        }
    }

    /// Resolve a user-typed champion name or nickname.
    pub fn from_alias(input: &str) -> Option<Species> {
        match input.trim().to_lowercase().as_str() {
            "basaur" | "basaurimon" => Some(Species::Basaurimon),
            "suimander" | "mander" => Some(Species::Suimander),
            "suiqrtle" | "squirtle" | "qrtle" => Some(Species::Suiqrtle),
            _ => None,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub species: Species,
    pub element: ElementType,
    pub base_stats: BaseStats,
    pub moves: Vec<Move>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_case_insensitively() {
        assert_eq!(Species::from_alias("Mander"), Some(Species::Suimander));
        assert_eq!(Species::from_alias("  QRTLE "), Some(Species::Suiqrtle));
        assert_eq!(Species::from_alias("basaur"), Some(Species::Basaurimon));
        assert_eq!(Species::from_alias("pikachu"), None);
    }
}
