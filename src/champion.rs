use crate::errors::SpeciesDataResult;
use crate::species::get_species_data;
use schema::{BaseStats, BuffStat, ElementType, Move, Species};
use serde::{Deserialize, Serialize};
use std::fmt;

// Per-level growth above level 1
const HP_PER_LEVEL: u32 = 9;
const ATTACK_PER_LEVEL: u32 = 2;
const DEFENSE_PER_LEVEL: u32 = 2;
const SPEED_PER_LEVEL: u32 = 1;

/// Effective stats of a champion at a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

/// Derive a champion's stats from its species' base stats and level.
/// Levels below 1 are treated as 1.
pub fn derive_stats(base: &BaseStats, level: u32) -> Stats {
    let growth = level.max(1) - 1;
    Stats {
        hp: grow(base.hp, growth, HP_PER_LEVEL),
        attack: grow(base.attack, growth, ATTACK_PER_LEVEL),
        defense: grow(base.defense, growth, DEFENSE_PER_LEVEL),
        speed: grow(base.speed, growth, SPEED_PER_LEVEL),
    }
}

// Saturates on absurd stored levels.
fn grow(base: u16, growth: u32, per_level: u32) -> u32 {
    (base as u32).saturating_add(growth.saturating_mul(per_level))
}

/// Catalog-backed variant of [`derive_stats`].
pub fn stats_for(species: Species, level: u32) -> SpeciesDataResult<Stats> {
    let data = get_species_data(species)?;
    Ok(derive_stats(&data.base_stats, level))
}

/// Max HP of a species at a level.
pub fn max_hp_at(species: Species, level: u32) -> SpeciesDataResult<u32> {
    Ok(stats_for(species, level)?.hp)
}

/// A live champion inside one battle.
///
/// HP is private so every mutation goes through a clamping method; the value
/// is always within `0..=max_hp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub species: Species,
    pub element: ElementType,
    pub level: u32,
    pub moves: Vec<Move>,
    current_hp: u32,
    max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub burn_turns: u8,
    pub sleep_turns: u8,
    pub defense_stage: u8,
    pub speed_stage: u8,
}

impl Combatant {
    /// Build a combatant from the catalog. `current_hp` of `None` means full HP.
    pub fn new(species: Species, level: u32, current_hp: Option<u32>) -> SpeciesDataResult<Self> {
        let data = get_species_data(species)?;
        let level = level.max(1);
        let stats = derive_stats(&data.base_stats, level);

        Ok(Self {
            species,
            element: data.element,
            level,
            moves: data.moves.clone(),
            current_hp: current_hp.unwrap_or(stats.hp).min(stats.hp),
            max_hp: stats.hp,
            attack: stats.attack,
            defense: stats.defense,
            speed: stats.speed,
            burn_turns: 0,
            sleep_turns: 0,
            defense_stage: 0,
            speed_stage: 0,
        })
    }

    pub fn name(&self) -> &'static str {
        self.species.name()
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.current_hp as f64 / self.max_hp as f64
        }
    }

    pub fn is_burned(&self) -> bool {
        self.burn_turns > 0
    }

    pub fn is_asleep(&self) -> bool {
        self.sleep_turns > 0
    }

    /// Set HP directly, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp);
    }

    /// Remove HP, stopping at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restore HP, stopping at max. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp - self.current_hp);
        self.current_hp += restored;
        restored
    }

    pub fn stat_stage(&self, stat: BuffStat) -> u8 {
        match stat {
            BuffStat::Defense => self.defense_stage,
            BuffStat::Speed => self.speed_stage,
        }
    }

    /// Raise a stat stage, clamped to `max_stage`. Returns the new stage.
    pub fn raise_stat_stage(&mut self, stat: BuffStat, stages: u8, max_stage: u8) -> u8 {
        let slot = match stat {
            BuffStat::Defense => &mut self.defense_stage,
            BuffStat::Speed => &mut self.speed_stage,
        };
        *slot = slot.saturating_add(stages).min(max_stage);
        *slot
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Lv.{} ({}) HP {}/{}",
            self.name(),
            self.level,
            self.element,
            self.current_hp,
            self.max_hp
        )?;
        if self.is_burned() {
            write!(f, " [burned {}]", self.burn_turns)?;
        }
        if self.is_asleep() {
            write!(f, " [asleep {}]", self.sleep_turns)?;
        }
        Ok(())
    }
}
