use crate::champion::{max_hp_at, Combatant};
use crate::errors::{BattleResult, PreconditionError};
use crate::species::Species;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    // The index refers to the move's position in the champion's move list.
    UseMove { move_index: usize },

    Forfeit,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::UseMove { move_index } => write!(f, "use move #{}", move_index + 1),
            PlayerAction::Forfeit => write!(f, "forfeit"),
        }
    }
}

/// Who picks moves for a battle participant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerType {
    /// Moves are submitted explicitly through the runner.
    Human,
    /// Moves are chosen by the engine's AI.
    Npc,
}

/// The persistent progression of one player, owned by the host's store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub player_id: String,
    pub name: String,
    /// Chosen once; never reassigned.
    pub champion: Option<Species>,
    pub level: u32,
    pub xp: u32,
    /// Persisted HP; `None` means full.
    pub hp: Option<u32>,
    pub wins: u32,
    pub losses: u32,
    /// Healing items ("Suiballs").
    pub items: u32,
    /// Host-supplied day key of the last daily item claim.
    pub last_daily: Option<String>,
}

impl PlayerRecord {
    pub fn new(player_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            champion: None,
            level: 1,
            xp: 0,
            hp: None,
            wins: 0,
            losses: 0,
            items: 0,
            last_daily: None,
        }
    }

    /// The chosen champion, or a precondition failure naming this player.
    pub fn require_champion(&self) -> Result<Species, PreconditionError> {
        self.champion.ok_or_else(|| PreconditionError::NoChampionSelected {
            player_id: self.player_id.clone(),
        })
    }

    /// Lock in a champion. A second choice is rejected.
    pub fn choose_champion(&mut self, species: Species) -> Result<(), PreconditionError> {
        if let Some(existing) = self.champion {
            return Err(PreconditionError::ChampionAlreadyChosen {
                player_id: self.player_id.clone(),
                species: existing,
            });
        }
        self.champion = Some(species);
        self.level = 1;
        self.xp = 0;
        self.hp = None;
        // Starter healing item
        self.items = self.items.max(1);
        Ok(())
    }

    pub fn max_hp(&self) -> BattleResult<u32> {
        let species = self.require_champion()?;
        Ok(max_hp_at(species, self.level)?)
    }

    /// Current persistent HP, treating an uninitialized value as full.
    pub fn current_hp(&self) -> BattleResult<u32> {
        let max_hp = self.max_hp()?;
        Ok(self.hp.unwrap_or(max_hp).min(max_hp))
    }

    /// Store HP clamped to the max for the current level.
    pub fn set_hp(&mut self, hp: u32) -> BattleResult<()> {
        let max_hp = self.max_hp()?;
        self.hp = Some(hp.min(max_hp));
        Ok(())
    }

    /// Restore full HP by spending one healing item. Returns the HP restored.
    pub fn heal_to_full(&mut self) -> BattleResult<u32> {
        let max_hp = self.max_hp()?;
        let current = self.current_hp()?;
        if current >= max_hp {
            return Err(PreconditionError::AlreadyAtFullHp {
                player_id: self.player_id.clone(),
            }
            .into());
        }
        if self.items == 0 {
            return Err(PreconditionError::NoHealingItems {
                player_id: self.player_id.clone(),
            }
            .into());
        }
        self.items -= 1;
        self.hp = Some(max_hp);
        Ok(max_hp - current)
    }

    /// Grant the daily items once per host-supplied day key, up to `cap`.
    /// Returns false when today's grant was already claimed.
    pub fn claim_daily(&mut self, day_key: &str, grant: u32, cap: u32) -> bool {
        if self.last_daily.as_deref() == Some(day_key) {
            return false;
        }
        self.items = self.items.saturating_add(grant).min(cap);
        self.last_daily = Some(day_key.to_string());
        true
    }

    /// Build the battle-time view of this player's champion.
    pub fn to_combatant(&self) -> BattleResult<Combatant> {
        let species = self.require_champion()?;
        let hp = self.current_hp()?;
        Ok(Combatant::new(species, self.level, Some(hp))?)
    }
}

/// A participant inside one battle.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattlePlayer {
    // The host's identifier for the player.
    pub player_id: String,
    pub player_name: String,
    pub player_type: PlayerType,
    pub combatant: Combatant,
    /// Total HP this player's moves removed from the opponent.
    pub damage_dealt: u32,
}

impl BattlePlayer {
    pub fn new(
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        player_type: PlayerType,
        combatant: Combatant,
    ) -> Self {
        BattlePlayer {
            player_id: player_id.into(),
            player_name: player_name.into(),
            player_type,
            combatant,
            damage_dealt: 0,
        }
    }

    /// Build a participant from a stored record.
    pub fn from_record(record: &PlayerRecord, player_type: PlayerType) -> BattleResult<Self> {
        Ok(Self::new(
            record.player_id.clone(),
            record.name.clone(),
            player_type,
            record.to_combatant()?,
        ))
    }
}

impl fmt::Display for BattlePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.player_name, self.combatant)
    }
}
