use crate::champion::max_hp_at;
use crate::errors::BattleResult;
use crate::player::PlayerRecord;

const BASE_XP: u32 = 60;
const LINEAR_XP: u32 = 18;
const QUADRATIC_XP: u32 = 3;

/// Experience required to go from `level` to `level + 1`.
/// Strictly increasing for every level >= 1.
pub fn xp_needed(level: u32) -> u32 {
    let level = level.max(1);
    BASE_XP
        .saturating_add((level - 1).saturating_mul(LINEAR_XP))
        .saturating_add(level.saturating_mul(level).saturating_mul(QUADRATIC_XP))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpResult {
    pub old_level: u32,
    pub new_level: u32,
    /// Sum of the max-HP increases across every level gained.
    pub max_hp_gain: u32,
}

impl LevelUpResult {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.old_level
    }

    pub fn levels_gained(&self) -> u32 {
        self.new_level - self.old_level
    }
}

/// Add experience, applying as many level-ups as it pays for.
///
/// Each level-up raises the stored HP by exactly the max-HP increase of
/// that level, clamped to the new max.
pub fn apply_experience(record: &mut PlayerRecord, gained: u32) -> BattleResult<LevelUpResult> {
    let species = record.require_champion()?;
    let old_level = record.level;
    let mut max_hp_gain: u32 = 0;

    record.xp = record.xp.saturating_add(gained);
    while record.xp >= xp_needed(record.level) {
        record.xp -= xp_needed(record.level);

        let hp_before = record.current_hp()?;
        let old_max = max_hp_at(species, record.level)?;
        record.level = record.level.saturating_add(1);
        let new_max = max_hp_at(species, record.level)?;
        let delta = new_max.saturating_sub(old_max);

        max_hp_gain = max_hp_gain.saturating_add(delta);
        record.hp = Some(hp_before.saturating_add(delta).min(new_max));
        tracing::info!(
            player_id = %record.player_id,
            level = record.level,
            hp_gain = delta,
            "level up"
        );
    }

    Ok(LevelUpResult {
        old_level,
        new_level: record.level,
        max_hp_gain,
    })
}
