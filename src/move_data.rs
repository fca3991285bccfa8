use crate::errors::{MoveDataError, MoveDataResult};
use schema::{Move, MoveData, MoveKind};
use std::collections::HashMap;
use std::sync::LazyLock;

const MOVE_CATALOG_RON: &str = include_str!("../data/moves.ron");

// Global move data storage - parsed once on first access
static MOVE_DATA: LazyLock<MoveDataResult<HashMap<Move, MoveData>>> =
    LazyLock::new(|| parse_move_catalog(MOVE_CATALOG_RON));

/// Get move data for a specific move from the global catalog
pub fn get_move_data(move_: Move) -> MoveDataResult<&'static MoveData> {
    match &*MOVE_DATA {
        Ok(map) => map.get(&move_).ok_or(MoveDataError::MoveNotFound(move_)),
        Err(err) => Err(err.clone()),
    }
}

/// Parse and validate a RON move list into a lookup table.
pub fn parse_move_catalog(source: &str) -> MoveDataResult<HashMap<Move, MoveData>> {
    let entries: Vec<MoveData> =
        ron::from_str(source).map_err(|e| MoveDataError::MalformedData(e.to_string()))?;

    let mut map = HashMap::with_capacity(entries.len());
    for data in entries {
        validate_move(&data)?;
        if map.insert(data.id, data.clone()).is_some() {
            return Err(MoveDataError::MalformedData(format!(
                "duplicate entry for {:?}",
                data.id
            )));
        }
    }
    Ok(map)
}

fn validate_move(data: &MoveData) -> MoveDataResult<()> {
    let malformed = |reason: &str| MoveDataError::MalformedData(format!("{:?}: {}", data.id, reason));

    if !(0.0..=1.0).contains(&data.accuracy) {
        return Err(malformed("accuracy must lie in [0, 1]"));
    }
    if data.kind.is_damaging() && data.power == 0 {
        return Err(malformed("damaging move has zero power"));
    }
    if !data.kind.is_damaging() && data.power != 0 {
        return Err(malformed("support move must have zero power"));
    }

    match data.kind {
        MoveKind::DamageWithBurn { burn_chance } if !(0.0..=1.0).contains(&burn_chance) => {
            Err(malformed("burn chance must lie in [0, 1]"))
        }
        MoveKind::HighCritDamage { crit_bonus } if !(0.0..=1.0).contains(&crit_bonus) => {
            Err(malformed("crit bonus must lie in [0, 1]"))
        }
        MoveKind::SleepStatus { min_turns, max_turns } if min_turns == 0 || min_turns > max_turns => {
            Err(malformed("sleep turn range must be non-empty and start at 1 or more"))
        }
        MoveKind::Heal { fraction } if !(fraction > 0.0 && fraction <= 1.0) => {
            Err(malformed("heal fraction must lie in (0, 1]"))
        }
        MoveKind::BuffStat { stages, .. } if stages == 0 => Err(malformed("buff must raise at least one stage")),
        _ => Ok(()),
    }
}
