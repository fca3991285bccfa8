//! JSON-file PlayerRepository implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::{PlayerRepository, RepositoryError, RepositoryResult};
use crate::player::PlayerRecord;

/// Stores every record in one JSON object keyed by player id.
///
/// The file is read once on open and rewritten in full on each save,
/// through a temp file and rename so a crash never leaves it half written.
pub struct JsonFilePlayerRepo {
    path: PathBuf,
    records: RwLock<BTreeMap<String, PlayerRecord>>,
}

impl JsonFilePlayerRepo {
    /// Open the store, creating an empty one if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            BTreeMap::new()
        };
        tracing::debug!("Opened player store {} ({} records)", path.display(), records.len());
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    fn persist(&self, records: &BTreeMap<String, PlayerRecord>) -> RepositoryResult<()> {
        let temp_path = self.path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(records)?;
        fs::write(&temp_path, text)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl PlayerRepository for JsonFilePlayerRepo {
    fn load(&self, player_id: &str) -> RepositoryResult<Option<PlayerRecord>> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(player_id).cloned())
    }

    fn save(&self, record: &PlayerRecord) -> RepositoryResult<()> {
        self.save_all(std::slice::from_ref(record))
    }

    fn save_all(&self, batch: &[PlayerRecord]) -> RepositoryResult<()> {
        let mut records = self.records.write().map_err(|_| RepositoryError::LockPoisoned)?;
        let mut next = records.clone();
        for record in batch {
            next.insert(record.player_id.clone(), record.clone());
        }
        // Only publish in memory once the file write succeeded.
        self.persist(&next)?;
        *records = next;
        tracing::debug!("Saved {} player record(s) to {}", batch.len(), self.path.display());
        Ok(())
    }

    fn list_ids(&self) -> RepositoryResult<Vec<String>> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use pretty_assertions::assert_eq;

    fn temp_store_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("suimon-arena-{}-{}", name, std::process::id()))
            .join("players.json")
    }

    #[test]
    fn test_records_survive_reopen() {
        let path = temp_store_path("reopen");
        let _ = fs::remove_file(&path);

        let mut record = PlayerRecord::new("99", "Gary");
        record.choose_champion(Species::Suiqrtle).unwrap();
        record.wins = 3;
        {
            let repo = JsonFilePlayerRepo::open(&path).unwrap();
            repo.save(&record).unwrap();
        }

        let reopened = JsonFilePlayerRepo::open(&path).unwrap();
        assert_eq!(reopened.load("99").unwrap(), Some(record));
        assert_eq!(reopened.list_ids().unwrap(), vec!["99".to_string()]);
        assert!(!path.with_extension("json.tmp").exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let path = temp_store_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonFilePlayerRepo::open(&path),
            Err(RepositoryError::Json(_))
        ));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
