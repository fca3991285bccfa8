use std::collections::HashMap;
use std::sync::RwLock;

use super::{PlayerRepository, RepositoryError, RepositoryResult};
use crate::player::PlayerRecord;

/// In-memory implementation of PlayerRepository
#[derive(Debug, Default)]
pub struct InMemoryPlayerRepo {
    records: RwLock<HashMap<String, PlayerRecord>>,
}

impl InMemoryPlayerRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = PlayerRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.player_id.clone(), r))
            .collect();
        Self {
            records: RwLock::new(map),
        }
    }
}

impl PlayerRepository for InMemoryPlayerRepo {
    fn load(&self, player_id: &str) -> RepositoryResult<Option<PlayerRecord>> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(player_id).cloned())
    }

    fn save(&self, record: &PlayerRecord) -> RepositoryResult<()> {
        self.save_all(std::slice::from_ref(record))
    }

    fn save_all(&self, batch: &[PlayerRecord]) -> RepositoryResult<()> {
        let mut records = self.records.write().map_err(|_| RepositoryError::LockPoisoned)?;
        for record in batch {
            records.insert(record.player_id.clone(), record.clone());
        }
        Ok(())
    }

    fn list_ids(&self) -> RepositoryResult<Vec<String>> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<String> = records.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_all_then_load() {
        let repo = InMemoryPlayerRepo::new();
        repo.save_all(&[PlayerRecord::new("b", "Blue"), PlayerRecord::new("a", "Red")])
            .unwrap();
        assert_eq!(repo.list_ids().unwrap(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(repo.load("a").unwrap().map(|r| r.name), Some("Red".to_string()));
        assert!(!repo.exists("c").unwrap());
    }
}
