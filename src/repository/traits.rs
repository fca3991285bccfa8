//! Repository contract for player records.

use super::RepositoryResult;
use crate::player::PlayerRecord;

/// Keyed storage of [`PlayerRecord`]s.
pub trait PlayerRepository: Send + Sync {
    /// Load a record by player id.
    fn load(&self, player_id: &str) -> RepositoryResult<Option<PlayerRecord>>;

    /// Insert or replace one record.
    fn save(&self, record: &PlayerRecord) -> RepositoryResult<()>;

    /// Insert or replace several records in one write. Either all land or none do.
    fn save_all(&self, records: &[PlayerRecord]) -> RepositoryResult<()>;

    /// All known player ids, sorted.
    fn list_ids(&self) -> RepositoryResult<Vec<String>>;

    fn exists(&self, player_id: &str) -> RepositoryResult<bool> {
        Ok(self.load(player_id)?.is_some())
    }
}
