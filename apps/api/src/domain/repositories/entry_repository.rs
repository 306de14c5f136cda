use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::entry::Entry;
use uuid::Uuid;

/// Repository trait for championship entries
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// All entries of a season, optionally restricted to one discipline
    async fn list_entries(
        &self,
        season: i32,
        discipline_id: Option<Uuid>,
    ) -> RepositoryResult<Vec<Entry>>;

    /// Insert or replace the entry for (shooter, discipline, season)
    async fn save(&self, entry: &Entry) -> RepositoryResult<()>;
}
