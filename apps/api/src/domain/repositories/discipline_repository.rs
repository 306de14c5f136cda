use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::discipline::Discipline;

/// Repository trait for discipline lookups
#[async_trait]
pub trait DisciplineRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Discipline>>;

    async fn save(&self, discipline: &Discipline) -> RepositoryResult<()>;
}
