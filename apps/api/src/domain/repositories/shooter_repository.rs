use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::shooter::Shooter;

/// Repository trait for shooter lookups
#[async_trait]
pub trait ShooterRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Shooter>>;

    /// Shooters for the given ids; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Shooter>>;

    async fn save(&self, shooter: &Shooter) -> RepositoryResult<()>;
}
