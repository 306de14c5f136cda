// Repository ports
// Team formation only sees these traits; adapters live in infrastructure

pub mod discipline_repository;
pub mod entry_repository;
pub mod shooter_repository;
pub mod team_repository;

pub use discipline_repository::DisciplineRepository;
pub use entry_repository::EntryRepository;
pub use shooter_repository::ShooterRepository;
pub use team_repository::TeamRepository;

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by repository adapters
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// A write would place a shooter in two teams of one discipline and season
    #[error("Shooter {shooter_id} is already in another team of this discipline and season")]
    AssignmentConflict { shooter_id: Uuid },

    #[error("Corrupt {entity} record {id}: {reason}")]
    Corrupt {
        entity: &'static str,
        id: Uuid,
        reason: String,
    },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// The set of stores the team service reads from and writes to
#[derive(Clone)]
pub struct Repositories {
    pub shooters: Arc<dyn ShooterRepository>,
    pub disciplines: Arc<dyn DisciplineRepository>,
    pub entries: Arc<dyn EntryRepository>,
    pub teams: Arc<dyn TeamRepository>,
}
