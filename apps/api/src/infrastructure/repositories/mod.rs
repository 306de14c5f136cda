// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_discipline_repository;
pub mod postgres_entry_repository;
pub mod postgres_shooter_repository;
pub mod postgres_team_repository;

pub use in_memory::InMemoryStore;
pub use postgres_discipline_repository::PostgresDisciplineRepository;
pub use postgres_entry_repository::PostgresEntryRepository;
pub use postgres_shooter_repository::PostgresShooterRepository;
pub use postgres_team_repository::PostgresTeamRepository;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::Repositories;

/// All repository ports backed by one PostgreSQL pool
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        shooters: Arc::new(PostgresShooterRepository::new(pool.clone())),
        disciplines: Arc::new(PostgresDisciplineRepository::new(pool.clone())),
        entries: Arc::new(PostgresEntryRepository::new(pool.clone())),
        teams: Arc::new(PostgresTeamRepository::new(pool)),
    }
}
