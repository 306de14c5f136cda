use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{RepositoryResult, ShooterRepository};
use crate::domain::shooter::Shooter;

/// PostgreSQL implementation of ShooterRepository
pub struct PostgresShooterRepository {
    pool: PgPool,
}

impl PostgresShooterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShooterRepository for PostgresShooterRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Shooter>> {
        let shooter = sqlx::query_as::<_, Shooter>(
            "SELECT id, club_id, full_name, birth_year, gender FROM shooters WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shooter)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Shooter>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let shooters = sqlx::query_as::<_, Shooter>(
            r#"
            SELECT id, club_id, full_name, birth_year, gender
            FROM shooters
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(shooters)
    }

    async fn save(&self, shooter: &Shooter) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shooters (id, club_id, full_name, birth_year, gender)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                club_id = EXCLUDED.club_id,
                full_name = EXCLUDED.full_name,
                birth_year = EXCLUDED.birth_year,
                gender = EXCLUDED.gender
            "#,
        )
        .bind(shooter.id)
        .bind(shooter.club_id)
        .bind(&shooter.full_name)
        .bind(shooter.birth_year)
        .bind(shooter.gender)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
