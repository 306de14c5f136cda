use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::discipline::Discipline;
use crate::domain::repositories::{DisciplineRepository, RepositoryResult};

/// PostgreSQL implementation of DisciplineRepository
pub struct PostgresDisciplineRepository {
    pool: PgPool,
}

impl PostgresDisciplineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DisciplineRepository for PostgresDisciplineRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Discipline>> {
        let discipline = sqlx::query_as::<_, Discipline>(
            "SELECT id, name, mode, family, min_age FROM disciplines WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(discipline)
    }

    async fn save(&self, discipline: &Discipline) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO disciplines (id, name, mode, family, min_age)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                mode = EXCLUDED.mode,
                family = EXCLUDED.family,
                min_age = EXCLUDED.min_age
            "#,
        )
        .bind(discipline.id)
        .bind(&discipline.name)
        .bind(discipline.mode)
        .bind(&discipline.family)
        .bind(discipline.min_age)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
