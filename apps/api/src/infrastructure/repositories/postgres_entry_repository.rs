use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entry::Entry;
use crate::domain::repositories::{EntryRepository, RepositoryResult};

/// PostgreSQL implementation of EntryRepository
pub struct PostgresEntryRepository {
    pool: PgPool,
}

impl PostgresEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PostgresEntryRepository {
    async fn list_entries(
        &self,
        season: i32,
        discipline_id: Option<Uuid>,
    ) -> RepositoryResult<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT shooter_id, discipline_id, season, qualifying_score
            FROM entries
            WHERE season = $1
              AND ($2::uuid IS NULL OR discipline_id = $2)
            ORDER BY discipline_id, shooter_id
            "#,
        )
        .bind(season)
        .bind(discipline_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn save(&self, entry: &Entry) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO entries (shooter_id, discipline_id, season, qualifying_score)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (shooter_id, discipline_id, season) DO UPDATE SET
                qualifying_score = EXCLUDED.qualifying_score
            "#,
        )
        .bind(entry.shooter_id)
        .bind(entry.discipline_id)
        .bind(entry.season)
        .bind(entry.qualifying_score)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
