use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, RepositoryResult, TeamRepository};
use crate::domain::team::{Team, TeamMember, TeamOrigin, TeamScope, TEAM_SIZE};

const TEAM_COLUMNS: &str =
    "id, club_id, discipline_id, season, number, members, origin, created_at, updated_at";

/// PostgreSQL implementation of TeamRepository
///
/// Members are stored as a JSONB array on the team row. Every write also
/// rebuilds the team's rows in `team_members` within the same transaction;
/// that table's unique key rejects a shooter placed in two teams of one
/// discipline and season.
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new PostgresTeamRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    club_id: Uuid,
    discipline_id: Uuid,
    season: i32,
    number: i32,
    members: Json<Vec<TeamMember>>,
    origin: TeamOrigin,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TeamRow> for Team {
    type Error = RepositoryError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        let members = row.members.0;
        if members.len() > TEAM_SIZE {
            return Err(RepositoryError::Corrupt {
                entity: "Team",
                id: row.id,
                reason: format!("{} members stored", members.len()),
            });
        }

        Ok(Team::from_persistence(
            row.id,
            row.club_id,
            row.discipline_id,
            row.season,
            row.number,
            members,
            row.origin,
            row.created_at,
            row.updated_at,
        ))
    }
}

/// Writes the team row and its member index; call inside a transaction
async fn write_team(conn: &mut PgConnection, team: &Team) -> RepositoryResult<()> {
    sqlx::query(
        r#"
        INSERT INTO teams (
            id, club_id, discipline_id, season, number,
            members, origin, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            number = EXCLUDED.number,
            members = EXCLUDED.members,
            origin = EXCLUDED.origin,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(team.id())
    .bind(team.club_id())
    .bind(team.discipline_id())
    .bind(team.season())
    .bind(team.number())
    .bind(Json(team.members()))
    .bind(team.origin())
    .bind(team.created_at())
    .bind(team.updated_at())
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM team_members WHERE team_id = $1")
        .bind(team.id())
        .execute(&mut *conn)
        .await?;

    for member in team.members() {
        sqlx::query(
            r#"
            INSERT INTO team_members (team_id, shooter_id, discipline_id, season)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(team.id())
        .bind(member.shooter_id)
        .bind(team.discipline_id())
        .bind(team.season())
        .execute(&mut *conn)
        .await
        .map_err(|e| member_error(e, member.shooter_id))?;
    }

    Ok(())
}

fn member_error(error: sqlx::Error, shooter_id: Uuid) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::AssignmentConflict { shooter_id }
        }
        _ => RepositoryError::Database(error),
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn save(&self, team: &Team) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        write_team(&mut tx, team).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {} FROM teams WHERE id = $1",
            TEAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Team::try_from).transpose()
    }

    async fn find_by_scope(
        &self,
        discipline_id: Uuid,
        season: i32,
        club_id: Option<Uuid>,
    ) -> RepositoryResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(&format!(
            r#"
            SELECT {}
            FROM teams
            WHERE discipline_id = $1
              AND season = $2
              AND ($3::uuid IS NULL OR club_id = $3)
            ORDER BY club_id, number
            "#,
            TEAM_COLUMNS
        ))
        .bind(discipline_id)
        .bind(season)
        .bind(club_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Team::try_from).collect()
    }

    async fn replace_generated(&self, scope: TeamScope, teams: &[Team]) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            r#"
            DELETE FROM teams
            WHERE club_id = $1
              AND discipline_id = $2
              AND season = $3
              AND origin = 'generated'
            "#,
        )
        .bind(scope.club_id)
        .bind(scope.discipline_id)
        .bind(scope.season)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        for team in teams {
            write_team(&mut tx, team).await?;
        }

        tx.commit().await?;
        tracing::debug!(%scope, removed, inserted = teams.len(), "Generated teams replaced");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: "Team", id });
        }

        Ok(())
    }

    async fn list_assignments(
        &self,
        discipline_id: Uuid,
        season: i32,
    ) -> RepositoryResult<HashMap<Uuid, Uuid>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            r#"
            SELECT shooter_id, team_id
            FROM team_members
            WHERE discipline_id = $1 AND season = $2
            "#,
        )
        .bind(discipline_id)
        .bind(season)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
