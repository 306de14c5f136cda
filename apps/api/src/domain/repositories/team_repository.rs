use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::team::{Team, TeamScope};

/// Repository trait for Team aggregate
///
/// Defines the contract for persisting and retrieving teams.
/// Implementations should handle database-specific details.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Save a team (insert or update)
    async fn save(&self, team: &Team) -> RepositoryResult<()>;

    /// Find a team by its ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>>;

    /// Find all teams of a discipline and season, optionally for one club,
    /// ordered by club and team number
    async fn find_by_scope(
        &self,
        discipline_id: Uuid,
        season: i32,
        club_id: Option<Uuid>,
    ) -> RepositoryResult<Vec<Team>>;

    /// Atomically delete the scope's generated teams and insert `teams`
    ///
    /// Manual teams of the scope are left untouched.
    async fn replace_generated(&self, scope: TeamScope, teams: &[Team]) -> RepositoryResult<()>;

    /// Delete a team by ID
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;

    /// Map of every placed shooter to the team holding them, for one
    /// discipline and season
    async fn list_assignments(
        &self,
        discipline_id: Uuid,
        season: i32,
    ) -> RepositoryResult<HashMap<Uuid, Uuid>> {
        let teams = self.find_by_scope(discipline_id, season, None).await?;
        Ok(teams
            .iter()
            .flat_map(|team| team.member_ids().into_iter().map(move |id| (id, team.id())))
            .collect())
    }
}
