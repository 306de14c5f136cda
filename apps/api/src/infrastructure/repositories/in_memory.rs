use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::discipline::Discipline;
use crate::domain::entry::Entry;
use crate::domain::repositories::{
    DisciplineRepository, EntryRepository, Repositories, RepositoryError, RepositoryResult,
    ShooterRepository, TeamRepository,
};
use crate::domain::shooter::Shooter;
use crate::domain::team::{Team, TeamOrigin, TeamScope};

#[derive(Default)]
struct Store {
    shooters: HashMap<Uuid, Shooter>,
    disciplines: HashMap<Uuid, Discipline>,
    entries: BTreeMap<(i32, Uuid, Uuid), Entry>,
    teams: HashMap<Uuid, Team>,
}

/// Process-local implementation of every repository port
///
/// Clones share the same data. Used by tests and for running the service
/// without a database.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Store>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All four ports backed by this store
    pub fn repositories(&self) -> Repositories {
        Repositories {
            shooters: Arc::new(self.clone()),
            disciplines: Arc::new(self.clone()),
            entries: Arc::new(self.clone()),
            teams: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl ShooterRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Shooter>> {
        Ok(self.inner.read().await.shooters.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Shooter>> {
        let store = self.inner.read().await;
        let mut shooters: Vec<Shooter> = ids
            .iter()
            .filter_map(|id| store.shooters.get(id).cloned())
            .collect();
        shooters.sort_by_key(|s| s.id);
        shooters.dedup_by_key(|s| s.id);
        Ok(shooters)
    }

    async fn save(&self, shooter: &Shooter) -> RepositoryResult<()> {
        self.inner
            .write()
            .await
            .shooters
            .insert(shooter.id, shooter.clone());
        Ok(())
    }
}

#[async_trait]
impl DisciplineRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Discipline>> {
        Ok(self.inner.read().await.disciplines.get(&id).cloned())
    }

    async fn save(&self, discipline: &Discipline) -> RepositoryResult<()> {
        self.inner
            .write()
            .await
            .disciplines
            .insert(discipline.id, discipline.clone());
        Ok(())
    }
}

#[async_trait]
impl EntryRepository for InMemoryStore {
    async fn list_entries(
        &self,
        season: i32,
        discipline_id: Option<Uuid>,
    ) -> RepositoryResult<Vec<Entry>> {
        let store = self.inner.read().await;
        Ok(store
            .entries
            .values()
            .filter(|e| e.season == season)
            .filter(|e| discipline_id.map_or(true, |d| e.discipline_id == d))
            .cloned()
            .collect())
    }

    async fn save(&self, entry: &Entry) -> RepositoryResult<()> {
        self.inner.write().await.entries.insert(
            (entry.season, entry.discipline_id, entry.shooter_id),
            entry.clone(),
        );
        Ok(())
    }
}

/// Fails if a member of `team` sits in another team of the same
/// discipline and season
fn ensure_unassigned(teams: &HashMap<Uuid, Team>, team: &Team) -> RepositoryResult<()> {
    let members = team.member_ids();
    let clash = teams
        .values()
        .filter(|t| {
            t.id() != team.id()
                && t.discipline_id() == team.discipline_id()
                && t.season() == team.season()
        })
        .flat_map(|t| t.member_ids())
        .find(|id| members.contains(id));

    match clash {
        Some(shooter_id) => Err(RepositoryError::AssignmentConflict { shooter_id }),
        None => Ok(()),
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn save(&self, team: &Team) -> RepositoryResult<()> {
        let mut store = self.inner.write().await;
        ensure_unassigned(&store.teams, team)?;
        store.teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        Ok(self.inner.read().await.teams.get(&id).cloned())
    }

    async fn find_by_scope(
        &self,
        discipline_id: Uuid,
        season: i32,
        club_id: Option<Uuid>,
    ) -> RepositoryResult<Vec<Team>> {
        let store = self.inner.read().await;
        let mut teams: Vec<Team> = store
            .teams
            .values()
            .filter(|t| t.discipline_id() == discipline_id && t.season() == season)
            .filter(|t| club_id.map_or(true, |c| t.club_id() == c))
            .cloned()
            .collect();
        teams.sort_by_key(|t| (t.club_id(), t.number(), t.id()));
        Ok(teams)
    }

    async fn replace_generated(&self, scope: TeamScope, teams: &[Team]) -> RepositoryResult<()> {
        let mut store = self.inner.write().await;
        let mut next = store.teams.clone();
        next.retain(|_, t| t.scope() != scope || t.origin() != TeamOrigin::Generated);
        for team in teams {
            ensure_unassigned(&next, team)?;
            next.insert(team.id(), team.clone());
        }
        store.teams = next;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.inner
            .write()
            .await
            .teams
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound { entity: "Team", id })
    }
}
