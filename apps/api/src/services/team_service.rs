use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use super::entry_pool::{EntryPool, ExcludedEntry};
use super::errors::{ServiceError, ServiceResult};
use super::formation::TeamFormationEngine;
use super::validator::{TeamValidator, ValidationError, ValidationResult};
use crate::domain::age_class::AgeClassCalculator;
use crate::domain::discipline::Discipline;
use crate::domain::entry::ClassifiedEntry;
use crate::domain::repositories::Repositories;
use crate::domain::rules::CompatibilityChecker;
use crate::domain::team::{Team, TeamEvent, TeamMember, TeamOrigin, TeamScope, TEAM_SIZE};

/// Teams produced by one generation run
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub scope: TeamScope,
    pub teams: Vec<Team>,
    pub excluded: Vec<ExcludedEntry>,
    pub persisted: bool,
}

/// Application service for championship teams
///
/// Loads entries, shooters and existing teams through the repository ports,
/// runs the pure formation and validation core on them and writes the result
/// back.
pub struct TeamService {
    repos: Repositories,
    calculator: AgeClassCalculator,
    engine: TeamFormationEngine,
    validator: TeamValidator,
    regenerating: Mutex<HashSet<TeamScope>>,
    assignment_locks: Mutex<HashMap<(Uuid, i32), Arc<AsyncMutex<()>>>>,
}

/// Marks a scope as being regenerated until dropped
struct RegenerationGuard<'a> {
    scopes: &'a Mutex<HashSet<TeamScope>>,
    scope: TeamScope,
}

impl Drop for RegenerationGuard<'_> {
    fn drop(&mut self) {
        self.scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.scope);
    }
}

impl TeamService {
    pub fn new(
        repos: Repositories,
        calculator: AgeClassCalculator,
        checker: CompatibilityChecker,
    ) -> Self {
        Self {
            repos,
            calculator,
            engine: TeamFormationEngine::new(checker.clone()),
            validator: TeamValidator::new(checker),
            regenerating: Mutex::new(HashSet::new()),
            assignment_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Forms teams for one club, discipline and season
    ///
    /// Shooters already placed in a manual team, or in any team of another
    /// club, stay out of the pool. With `persist` the scope's generated teams
    /// are replaced by the new ones; manual teams are never touched. A
    /// persisting run holds the assignment lock of its discipline and season
    /// until the new teams are stored.
    ///
    /// # Returns
    /// * `Ok(GenerationOutcome)` - new teams plus every shooter left out
    /// * `Err(ServiceError::RegenerationInProgress)` - another run for the
    ///   same scope is persisting
    #[tracing::instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn generate_teams(
        &self,
        scope: TeamScope,
        persist: bool,
    ) -> ServiceResult<GenerationOutcome> {
        ensure_season(scope.season)?;
        let _guards = if persist {
            let regeneration = self.begin_regeneration(scope)?;
            let assignments = self
                .lock_assignments(scope.discipline_id, scope.season)
                .await;
            Some((regeneration, assignments))
        } else {
            None
        };

        let discipline = self.discipline(scope.discipline_id).await?;
        let entries = self
            .repos
            .entries
            .list_entries(scope.season, Some(scope.discipline_id))
            .await?;

        let existing = self
            .repos
            .teams
            .find_by_scope(scope.discipline_id, scope.season, None)
            .await?;
        let replaced = |team: &Team| {
            team.club_id() == scope.club_id && team.origin() == TeamOrigin::Generated
        };
        let assigned: HashSet<Uuid> = existing
            .iter()
            .filter(|team| !replaced(*team))
            .flat_map(|team| team.member_ids())
            .collect();
        let number_offset = existing
            .iter()
            .filter(|team| team.club_id() == scope.club_id && !replaced(*team))
            .map(Team::number)
            .max()
            .unwrap_or(0);

        let shooter_ids: Vec<Uuid> = entries.iter().map(|e| e.shooter_id).collect();
        let shooters = self
            .repos
            .shooters
            .find_by_ids(&shooter_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect::<HashMap<_, _>>();

        let build = EntryPool::build(
            &self.calculator,
            scope,
            &discipline,
            &entries,
            &shooters,
            &assigned,
        )?;
        tracing::debug!(
            pool = build.pool.len(),
            assigned = assigned.len(),
            "Entry pool built"
        );

        let report = self.engine.generate(build.pool.entries());
        let mut teams = report.teams;
        for team in &mut teams {
            team.renumber(team.number() + number_offset);
        }
        self.verify_generated(&teams, build.pool.entries());

        let mut excluded = build.excluded;
        excluded.extend(report.excluded);

        if persist {
            self.repos.teams.replace_generated(scope, &teams).await?;
            log_events(&report.events);
        }

        tracing::info!(
            teams = teams.len(),
            complete = teams.iter().filter(|t| t.is_complete()).count(),
            excluded = excluded.len(),
            persist,
            "Team generation finished"
        );

        Ok(GenerationOutcome {
            scope,
            teams,
            excluded,
            persisted: persist,
        })
    }

    /// Checks a proposed membership without changing anything
    ///
    /// Members are reclassified from their current shooter records.
    #[tracing::instrument(skip(self))]
    pub async fn validate_membership(
        &self,
        team_id: Option<Uuid>,
        member_ids: &[Uuid],
        discipline_id: Uuid,
        season: i32,
    ) -> ServiceResult<ValidationResult> {
        ensure_season(season)?;
        let club_id = match team_id {
            Some(id) => {
                let team = self.team(id).await?;
                if team.discipline_id() != discipline_id || team.season() != season {
                    return Err(ServiceError::InvalidInput(format!(
                        "team {} belongs to discipline {} in season {}",
                        id,
                        team.discipline_id(),
                        team.season()
                    )));
                }
                Some(team.club_id())
            }
            None => None,
        };
        let (result, _) = self
            .check_membership(team_id, club_id, discipline_id, season, member_ids)
            .await?;
        Ok(result)
    }

    /// Creates a manual team from validated members
    #[tracing::instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn create_team(&self, scope: TeamScope, member_ids: &[Uuid]) -> ServiceResult<Team> {
        ensure_season(scope.season)?;
        let _assignments = self
            .lock_assignments(scope.discipline_id, scope.season)
            .await;
        let (result, candidates) = self
            .check_membership(
                None,
                Some(scope.club_id),
                scope.discipline_id,
                scope.season,
                member_ids,
            )
            .await?;
        if !result.valid {
            return Err(ServiceError::Validation(result));
        }

        let number = self
            .repos
            .teams
            .find_by_scope(scope.discipline_id, scope.season, Some(scope.club_id))
            .await?
            .iter()
            .map(Team::number)
            .max()
            .unwrap_or(0)
            + 1;

        let members = candidates.iter().map(TeamMember::from).collect();
        let (team, events) = Team::manual(scope, number, members)?;
        self.repos.teams.save(&team).await?;
        log_events(&events);

        Ok(team)
    }

    /// Adds a shooter to a team after validating the new membership
    ///
    /// The team becomes a manual team and survives later regeneration.
    #[tracing::instrument(skip(self))]
    pub async fn add_member(&self, team_id: Uuid, shooter_id: Uuid) -> ServiceResult<Team> {
        let (mut team, _assignments) = self.locked_team(team_id).await?;

        let mut proposed = team.member_ids();
        proposed.push(shooter_id);
        let (result, candidates) = self
            .check_membership(
                Some(team_id),
                Some(team.club_id()),
                team.discipline_id(),
                team.season(),
                &proposed,
            )
            .await?;
        if !result.valid {
            tracing::info!(errors = %result.summary(), "Member rejected");
            return Err(ServiceError::Validation(result));
        }

        let candidate = candidates
            .iter()
            .find(|c| c.shooter_id == shooter_id)
            .ok_or_else(|| ServiceError::not_found("Shooter", shooter_id))?;
        let event = team.add_member(TeamMember::from(candidate))?;
        self.repos.teams.save(&team).await?;
        log_events(&[event]);

        Ok(team)
    }

    /// Removes a shooter from a team after validating the remaining members
    #[tracing::instrument(skip(self))]
    pub async fn remove_member(&self, team_id: Uuid, shooter_id: Uuid) -> ServiceResult<Team> {
        let (mut team, _assignments) = self.locked_team(team_id).await?;
        let event = team.remove_member(shooter_id)?;

        let (result, _) = self
            .check_membership(
                Some(team_id),
                Some(team.club_id()),
                team.discipline_id(),
                team.season(),
                &team.member_ids(),
            )
            .await?;
        if !result.valid {
            tracing::info!(errors = %result.summary(), "Removal rejected");
            return Err(ServiceError::Validation(result));
        }

        self.repos.teams.save(&team).await?;
        log_events(&[event]);

        Ok(team)
    }

    /// Teams of a discipline and season, optionally of one club
    #[tracing::instrument(skip(self))]
    pub async fn list_teams(
        &self,
        discipline_id: Uuid,
        season: i32,
        club_id: Option<Uuid>,
    ) -> ServiceResult<Vec<Team>> {
        ensure_season(season)?;
        Ok(self
            .repos
            .teams
            .find_by_scope(discipline_id, season, club_id)
            .await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_team(&self, team_id: Uuid) -> ServiceResult<Team> {
        self.team(team_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_team(&self, team_id: Uuid) -> ServiceResult<()> {
        self.team(team_id).await?;
        self.repos.teams.delete(team_id).await?;
        tracing::info!(%team_id, "Team deleted");
        Ok(())
    }

    // ===== Helpers =====

    fn begin_regeneration(&self, scope: TeamScope) -> ServiceResult<RegenerationGuard<'_>> {
        let mut running = self
            .regenerating
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !running.insert(scope) {
            tracing::warn!(%scope, "Team generation already running");
            return Err(ServiceError::RegenerationInProgress(scope));
        }
        Ok(RegenerationGuard {
            scopes: &self.regenerating,
            scope,
        })
    }

    /// Serialises every change to the team assignments of one discipline
    /// and season
    ///
    /// Validation reads the current assignments, so the check and the save
    /// that follows must not interleave with another edit of the same key.
    async fn lock_assignments(&self, discipline_id: Uuid, season: i32) -> OwnedMutexGuard<()> {
        let lock = self
            .assignment_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((discipline_id, season))
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Loads a team and locks its assignments, re-reading the team once the
    /// lock is held
    async fn locked_team(&self, id: Uuid) -> ServiceResult<(Team, OwnedMutexGuard<()>)> {
        let scope = self.team(id).await?.scope();
        let guard = self.lock_assignments(scope.discipline_id, scope.season).await;
        let team = self.team(id).await?;
        Ok((team, guard))
    }

    async fn team(&self, id: Uuid) -> ServiceResult<Team> {
        self.repos
            .teams
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Team", id))
    }

    async fn discipline(&self, id: Uuid) -> ServiceResult<Discipline> {
        self.repos
            .disciplines
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Discipline", id))
    }

    /// Resolves and classifies the proposed members, then validates them
    ///
    /// Shooters that do not exist or have no entry are reported as
    /// violations. `club_id` is the club the team belongs to, if known.
    async fn check_membership(
        &self,
        team_id: Option<Uuid>,
        club_id: Option<Uuid>,
        discipline_id: Uuid,
        season: i32,
        member_ids: &[Uuid],
    ) -> ServiceResult<(ValidationResult, Vec<ClassifiedEntry>)> {
        let discipline = self.discipline(discipline_id).await?;
        let shooters: HashMap<Uuid, _> = self
            .repos
            .shooters
            .find_by_ids(member_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let entries: HashMap<Uuid, _> = self
            .repos
            .entries
            .list_entries(season, Some(discipline_id))
            .await?
            .into_iter()
            .map(|e| (e.shooter_id, e))
            .collect();

        let mut lookup_errors = Vec::new();
        let mut candidates = Vec::new();
        for id in member_ids {
            let Some(shooter) = shooters.get(id) else {
                lookup_errors.push(ValidationError::UnknownShooter(*id));
                continue;
            };
            let Some(entry) = entries.get(id) else {
                lookup_errors.push(ValidationError::MissingEntry(*id));
                continue;
            };
            let age_class = self.calculator.classify_shooter(shooter, &discipline, season)?;
            candidates.push(ClassifiedEntry::new(entry, shooter, age_class));
        }

        let assignments = self
            .repos
            .teams
            .list_assignments(discipline_id, season)
            .await?;
        let mut result = self.validator.validate(team_id, &candidates, &assignments);

        if member_ids.len() > TEAM_SIZE && candidates.len() <= TEAM_SIZE {
            lookup_errors.push(ValidationError::TooManyMembers {
                count: member_ids.len(),
                max: TEAM_SIZE,
            });
        }
        if let Some(club_id) = club_id {
            let foreign = candidates.iter().any(|c| c.club_id != club_id);
            if foreign && !result.violations().contains(&ValidationError::ClubMismatch) {
                lookup_errors.push(ValidationError::ClubMismatch);
            }
        }
        result.extend(lookup_errors);

        Ok((result, candidates))
    }

    /// Generated teams must always pass the validator
    fn verify_generated(&self, teams: &[Team], pool: &[ClassifiedEntry]) {
        let by_id: HashMap<Uuid, &ClassifiedEntry> =
            pool.iter().map(|e| (e.shooter_id, e)).collect();
        for team in teams {
            let members: Vec<ClassifiedEntry> = team
                .member_ids()
                .iter()
                .filter_map(|id| by_id.get(id).map(|e| (*e).clone()))
                .collect();
            let result = self
                .validator
                .validate(Some(team.id()), &members, &HashMap::new());
            if !result.valid {
                tracing::error!(
                    team_id = %team.id(),
                    errors = %result.summary(),
                    "Generated team failed validation"
                );
            }
        }
    }
}

fn ensure_season(season: i32) -> ServiceResult<()> {
    if season <= 0 {
        return Err(ServiceError::InvalidInput(format!(
            "season must be a positive year, got {}",
            season
        )));
    }
    Ok(())
}

fn log_events(events: &[TeamEvent]) {
    for event in events {
        tracing::info!(team_id = %event.team_id(), event = event.name(), "Team event");
    }
}
