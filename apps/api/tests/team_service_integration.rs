//! Team service integration tests
//!
//! These tests drive TeamService end to end over the in-memory store:
//! - Classification and formation for the championship scenarios
//! - Regeneration keeping manual teams
//! - Manual edits validated before they are saved

mod common;

use async_trait::async_trait;
use common::{Fixture, SEASON};
use kreismeisterschaft_api::domain::age_class::AgeClassCalculator;
use kreismeisterschaft_api::domain::repositories::{
    Repositories, RepositoryResult, TeamRepository,
};
use kreismeisterschaft_api::domain::rules::CompatibilityChecker;
use kreismeisterschaft_api::domain::shooter::Gender;
use kreismeisterschaft_api::domain::team::{Team, TeamOrigin, TeamScope};
use kreismeisterschaft_api::infrastructure::repositories::InMemoryStore;
use kreismeisterschaft_api::services::{
    ExcludedEntry, ExclusionReason, ServiceError, TeamService, ValidationError,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Team store that yields after reading assignments, the way a database
/// round trip would
struct YieldingTeams(InMemoryStore);

#[async_trait]
impl TeamRepository for YieldingTeams {
    async fn save(&self, team: &Team) -> RepositoryResult<()> {
        TeamRepository::save(&self.0, team).await
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        TeamRepository::find_by_id(&self.0, id).await
    }

    async fn find_by_scope(
        &self,
        discipline_id: Uuid,
        season: i32,
        club_id: Option<Uuid>,
    ) -> RepositoryResult<Vec<Team>> {
        self.0.find_by_scope(discipline_id, season, club_id).await
    }

    async fn replace_generated(&self, scope: TeamScope, teams: &[Team]) -> RepositoryResult<()> {
        self.0.replace_generated(scope, teams).await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.0.delete(id).await
    }

    async fn list_assignments(
        &self,
        discipline_id: Uuid,
        season: i32,
    ) -> RepositoryResult<HashMap<Uuid, Uuid>> {
        let assignments = self.0.list_assignments(discipline_id, season).await;
        tokio::task::yield_now().await;
        assignments
    }
}

fn yielding_service(fx: &Fixture) -> TeamService {
    let repos = Repositories {
        teams: Arc::new(YieldingTeams(fx.store.clone())),
        ..fx.store.repositories()
    };
    TeamService::new(
        repos,
        AgeClassCalculator::default(),
        CompatibilityChecker::default(),
    )
}

async fn teams_holding(service: &TeamService, discipline_id: Uuid, shooter_id: Uuid) -> usize {
    service
        .list_teams(discipline_id, SEASON, None)
        .await
        .unwrap()
        .iter()
        .filter(|t| t.contains(shooter_id))
        .count()
}

fn labels(team: &Team) -> Vec<String> {
    team.age_classes()
        .iter()
        .map(|c| c.label().to_string())
        .collect()
}

fn member_set(teams: &[Team]) -> Vec<HashSet<Uuid>> {
    teams
        .iter()
        .map(|t| t.member_ids().into_iter().collect())
        .collect()
}

#[tokio::test]
async fn test_freehand_herren_tiers_are_not_combined() {
    let fx = Fixture::new();
    let discipline = fx.freehand().await;
    fx.entrant(&discipline, Some(1990), Gender::Male, 3700).await;
    fx.entrant(&discipline, Some(1985), Gender::Male, 3650).await;
    fx.entrant(&discipline, Some(1970), Gender::Male, 3600).await;

    let outcome = fx
        .service()
        .generate_teams(fx.scope(&discipline), true)
        .await
        .unwrap();

    assert_eq!(outcome.teams.len(), 3);
    let all_labels: Vec<Vec<String>> = outcome.teams.iter().map(labels).collect();
    assert_eq!(
        all_labels,
        vec![
            vec!["Herren I".to_string()],
            vec!["Herren II".to_string()],
            vec!["Herren III".to_string()],
        ]
    );
    assert!(outcome.teams.iter().all(|t| !t.is_complete()));
    assert!(outcome.excluded.is_empty());
}

#[tokio::test]
async fn test_supported_schueler_is_eligible_in_any_family() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    fx.entrant(&discipline, Some(2015), Gender::Female, 2900).await;

    let outcome = fx
        .service()
        .generate_teams(fx.scope(&discipline), false)
        .await
        .unwrap();

    assert_eq!(outcome.teams.len(), 1);
    assert_eq!(labels(&outcome.teams[0]), vec!["Schüler w".to_string()]);
    assert!(!outcome.persisted);
}

#[tokio::test]
async fn test_extended_youth_family_opens_open_class_in_supported_mode() {
    let fx = Fixture::new();
    let air_rifle = fx
        .discipline(
            "Luftgewehr Auflage",
            kreismeisterschaft_api::domain::discipline::ShootingMode::Supported,
            "LG",
        )
        .await;
    let air_pistol = fx.supported().await;
    let in_rifle = fx.entrant(&air_rifle, Some(2000), Gender::Male, 3050).await;
    let in_pistol = fx.entrant(&air_pistol, Some(2000), Gender::Male, 2950).await;

    let service = fx.service();
    let rifle = service
        .generate_teams(fx.scope(&air_rifle), false)
        .await
        .unwrap();
    let pistol = service
        .generate_teams(fx.scope(&air_pistol), false)
        .await
        .unwrap();

    assert_eq!(rifle.teams.len(), 1);
    assert_eq!(rifle.teams[0].member_ids(), vec![in_rifle]);
    assert_eq!(labels(&rifle.teams[0]), vec!["Herren I".to_string()]);

    assert!(pistol.teams.is_empty());
    assert_eq!(
        pistol.excluded,
        vec![ExcludedEntry::new(in_pistol, ExclusionReason::NotEligible)]
    );
}

#[tokio::test]
async fn test_senioren_one_and_two_form_complete_team() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let a = fx.entrant(&discipline, Some(1972), Gender::Male, 2950).await;
    let b = fx.entrant(&discipline, Some(1974), Gender::Male, 2940).await;
    let c = fx.entrant(&discipline, Some(1968), Gender::Male, 2930).await;
    let service = fx.service();

    let result = service
        .validate_membership(None, &[a, b, c], discipline.id, SEASON)
        .await
        .unwrap();
    assert!(result.valid, "unexpected errors: {:?}", result.errors);

    let outcome = service
        .generate_teams(fx.scope(&discipline), true)
        .await
        .unwrap();
    assert_eq!(outcome.teams.len(), 1);
    let team = &outcome.teams[0];
    assert!(team.is_complete());
    assert_eq!(team.member_ids(), vec![a, b, c]);
    assert_eq!(
        labels(team),
        vec![
            "Senioren I m".to_string(),
            "Senioren I m".to_string(),
            "Senioren II m".to_string()
        ]
    );
}

#[tokio::test]
async fn test_senioren_zero_with_senioren_one_is_reported() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let zero = fx.entrant(&discipline, Some(1981), Gender::Male, 2950).await;
    let one = fx.entrant(&discipline, Some(1971), Gender::Male, 2940).await;

    let result = fx
        .service()
        .validate_membership(None, &[zero, one], discipline.id, SEASON)
        .await
        .unwrap();

    assert!(!result.valid);
    assert_eq!(
        result.errors,
        vec!["Age classes Senioren 0, Senioren I m cannot be combined in one team".to_string()]
    );
}

#[tokio::test]
async fn test_regeneration_keeps_manual_teams() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let a = fx.entrant(&discipline, Some(1976), Gender::Male, 3000).await;
    let b = fx.entrant(&discipline, Some(1977), Gender::Female, 2990).await;
    let c = fx.entrant(&discipline, Some(1978), Gender::Male, 2980).await;
    let d = fx.entrant(&discipline, Some(1979), Gender::Female, 2970).await;
    let service = fx.service();
    let scope = fx.scope(&discipline);

    let first = service.generate_teams(scope, true).await.unwrap();
    assert_eq!(member_set(&first.teams), vec![
        HashSet::from([a, b, c]),
        HashSet::from([d]),
    ]);

    let edited = service
        .remove_member(first.teams[0].id(), c)
        .await
        .unwrap();
    assert_eq!(edited.origin(), TeamOrigin::Manual);

    let second = service.generate_teams(scope, true).await.unwrap();
    assert_eq!(member_set(&second.teams), vec![HashSet::from([c, d])]);
    assert_eq!(second.teams[0].number(), 2);

    let stored = service
        .list_teams(discipline.id, SEASON, Some(fx.club_id))
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id(), edited.id());
    assert_eq!(stored[0].member_ids(), vec![a, b]);
    assert_eq!(stored[1].origin(), TeamOrigin::Generated);
    assert_eq!(stored[1].number(), 2);
}

#[tokio::test]
async fn test_regeneration_replaces_instead_of_duplicating() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    for (year, score) in [(1960, 2900), (1959, 2890), (1958, 2880), (1957, 2870)] {
        fx.entrant(&discipline, Some(year), Gender::Female, score).await;
    }
    let service = fx.service();
    let scope = fx.scope(&discipline);

    let first = service.generate_teams(scope, true).await.unwrap();
    let second = service.generate_teams(scope, true).await.unwrap();

    assert_eq!(member_set(&first.teams), member_set(&second.teams));
    let stored = service
        .list_teams(discipline.id, SEASON, None)
        .await
        .unwrap();
    assert_eq!(stored.len(), second.teams.len());
}

#[tokio::test]
async fn test_dry_run_does_not_store_teams() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    fx.entrant(&discipline, Some(1980), Gender::Male, 2900).await;
    let service = fx.service();

    let outcome = service
        .generate_teams(fx.scope(&discipline), false)
        .await
        .unwrap();

    assert_eq!(outcome.teams.len(), 1);
    assert!(service
        .list_teams(discipline.id, SEASON, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_clubs_are_generated_separately() {
    let fx = Fixture::new();
    let other_club = Uuid::new_v4();
    let discipline = fx.supported().await;
    let ours = fx.entrant(&discipline, Some(1980), Gender::Male, 2900).await;
    let theirs = fx
        .entrant_of(other_club, &discipline, Some(1981), Gender::Male, 2950)
        .await;
    let service = fx.service();

    let their_teams = service
        .generate_teams(TeamScope::new(other_club, discipline.id, SEASON), true)
        .await
        .unwrap();
    let our_teams = service
        .generate_teams(fx.scope(&discipline), true)
        .await
        .unwrap();

    assert_eq!(their_teams.teams[0].member_ids(), vec![theirs]);
    assert_eq!(our_teams.teams.len(), 1);
    assert_eq!(our_teams.teams[0].member_ids(), vec![ours]);
    assert_eq!(
        service
            .list_teams(discipline.id, SEASON, None)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_unclassifiable_shooters_are_excluded() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let no_year = fx.entrant(&discipline, None, Gender::Female, 2900).await;
    let no_gender = fx.entrant(&discipline, Some(1960), Gender::Unknown, 2800).await;

    let outcome = fx
        .service()
        .generate_teams(fx.scope(&discipline), true)
        .await
        .unwrap();

    assert!(outcome.teams.is_empty());
    let excluded: HashSet<Uuid> = outcome.excluded.iter().map(|e| e.shooter_id).collect();
    assert_eq!(excluded, HashSet::from([no_year, no_gender]));
    assert!(outcome
        .excluded
        .iter()
        .all(|e| e.reason == ExclusionReason::Unclassifiable));
}

#[tokio::test]
async fn test_shooter_cannot_join_two_teams() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let placed = fx.entrant(&discipline, Some(1978), Gender::Male, 2900).await;
    let service = fx.service();
    let scope = fx.scope(&discipline);

    let generated = service.generate_teams(scope, true).await.unwrap();
    let team_id = generated.teams[0].id();

    match service.create_team(scope, &[placed]).await {
        Err(ServiceError::Validation(result)) => assert_eq!(
            result.violations(),
            &[ValidationError::AlreadyAssigned {
                shooter_id: placed,
                team_id
            }]
        ),
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_add_incompatible_member_is_rejected() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let zero = fx.entrant(&discipline, Some(1981), Gender::Male, 2950).await;
    let one = fx.entrant(&discipline, Some(1971), Gender::Male, 2940).await;
    let service = fx.service();

    let team = service
        .create_team(fx.scope(&discipline), &[zero])
        .await
        .unwrap();
    assert_eq!(team.origin(), TeamOrigin::Manual);
    assert_eq!(team.number(), 1);

    match service.add_member(team.id(), one).await {
        Err(ServiceError::Validation(result)) => assert_eq!(
            result.errors,
            vec!["Age classes Senioren 0, Senioren I m cannot be combined in one team".to_string()]
        ),
        other => panic!("expected validation failure, got {:?}", other),
    }

    let stored = service.get_team(team.id()).await.unwrap();
    assert_eq!(stored.member_ids(), vec![zero]);
}

#[tokio::test]
async fn test_add_member_to_generated_team_makes_it_manual() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    fx.entrant(&discipline, Some(1955), Gender::Female, 2900).await;
    let service = fx.service();

    let generated = service
        .generate_teams(fx.scope(&discipline), true)
        .await
        .unwrap();
    let late = fx.entrant(&discipline, Some(1950), Gender::Male, 2700).await;

    let team = service
        .add_member(generated.teams[0].id(), late)
        .await
        .unwrap();

    assert_eq!(team.origin(), TeamOrigin::Manual);
    assert!(team.contains(late));
    assert_eq!(service.get_team(team.id()).await.unwrap(), team);
}

#[tokio::test]
async fn test_add_member_to_full_team_is_rejected() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let mut members = Vec::new();
    for year in [1980, 1981, 1982] {
        members.push(fx.entrant(&discipline, Some(year), Gender::Male, 2900).await);
    }
    let fourth = fx.entrant(&discipline, Some(1983), Gender::Male, 2800).await;
    let service = fx.service();

    let team = service
        .create_team(fx.scope(&discipline), &members)
        .await
        .unwrap();
    assert!(team.is_complete());

    match service.add_member(team.id(), fourth).await {
        Err(ServiceError::Validation(result)) => assert_eq!(
            result.violations(),
            &[ValidationError::TooManyMembers { count: 4, max: 3 }]
        ),
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_and_unentered_shooters_are_reported() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let ghost = Uuid::new_v4();
    let not_entered = fx.shooter(fx.club_id, Some(1960), Gender::Male).await;

    let result = fx
        .service()
        .validate_membership(None, &[ghost, not_entered.id], discipline.id, SEASON)
        .await
        .unwrap();

    assert_eq!(
        result.violations(),
        &[
            ValidationError::UnknownShooter(ghost),
            ValidationError::MissingEntry(not_entered.id),
        ]
    );
}

#[tokio::test]
async fn test_delete_team() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let service = fx.service();
    let team = service
        .create_team(fx.scope(&discipline), &[])
        .await
        .unwrap();

    service.delete_team(team.id()).await.unwrap();

    assert!(matches!(
        service.get_team(team.id()).await,
        Err(ServiceError::NotFound { entity: "Team", .. })
    ));
    assert!(matches!(
        service.delete_team(team.id()).await,
        Err(ServiceError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_adds_place_shooter_once() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let first = fx.entrant(&discipline, Some(1980), Gender::Male, 2950).await;
    let second = fx.entrant(&discipline, Some(1981), Gender::Male, 2940).await;
    let shooter = fx.entrant(&discipline, Some(1982), Gender::Male, 2930).await;
    let service = yielding_service(&fx);
    let scope = fx.scope(&discipline);

    let t1 = service.create_team(scope, &[first]).await.unwrap();
    let t2 = service.create_team(scope, &[second]).await.unwrap();

    let (a, b) = tokio::join!(
        service.add_member(t1.id(), shooter),
        service.add_member(t2.id(), shooter)
    );

    let (winner, loser) = match (a, b) {
        (Ok(team), Err(error)) | (Err(error), Ok(team)) => (team, error),
        (a, b) => panic!("expected exactly one add to succeed, got {:?} and {:?}", a, b),
    };
    match loser {
        ServiceError::Validation(result) => assert_eq!(
            result.violations(),
            &[ValidationError::AlreadyAssigned {
                shooter_id: shooter,
                team_id: winner.id()
            }]
        ),
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(teams_holding(&service, discipline.id, shooter).await, 1);
}

#[tokio::test]
async fn test_add_racing_regeneration_places_shooter_once() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let first = fx.entrant(&discipline, Some(1980), Gender::Male, 2950).await;
    let shooter = fx.entrant(&discipline, Some(1982), Gender::Male, 2930).await;
    let service = yielding_service(&fx);
    let scope = fx.scope(&discipline);
    let manual = service.create_team(scope, &[first]).await.unwrap();

    let (generated, added) = tokio::join!(
        service.generate_teams(scope, true),
        service.add_member(manual.id(), shooter)
    );

    generated.unwrap();
    if let Err(error) = added {
        assert!(matches!(error, ServiceError::Validation(_)), "{:?}", error);
    }
    assert_eq!(teams_holding(&service, discipline.id, shooter).await, 1);
}

#[tokio::test]
async fn test_validate_rejects_team_of_another_scope() {
    let fx = Fixture::new();
    let discipline = fx.supported().await;
    let other = fx.freehand().await;
    let member = fx.entrant(&discipline, Some(1980), Gender::Male, 2950).await;
    let service = fx.service();
    let team = service
        .create_team(fx.scope(&discipline), &[member])
        .await
        .unwrap();

    for (discipline_id, season) in [(other.id, SEASON), (discipline.id, SEASON - 1)] {
        assert!(matches!(
            service
                .validate_membership(Some(team.id()), &[member], discipline_id, season)
                .await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    let result = service
        .validate_membership(Some(team.id()), &[member], discipline.id, SEASON)
        .await
        .unwrap();
    assert!(result.valid);
}
