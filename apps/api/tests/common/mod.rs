//! Shared fixtures for integration tests
//!
//! Everything runs against the in-memory store, so no database is needed.

#![allow(dead_code)]

use kreismeisterschaft_api::api::{self, AppState};
use kreismeisterschaft_api::domain::age_class::AgeClassCalculator;
use kreismeisterschaft_api::domain::discipline::{Discipline, ShootingMode};
use kreismeisterschaft_api::domain::entry::Entry;
use kreismeisterschaft_api::domain::repositories::{
    DisciplineRepository, EntryRepository, ShooterRepository,
};
use kreismeisterschaft_api::domain::rules::CompatibilityChecker;
use kreismeisterschaft_api::domain::shooter::{Gender, Shooter};
use kreismeisterschaft_api::domain::team::TeamScope;
use kreismeisterschaft_api::infrastructure::repositories::InMemoryStore;
use kreismeisterschaft_api::logging;
use kreismeisterschaft_api::services::TeamService;
use rust_decimal::Decimal;
use uuid::Uuid;

pub const SEASON: i32 = 2026;

pub struct Fixture {
    pub store: InMemoryStore,
    pub club_id: Uuid,
}

impl Fixture {
    pub fn new() -> Self {
        logging::init_test();
        Self {
            store: InMemoryStore::new(),
            club_id: Uuid::new_v4(),
        }
    }

    /// A service over this fixture's store with the default rules
    pub fn service(&self) -> TeamService {
        TeamService::new(
            self.store.repositories(),
            AgeClassCalculator::default(),
            CompatibilityChecker::default(),
        )
    }

    pub fn router(&self) -> axum::Router {
        api::router(AppState::new(self.service()))
    }

    pub fn scope(&self, discipline: &Discipline) -> TeamScope {
        TeamScope::new(self.club_id, discipline.id, SEASON)
    }

    pub async fn discipline(&self, name: &str, mode: ShootingMode, family: &str) -> Discipline {
        let discipline = Discipline::new(name, mode, family, 0);
        DisciplineRepository::save(&self.store, &discipline)
            .await
            .unwrap();
        discipline
    }

    pub async fn freehand(&self) -> Discipline {
        self.discipline("Luftpistole", ShootingMode::Freehand, "LP").await
    }

    pub async fn supported(&self) -> Discipline {
        self.discipline("Luftpistole Auflage", ShootingMode::Supported, "LP")
            .await
    }

    pub async fn shooter(&self, club_id: Uuid, birth_year: Option<i32>, gender: Gender) -> Shooter {
        let shooter = Shooter::new(club_id, "Schütze", birth_year, gender);
        ShooterRepository::save(&self.store, &shooter).await.unwrap();
        shooter
    }

    /// Registers a new shooter of the fixture's club for `discipline`
    ///
    /// `score` is in tenths of a ring.
    pub async fn entrant(
        &self,
        discipline: &Discipline,
        birth_year: Option<i32>,
        gender: Gender,
        score: i64,
    ) -> Uuid {
        self.entrant_of(self.club_id, discipline, birth_year, gender, score)
            .await
    }

    pub async fn entrant_of(
        &self,
        club_id: Uuid,
        discipline: &Discipline,
        birth_year: Option<i32>,
        gender: Gender,
        score: i64,
    ) -> Uuid {
        let shooter = self.shooter(club_id, birth_year, gender).await;
        let entry = Entry::new(shooter.id, discipline.id, SEASON, Decimal::new(score, 1));
        EntryRepository::save(&self.store, &entry).await.unwrap();
        shooter.id
    }
}
