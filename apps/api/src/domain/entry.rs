use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::age_class::AgeClass;
use super::shooter::{Gender, Shooter};
use super::team::value_objects::TeamScope;

/// A shooter's registration ("Meldung") for one discipline in one season
///
/// At most one entry exists per (shooter, discipline, season); the entry
/// store enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Entry {
    pub shooter_id: Uuid,
    pub discipline_id: Uuid,
    pub season: i32,
    pub qualifying_score: Decimal,
}

impl Entry {
    pub fn new(shooter_id: Uuid, discipline_id: Uuid, season: i32, qualifying_score: Decimal) -> Self {
        Self {
            shooter_id,
            discipline_id,
            season,
            qualifying_score,
        }
    }
}

/// An entry joined with its shooter and the computed age class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub shooter_id: Uuid,
    pub club_id: Uuid,
    pub discipline_id: Uuid,
    pub season: i32,
    pub gender: Gender,
    pub qualifying_score: Decimal,
    pub age_class: AgeClass,
}

impl ClassifiedEntry {
    pub fn new(entry: &Entry, shooter: &Shooter, age_class: AgeClass) -> Self {
        Self {
            shooter_id: entry.shooter_id,
            club_id: shooter.club_id,
            discipline_id: entry.discipline_id,
            season: entry.season,
            gender: shooter.gender,
            qualifying_score: entry.qualifying_score,
            age_class,
        }
    }

    /// The (club, discipline, season) scope this entry can be teamed in
    pub fn scope(&self) -> TeamScope {
        TeamScope::new(self.club_id, self.discipline_id, self.season)
    }
}
