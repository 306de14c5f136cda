use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::age_class::AgeClass;
use crate::domain::entry::ClassifiedEntry;
use crate::domain::shooter::Gender;

/// How a team came into existence
///
/// # Lifecycle
/// ```text
/// Generated --(manual add/remove)--> Manual
/// ```
/// Regeneration replaces `Generated` teams only; `Manual` teams survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "team_origin", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamOrigin {
    /// Formed by the automatic team formation
    Generated,
    /// Created or edited by an administrator
    Manual,
}

impl fmt::Display for TeamOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamOrigin::Generated => write!(f, "generated"),
            TeamOrigin::Manual => write!(f, "manual"),
        }
    }
}

/// The (club, discipline, season) a team competes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamScope {
    pub club_id: Uuid,
    pub discipline_id: Uuid,
    pub season: i32,
}

impl TeamScope {
    pub fn new(club_id: Uuid, discipline_id: Uuid, season: i32) -> Self {
        Self {
            club_id,
            discipline_id,
            season,
        }
    }
}

impl fmt::Display for TeamScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "club {} / discipline {} / season {}",
            self.club_id, self.discipline_id, self.season
        )
    }
}

/// A team member as placed at formation or edit time
///
/// The age class is a snapshot; validation always reclassifies from the
/// current shooter record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub shooter_id: Uuid,
    pub age_class: AgeClass,
    pub gender: Gender,
    pub qualifying_score: Decimal,
}

impl From<&ClassifiedEntry> for TeamMember {
    fn from(entry: &ClassifiedEntry) -> Self {
        Self {
            shooter_id: entry.shooter_id,
            age_class: entry.age_class.clone(),
            gender: entry.gender,
            qualifying_score: entry.qualifying_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_display() {
        assert_eq!(TeamOrigin::Generated.to_string(), "generated");
        assert_eq!(TeamOrigin::Manual.to_string(), "manual");
    }

    #[test]
    fn origin_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TeamOrigin::Manual).unwrap(),
            "\"manual\""
        );
    }

    #[test]
    fn scopes_order_by_club_first() {
        let discipline = Uuid::new_v4();
        let a = TeamScope::new(Uuid::from_u128(1), discipline, 2026);
        let b = TeamScope::new(Uuid::from_u128(2), discipline, 2025);
        assert!(a < b);
    }

    #[test]
    fn member_from_classified_entry() {
        let entry = ClassifiedEntry {
            shooter_id: Uuid::new_v4(),
            club_id: Uuid::new_v4(),
            discipline_id: Uuid::new_v4(),
            season: 2026,
            gender: Gender::Female,
            qualifying_score: Decimal::new(2915, 1),
            age_class: AgeClass::Class("Damen II".to_string()),
        };

        let member = TeamMember::from(&entry);
        assert_eq!(member.shooter_id, entry.shooter_id);
        assert_eq!(member.age_class.label(), "Damen II");
        assert_eq!(member.qualifying_score, Decimal::new(2915, 1));
    }

    #[test]
    fn member_round_trips_through_json() {
        let member = TeamMember {
            shooter_id: Uuid::new_v4(),
            age_class: AgeClass::Class("Senioren 0".to_string()),
            gender: Gender::Male,
            qualifying_score: Decimal::new(3010, 1),
        };

        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["age_class"], "Senioren 0");

        let parsed: TeamMember = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, member);
    }
}
