use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::Gender;

/// A registered club member who can enter championship disciplines
///
/// Shooters are owned by the club administration; team formation only
/// reads them. `birth_year` is optional because imported member lists
/// are frequently incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shooter {
    pub id: Uuid,
    pub club_id: Uuid,
    pub full_name: String,
    pub birth_year: Option<i32>,
    pub gender: Gender,
}

impl Shooter {
    /// Creates a shooter with a fresh id
    ///
    /// # Example
    /// ```
    /// use kreismeisterschaft_api::domain::shooter::{Gender, Shooter};
    /// use uuid::Uuid;
    ///
    /// let shooter = Shooter::new(Uuid::new_v4(), "Anna Weber", Some(1961), Gender::Female);
    /// assert_eq!(shooter.birth_year, Some(1961));
    /// ```
    pub fn new(
        club_id: Uuid,
        full_name: impl Into<String>,
        birth_year: Option<i32>,
        gender: Gender,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            club_id,
            full_name: full_name.into(),
            birth_year,
            gender,
        }
    }
}
