use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender as recorded on the shooter's club registration
///
/// `Unknown` is a data-quality gap, not a third competition category:
/// a shooter with unknown gender can never be classified.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Suffix appended to gender-specific age-class labels ("m" / "w")
    ///
    /// # Example
    /// ```
    /// use kreismeisterschaft_api::domain::shooter::Gender;
    ///
    /// assert_eq!(Gender::Female.class_suffix(), Some("w"));
    /// assert_eq!(Gender::Unknown.class_suffix(), None);
    /// ```
    pub fn class_suffix(&self) -> Option<&'static str> {
        match self {
            Gender::Male => Some("m"),
            Gender::Female => Some("w"),
            Gender::Unknown => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Unknown => write!(f, "unknown"),
        }
    }
}
