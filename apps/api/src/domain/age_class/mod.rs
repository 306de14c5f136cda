// Age-class domain module
// The single place where birth year, gender and shooting mode turn into a class label

pub mod calculator;

pub use calculator::{AgeClassCalculator, DEFAULT_EXTENDED_YOUTH_FAMILIES};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Label returned for shooters outside every bracket of a discipline
pub const NOT_ELIGIBLE_LABEL: &str = "nicht startberechtigt";

/// Label returned when birth year or gender are missing or invalid
pub const UNCLASSIFIABLE_LABEL: &str = "nicht klassifizierbar";

/// A shooter's age class for one discipline and season
///
/// Classes are compared by label only: two shooters with the same label
/// are interchangeable for team compatibility. The two sentinels never
/// satisfy any compatibility rule.
///
/// # Example
/// ```
/// use kreismeisterschaft_api::domain::age_class::AgeClass;
///
/// let class = AgeClass::from("Senioren I m".to_string());
/// assert!(class.is_classified());
/// assert_eq!(class.label(), "Senioren I m");
/// assert!(!AgeClass::from("nicht klassifizierbar".to_string()).is_classified());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgeClass {
    Class(String),
    NotEligible,
    Unclassifiable,
}

impl AgeClass {
    pub fn label(&self) -> &str {
        match self {
            AgeClass::Class(label) => label,
            AgeClass::NotEligible => NOT_ELIGIBLE_LABEL,
            AgeClass::Unclassifiable => UNCLASSIFIABLE_LABEL,
        }
    }

    /// True unless this is one of the sentinels
    pub fn is_classified(&self) -> bool {
        matches!(self, AgeClass::Class(_))
    }
}

impl From<String> for AgeClass {
    fn from(label: String) -> Self {
        match label.as_str() {
            NOT_ELIGIBLE_LABEL => AgeClass::NotEligible,
            UNCLASSIFIABLE_LABEL => AgeClass::Unclassifiable,
            _ => AgeClass::Class(label),
        }
    }
}

impl From<AgeClass> for String {
    fn from(class: AgeClass) -> Self {
        match class {
            AgeClass::Class(label) => label,
            other => other.label().to_string(),
        }
    }
}

impl fmt::Display for AgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs the calculator refuses outright
///
/// Missing or implausible shooter data is not an error; it yields
/// [`AgeClass::Unclassifiable`]. Only caller bugs end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgeClassError {
    #[error("Invalid season: {0} (must be a positive year)")]
    InvalidSeason(i32),
}
