use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::age_class::AgeClass;
use crate::domain::entry::ClassifiedEntry;
use crate::domain::rules::{Compatibility, CompatibilityChecker};
use crate::domain::shooter::Gender;
use crate::domain::team::TEAM_SIZE;

/// A single reason why a proposed team membership is invalid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A team has at most {max} members, {count} proposed")]
    TooManyMembers { count: usize, max: usize },

    #[error("Shooter {0} is listed more than once")]
    DuplicateMember(Uuid),

    #[error("Shooter {0} does not exist")]
    UnknownShooter(Uuid),

    #[error("Shooter {0} has no entry for this discipline and season")]
    MissingEntry(Uuid),

    #[error("Members belong to different clubs")]
    ClubMismatch,

    #[error("Shooter {shooter_id} is entered for a different discipline or season")]
    ScopeMismatch { shooter_id: Uuid },

    #[error("Shooter {0} cannot be classified (birth year or gender missing)")]
    Unclassifiable(Uuid),

    #[error("Shooter {0} is not eligible in this discipline")]
    NotEligible(Uuid),

    #[error("Age classes {} cannot be combined in one team", .labels.join(", "))]
    IncompatibleAgeClasses { labels: Vec<String> },

    #[error("Rule '{rule}' does not allow mixed-gender teams")]
    MixedGender { rule: String },

    #[error("Shooter {shooter_id} is already assigned to team {team_id}")]
    AlreadyAssigned { shooter_id: Uuid, team_id: Uuid },
}

/// Every rule a proposed membership violates, not just the first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    #[serde(skip)]
    violations: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<ValidationError>) -> Self {
        Self {
            valid: violations.is_empty(),
            errors: violations.iter().map(ToString::to_string).collect(),
            violations,
        }
    }

    pub fn violations(&self) -> &[ValidationError] {
        &self.violations
    }

    /// Adds violations found outside the validator (e.g. unknown shooters)
    pub fn extend(&mut self, more: impl IntoIterator<Item = ValidationError>) {
        for violation in more {
            self.errors.push(violation.to_string());
            self.violations.push(violation);
        }
        self.valid = self.violations.is_empty();
    }

    /// All error messages on one line
    pub fn summary(&self) -> String {
        self.errors.join("; ")
    }
}

/// Checks a proposed team membership against team size, the compatibility
/// rules and the existing assignments
///
/// Used before every manual add/remove and as a post-condition check on
/// generated teams.
#[derive(Debug, Clone)]
pub struct TeamValidator {
    checker: CompatibilityChecker,
}

impl TeamValidator {
    pub fn new(checker: CompatibilityChecker) -> Self {
        Self { checker }
    }

    /// Validates the complete proposed membership of a team
    ///
    /// # Arguments
    /// * `team_id` - the team being edited, `None` for a new team
    /// * `candidates` - all proposed members, classified for the team's
    ///   discipline and season
    /// * `assignments` - shooter id to team id for the same discipline and season
    pub fn validate(
        &self,
        team_id: Option<Uuid>,
        candidates: &[ClassifiedEntry],
        assignments: &HashMap<Uuid, Uuid>,
    ) -> ValidationResult {
        let mut violations = Vec::new();

        if candidates.len() > TEAM_SIZE {
            violations.push(ValidationError::TooManyMembers {
                count: candidates.len(),
                max: TEAM_SIZE,
            });
        }

        let mut seen = HashSet::new();
        for candidate in candidates {
            if !seen.insert(candidate.shooter_id) {
                violations.push(ValidationError::DuplicateMember(candidate.shooter_id));
            }
        }

        if let Some(first) = candidates.first() {
            if candidates.iter().any(|c| c.club_id != first.club_id) {
                violations.push(ValidationError::ClubMismatch);
            }
            for candidate in candidates {
                if candidate.discipline_id != first.discipline_id || candidate.season != first.season {
                    violations.push(ValidationError::ScopeMismatch {
                        shooter_id: candidate.shooter_id,
                    });
                }
            }
        }

        let mut classified = Vec::new();
        for candidate in candidates {
            match candidate.age_class {
                AgeClass::Class(_) => classified.push(candidate),
                AgeClass::Unclassifiable => {
                    violations.push(ValidationError::Unclassifiable(candidate.shooter_id))
                }
                AgeClass::NotEligible => {
                    violations.push(ValidationError::NotEligible(candidate.shooter_id))
                }
            }
        }

        let genders: Vec<Gender> = classified.iter().map(|c| c.gender).collect();
        match self
            .checker
            .check(classified.iter().map(|c| &c.age_class), &genders)
        {
            Compatibility::Compatible { .. } | Compatibility::Unclassified { .. } => {}
            Compatibility::NoMatchingRule { labels } => {
                violations.push(ValidationError::IncompatibleAgeClasses { labels })
            }
            Compatibility::MixedGender { rule } => {
                violations.push(ValidationError::MixedGender { rule })
            }
        }

        for candidate in candidates {
            if let Some(other) = assignments.get(&candidate.shooter_id) {
                if Some(*other) != team_id {
                    violations.push(ValidationError::AlreadyAssigned {
                        shooter_id: candidate.shooter_id,
                        team_id: *other,
                    });
                }
            }
        }

        ValidationResult::from_violations(violations)
    }
}
