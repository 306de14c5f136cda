use thiserror::Error;
use uuid::Uuid;

use super::validator::ValidationResult;
use crate::domain::age_class::AgeClassError;
use crate::domain::repositories::RepositoryError;
use crate::domain::team::{TeamError, TeamScope};

/// Errors returned by the team service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Team membership is invalid: {}", .0.summary())]
    Validation(ValidationResult),

    #[error("Team generation for {0} is already running")]
    RegenerationInProgress(TeamScope),

    #[error("Shooter {shooter_id} was placed in another team concurrently")]
    AssignmentConflict { shooter_id: Uuid },

    #[error(transparent)]
    Team(#[from] TeamError),

    #[error(transparent)]
    Classification(#[from] AgeClassError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepositoryError::AssignmentConflict { shooter_id } => {
                Self::AssignmentConflict { shooter_id }
            }
            other => Self::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validator::ValidationError;

    #[test]
    fn repository_not_found_becomes_service_not_found() {
        let id = Uuid::new_v4();
        let error = ServiceError::from(RepositoryError::NotFound { entity: "Team", id });

        assert!(matches!(error, ServiceError::NotFound { entity: "Team", .. }));
        assert_eq!(error.to_string(), format!("Team not found: {}", id));
    }

    #[test]
    fn storage_conflict_keeps_the_shooter() {
        let shooter_id = Uuid::new_v4();
        let error = ServiceError::from(RepositoryError::AssignmentConflict { shooter_id });

        assert!(matches!(
            error,
            ServiceError::AssignmentConflict { shooter_id: id } if id == shooter_id
        ));
    }

    #[test]
    fn validation_error_lists_every_reason() {
        let result = ValidationResult::from_violations(vec![
            ValidationError::ClubMismatch,
            ValidationError::TooManyMembers { count: 4, max: 3 },
        ]);

        assert_eq!(
            ServiceError::Validation(result).to_string(),
            "Team membership is invalid: Members belong to different clubs; A team has at most 3 members, 4 proposed"
        );
    }
}
