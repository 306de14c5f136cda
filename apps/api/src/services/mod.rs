// Application services
// Pure formation core (pool, engine, validator) plus the async TeamService
// that feeds it from the repository ports

pub mod entry_pool;
pub mod errors;
pub mod formation;
pub mod team_service;
pub mod validator;

pub use entry_pool::{EntryPool, ExcludedEntry, ExclusionReason, PoolBuild};
pub use errors::{ServiceError, ServiceResult};
pub use formation::{FormationReport, TeamFormationEngine};
pub use team_service::{GenerationOutcome, TeamService};
pub use validator::{TeamValidator, ValidationError, ValidationResult};
