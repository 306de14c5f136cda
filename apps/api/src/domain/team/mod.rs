// Team domain module
// Championship team aggregate, its scope/member value objects and events

#![allow(clippy::module_inception)]

pub mod events;
pub mod team;
pub mod value_objects;

// Re-export main types for convenience
pub use events::TeamEvent;
pub use team::{Team, TeamError, TEAM_SIZE};
pub use value_objects::{TeamMember, TeamOrigin, TeamScope};
