// Shooter domain module
// Read-only view of club members as seen by team formation

#![allow(clippy::module_inception)]

pub mod shooter;
pub mod value_objects;

pub use shooter::Shooter;
pub use value_objects::Gender;
