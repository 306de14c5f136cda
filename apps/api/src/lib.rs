//! Kreismeisterschaft API Library
//!
//! Team formation for district shooting championships: age classification,
//! compatibility rules, greedy team formation and membership validation,
//! plus the repositories and HTTP layer around them.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod services;
