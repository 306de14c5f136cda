// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod age_class;
pub mod discipline;
pub mod entry;
pub mod repositories;
pub mod rules;
pub mod shooter;
pub mod team;
