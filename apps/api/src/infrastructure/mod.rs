// Infrastructure layer module
// PostgreSQL and in-memory adapters for the domain repository ports

pub mod repositories;
