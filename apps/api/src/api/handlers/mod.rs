// HTTP handlers (driving adapters)

pub mod health;
pub mod teams;
