use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How a discipline is shot, which decides the age banding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shooting_mode", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShootingMode {
    /// Rest-supported ("Auflage")
    Supported,
    /// Freehand
    Freehand,
}

impl fmt::Display for ShootingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShootingMode::Supported => write!(f, "supported"),
            ShootingMode::Freehand => write!(f, "freehand"),
        }
    }
}

/// A championship discipline
///
/// `family` groups related disciplines (e.g. all air-rifle variants) and
/// is only consulted to open the extended youth brackets in supported mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Discipline {
    pub id: Uuid,
    pub name: String,
    pub mode: ShootingMode,
    pub family: String,
    pub min_age: i32,
}

impl Discipline {
    pub fn new(
        name: impl Into<String>,
        mode: ShootingMode,
        family: impl Into<String>,
        min_age: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            mode,
            family: family.into(),
            min_age,
        }
    }
}
