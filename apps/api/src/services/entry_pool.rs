use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

use crate::domain::age_class::{AgeClass, AgeClassCalculator, AgeClassError};
use crate::domain::discipline::Discipline;
use crate::domain::entry::{ClassifiedEntry, Entry};
use crate::domain::shooter::Shooter;
use crate::domain::team::TeamScope;

/// Why an entry was kept out of automatic team formation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Birth year or gender missing or invalid
    Unclassifiable,
    /// The shooter's age is outside every bracket of the discipline
    NotEligible,
    /// The age class is not listed in any compatibility rule
    NoMatchingRule { age_class: String },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Unclassifiable => {
                write!(f, "birth year or gender missing, needs manual placement")
            }
            ExclusionReason::NotEligible => write!(f, "not eligible in this discipline"),
            ExclusionReason::NoMatchingRule { age_class } => {
                write!(f, "age class '{}' is not in any team rule", age_class)
            }
        }
    }
}

/// An entry that could not be auto-assigned, surfaced to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedEntry {
    pub shooter_id: Uuid,
    pub reason: ExclusionReason,
}

impl ExcludedEntry {
    pub fn new(shooter_id: Uuid, reason: ExclusionReason) -> Self {
        Self { shooter_id, reason }
    }

    /// Exclusion for a sentinel class; `None` for a real class
    pub fn for_class(shooter_id: Uuid, class: &AgeClass) -> Option<Self> {
        let reason = match class {
            AgeClass::Class(_) => return None,
            AgeClass::NotEligible => ExclusionReason::NotEligible,
            AgeClass::Unclassifiable => ExclusionReason::Unclassifiable,
        };
        Some(Self::new(shooter_id, reason))
    }
}

/// Classified, unassigned entries of one club, discipline and season
#[derive(Debug, Clone)]
pub struct EntryPool {
    scope: TeamScope,
    entries: Vec<ClassifiedEntry>,
}

/// Result of building a pool: the usable entries plus everything left out
#[derive(Debug, Clone)]
pub struct PoolBuild {
    pub pool: EntryPool,
    pub excluded: Vec<ExcludedEntry>,
}

impl EntryPool {
    /// Builds the working set for one scope
    ///
    /// # Arguments
    /// * `calculator` - age class calculator
    /// * `scope` - club, discipline and season to build for
    /// * `discipline` - the scope's discipline record
    /// * `entries` - raw entries; others than the scope's are ignored
    /// * `shooters` - shooter records by id
    /// * `assigned` - shooters already placed in a team of this discipline and season
    ///
    /// Entries of other clubs are ignored, and so are entries whose shooter
    /// record is missing, since no club can be attributed to them.
    /// Unclassifiable or ineligible shooters are returned in `excluded`.
    pub fn build(
        calculator: &AgeClassCalculator,
        scope: TeamScope,
        discipline: &Discipline,
        entries: &[Entry],
        shooters: &HashMap<Uuid, Shooter>,
        assigned: &HashSet<Uuid>,
    ) -> Result<PoolBuild, AgeClassError> {
        let mut pool = Vec::new();
        let mut excluded = Vec::new();

        let in_scope = entries.iter().filter(|e| {
            e.discipline_id == scope.discipline_id
                && e.season == scope.season
                && !assigned.contains(&e.shooter_id)
        });

        for entry in in_scope {
            let Some(shooter) = shooters.get(&entry.shooter_id) else {
                tracing::warn!(shooter_id = %entry.shooter_id, "Entry references unknown shooter");
                continue;
            };
            if shooter.club_id != scope.club_id {
                continue;
            }

            let age_class = calculator.classify_shooter(shooter, discipline, scope.season)?;
            if let Some(exclusion) = ExcludedEntry::for_class(shooter.id, &age_class) {
                tracing::warn!(
                    shooter_id = %shooter.id,
                    shooter = %shooter.full_name,
                    reason = %exclusion.reason,
                    "Shooter left out of automatic team formation"
                );
                excluded.push(exclusion);
                continue;
            }

            pool.push(ClassifiedEntry::new(entry, shooter, age_class));
        }

        Ok(PoolBuild {
            pool: EntryPool {
                scope,
                entries: pool,
            },
            excluded,
        })
    }

    pub fn scope(&self) -> TeamScope {
        self.scope
    }

    pub fn entries(&self) -> &[ClassifiedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
