use std::collections::BTreeSet;

use super::{AgeClass, AgeClassError};
use crate::domain::discipline::{Discipline, ShootingMode};
use crate::domain::shooter::{Gender, Shooter};

/// Discipline families that open the youth brackets in supported mode
pub const DEFAULT_EXTENDED_YOUTH_FAMILIES: &[&str] = &["LG"];

const TIERS: [&str; 6] = ["I", "II", "III", "IV", "V", "VI"];

/// Oldest age a stored birth year may imply before it is treated as bogus
pub const MAX_AGE: i32 = 120;

/// Maps a shooter's birth year and gender onto the class label of a
/// discipline's shooting mode
///
/// The calculator is pure: the same inputs always give the same label.
/// Labels are matched verbatim by the compatibility rule table, so their
/// spelling is part of the contract.
///
/// # Brackets
/// ```text
/// freehand:   <=14 Schüler | <=16 Jugend | <=18 Junioren II | <=20 Junioren I
///             | <=40 Herren/Damen I | <=50 II | <=60 III | <=70 IV | V
/// supported:  <=14 Schüler | 15-40 youth/open classes (extended families only)
///             | 41-50 Senioren 0 | 51-55 I | 56-60 II | 61-65 III
///             | 66-70 IV | 71-80 V | VI
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeClassCalculator {
    extended_youth_families: BTreeSet<String>,
}

impl Default for AgeClassCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENDED_YOUTH_FAMILIES.iter().map(|f| f.to_string()))
    }
}

impl AgeClassCalculator {
    /// Creates a calculator with the given extended-youth family codes
    pub fn new(extended_youth_families: impl IntoIterator<Item = String>) -> Self {
        Self {
            extended_youth_families: extended_youth_families.into_iter().collect(),
        }
    }

    /// Returns true if supported-mode disciplines of this family have youth brackets
    pub fn has_extended_youth(&self, family: &str) -> bool {
        self.extended_youth_families.contains(family)
    }

    /// Classifies one shooter for one discipline mode
    ///
    /// # Returns
    /// * `Ok(AgeClass::Unclassifiable)` - birth year missing, after the season
    ///   or more than [`MAX_AGE`] years before it, or gender unknown
    /// * `Ok(AgeClass::NotEligible)` - no bracket of this mode admits the age
    /// * `Err(AgeClassError)` - the season itself is not a valid year
    ///
    /// # Example
    /// ```
    /// use kreismeisterschaft_api::domain::age_class::{AgeClass, AgeClassCalculator};
    /// use kreismeisterschaft_api::domain::discipline::ShootingMode;
    /// use kreismeisterschaft_api::domain::shooter::Gender;
    ///
    /// let calculator = AgeClassCalculator::default();
    /// let class = calculator
    ///     .classify(Some(1990), Gender::Male, 2026, ShootingMode::Freehand, "LP")
    ///     .unwrap();
    /// assert_eq!(class, AgeClass::Class("Herren I".to_string()));
    /// ```
    pub fn classify(
        &self,
        birth_year: Option<i32>,
        gender: Gender,
        season: i32,
        mode: ShootingMode,
        family: &str,
    ) -> Result<AgeClass, AgeClassError> {
        if season <= 0 {
            return Err(AgeClassError::InvalidSeason(season));
        }

        let Some(birth_year) = birth_year else {
            return Ok(AgeClass::Unclassifiable);
        };
        let Some(age) = age_in(season, birth_year) else {
            return Ok(AgeClass::Unclassifiable);
        };
        if gender.class_suffix().is_none() {
            return Ok(AgeClass::Unclassifiable);
        }

        let class = match mode {
            ShootingMode::Freehand => freehand_class(age, gender),
            ShootingMode::Supported => supported_class(age, gender, self.has_extended_youth(family)),
        };
        Ok(class)
    }

    /// Classifies a shooter for a concrete discipline
    ///
    /// Same as [`classify`](Self::classify), but shooters younger than the
    /// discipline's minimum age are not eligible.
    pub fn classify_shooter(
        &self,
        shooter: &Shooter,
        discipline: &Discipline,
        season: i32,
    ) -> Result<AgeClass, AgeClassError> {
        let class = self.classify(
            shooter.birth_year,
            shooter.gender,
            season,
            discipline.mode,
            &discipline.family,
        )?;

        if let (AgeClass::Class(_), Some(age)) = (
            &class,
            shooter.birth_year.and_then(|year| age_in(season, year)),
        ) {
            if age < discipline.min_age {
                return Ok(AgeClass::NotEligible);
            }
        }
        Ok(class)
    }
}

/// Age reached in `season`, `None` when implausible
fn age_in(season: i32, birth_year: i32) -> Option<i32> {
    season
        .checked_sub(birth_year)
        .filter(|age| (0..=MAX_AGE).contains(age))
}

fn suffixed(name: &str, gender: Gender) -> AgeClass {
    match gender.class_suffix() {
        Some(suffix) => AgeClass::Class(format!("{} {}", name, suffix)),
        None => AgeClass::Unclassifiable,
    }
}

fn open_class(tier: usize, gender: Gender) -> AgeClass {
    let name = match gender {
        Gender::Male => "Herren",
        Gender::Female => "Damen",
        Gender::Unknown => return AgeClass::Unclassifiable,
    };
    AgeClass::Class(format!("{} {}", name, TIERS[tier]))
}

/// Schüler through Junioren I, shared by both modes
fn youth_class(age: i32, gender: Gender) -> Option<AgeClass> {
    let name = match age {
        0..=14 => "Schüler",
        15..=16 => "Jugend",
        17..=18 => "Junioren II",
        19..=20 => "Junioren I",
        _ => return None,
    };
    Some(suffixed(name, gender))
}

fn freehand_class(age: i32, gender: Gender) -> AgeClass {
    if let Some(class) = youth_class(age, gender) {
        return class;
    }
    let tier = match age {
        21..=40 => 0,
        41..=50 => 1,
        51..=60 => 2,
        61..=70 => 3,
        _ => 4,
    };
    open_class(tier, gender)
}

fn supported_class(age: i32, gender: Gender, extended_youth: bool) -> AgeClass {
    match age {
        0..=14 => suffixed("Schüler", gender),
        15..=40 if extended_youth => {
            youth_class(age, gender).unwrap_or_else(|| open_class(0, gender))
        }
        15..=40 => AgeClass::NotEligible,
        41..=50 => AgeClass::Class("Senioren 0".to_string()),
        _ => {
            let tier = match age {
                51..=55 => 0,
                56..=60 => 1,
                61..=65 => 2,
                66..=70 => 3,
                71..=80 => 4,
                _ => 5,
            };
            suffixed(&format!("Senioren {}", TIERS[tier]), gender)
        }
    }
}
