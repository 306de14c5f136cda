use std::collections::BTreeSet;
use std::sync::Arc;

use super::table::CompatibilityRuleTable;
use crate::domain::age_class::AgeClass;
use crate::domain::shooter::Gender;

/// Outcome of a compatibility check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// The labels fit under the named rule (empty for an empty label set)
    Compatible { rule: Option<String> },
    /// At least one label is a sentinel and can never be teamed
    Unclassified { label: String },
    /// No single rule contains all labels
    NoMatchingRule { labels: Vec<String> },
    /// The covering rule requires a single gender
    MixedGender { rule: String },
}

impl Compatibility {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible { .. })
    }
}

/// Decides whether a set of age classes may share one team
///
/// All decisions come from the configured [`CompatibilityRuleTable`]; the
/// checker itself knows nothing about concrete class names.
#[derive(Debug, Clone)]
pub struct CompatibilityChecker {
    table: Arc<CompatibilityRuleTable>,
}

impl CompatibilityChecker {
    pub fn new(table: CompatibilityRuleTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &CompatibilityRuleTable {
        &self.table
    }

    /// Checks a set of classes together with the members' genders
    ///
    /// # Rules
    /// - sentinel classes are never compatible
    /// - the first rule covering all labels decides
    /// - a single-gender rule rejects differing genders
    ///
    /// # Example
    /// ```
    /// use kreismeisterschaft_api::domain::age_class::AgeClass;
    /// use kreismeisterschaft_api::domain::rules::{CompatibilityChecker, CompatibilityRuleTable};
    /// use kreismeisterschaft_api::domain::shooter::Gender;
    ///
    /// let checker = CompatibilityChecker::new(CompatibilityRuleTable::canonical());
    /// let classes = [
    ///     AgeClass::from("Senioren I m".to_string()),
    ///     AgeClass::from("Senioren II m".to_string()),
    /// ];
    /// assert!(checker.is_compatible(&classes, &[Gender::Male, Gender::Male]));
    /// ```
    pub fn check<'a, I>(&self, classes: I, genders: &[Gender]) -> Compatibility
    where
        I: IntoIterator<Item = &'a AgeClass>,
    {
        let mut labels = BTreeSet::new();
        for class in classes {
            if !class.is_classified() {
                return Compatibility::Unclassified {
                    label: class.label().to_string(),
                };
            }
            labels.insert(class.label());
        }

        if labels.is_empty() {
            return Compatibility::Compatible { rule: None };
        }

        let Some(rule) = self.table.first_covering(&labels) else {
            return Compatibility::NoMatchingRule {
                labels: labels.into_iter().map(str::to_string).collect(),
            };
        };

        if !rule.allow_mixed_gender && !single_gender(genders) {
            return Compatibility::MixedGender {
                rule: rule.description.clone(),
            };
        }

        Compatibility::Compatible {
            rule: Some(rule.description.clone()),
        }
    }

    pub fn is_compatible<'a, I>(&self, classes: I, genders: &[Gender]) -> bool
    where
        I: IntoIterator<Item = &'a AgeClass>,
    {
        self.check(classes, genders).is_compatible()
    }
}

impl Default for CompatibilityChecker {
    fn default() -> Self {
        Self::new(CompatibilityRuleTable::canonical())
    }
}

fn single_gender(genders: &[Gender]) -> bool {
    genders.windows(2).all(|pair| pair[0] == pair[1])
}
