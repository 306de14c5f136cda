use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// One configured grouping of age classes that may share a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRule {
    pub description: String,
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub allow_mixed_gender: bool,
}

impl CompatibilityRule {
    pub fn new<I, S>(description: impl Into<String>, labels: I, allow_mixed_gender: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            allow_mixed_gender,
        }
    }

    /// Returns true if every given label belongs to this rule
    pub fn covers<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> bool {
        labels.into_iter().all(|label| self.labels.contains(label))
    }
}

/// Problems detected while loading a rule table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleTableError {
    #[error("Rule table is empty")]
    Empty,

    #[error("Rule '{0}' lists no age classes")]
    EmptyRule(String),
}

/// Ordered list of compatibility rules
///
/// Order is significant: the checker uses the first rule covering a label
/// set. The canonical table has no overlapping labels, but loaded tables
/// may, in which case earlier rules shadow later ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRuleTable {
    rules: Vec<CompatibilityRule>,
}

impl CompatibilityRuleTable {
    /// Builds a table, rejecting empty tables and rules without labels
    ///
    /// Labels claimed by more than one rule are logged and tolerated.
    pub fn new(rules: Vec<CompatibilityRule>) -> Result<Self, RuleTableError> {
        if rules.is_empty() {
            return Err(RuleTableError::Empty);
        }
        if let Some(rule) = rules.iter().find(|r| r.labels.is_empty()) {
            return Err(RuleTableError::EmptyRule(rule.description.clone()));
        }

        let table = Self { rules };
        for (label, owners) in table.overlapping_labels() {
            tracing::warn!(
                label = %label,
                rules = ?owners,
                "Age class appears in several rules; the first one wins"
            );
        }
        Ok(table)
    }

    /// The district's default grouping
    ///
    /// Youth classes may be mixed; each open Herren/Damen tier stands alone;
    /// Senioren 0 only with itself, Senioren I+II together (single gender),
    /// Senioren III to VI as one wide band.
    pub fn canonical() -> Self {
        let mut rules = vec![
            CompatibilityRule::new("Schüler", ["Schüler m", "Schüler w"], true),
            CompatibilityRule::new("Jugend", ["Jugend m", "Jugend w"], true),
            CompatibilityRule::new(
                "Junioren",
                ["Junioren II m", "Junioren II w", "Junioren I m", "Junioren I w"],
                true,
            ),
        ];

        for open in ["Herren", "Damen"] {
            for tier in ["I", "II", "III", "IV", "V"] {
                let label = format!("{} {}", open, tier);
                rules.push(CompatibilityRule::new(label.clone(), [label], false));
            }
        }

        rules.push(CompatibilityRule::new("Senioren 0", ["Senioren 0"], true));
        rules.push(CompatibilityRule::new(
            "Senioren I+II",
            ["Senioren I m", "Senioren I w", "Senioren II m", "Senioren II w"],
            false,
        ));
        rules.push(CompatibilityRule::new(
            "Senioren III-VI",
            ["III", "IV", "V", "VI"].into_iter().flat_map(|tier| {
                ["m", "w"]
                    .into_iter()
                    .map(move |suffix| format!("Senioren {} {}", tier, suffix))
            }),
            true,
        ));

        Self { rules }
    }

    pub fn rules(&self) -> &[CompatibilityRule] {
        &self.rules
    }

    /// First rule whose label set contains every given label
    pub fn first_covering<'a>(
        &self,
        labels: &BTreeSet<&'a str>,
    ) -> Option<&CompatibilityRule> {
        self.rules
            .iter()
            .find(|rule| rule.covers(labels.iter().copied()))
    }

    /// Labels that appear in more than one rule, with the owning rule descriptions
    pub fn overlapping_labels(&self) -> Vec<(String, Vec<String>)> {
        let mut owners: HashMap<&str, Vec<String>> = HashMap::new();
        for rule in &self.rules {
            for label in &rule.labels {
                owners
                    .entry(label.as_str())
                    .or_default()
                    .push(rule.description.clone());
            }
        }

        let mut overlaps: Vec<(String, Vec<String>)> = owners
            .into_iter()
            .filter(|(_, rules)| rules.len() > 1)
            .map(|(label, rules)| (label.to_string(), rules))
            .collect();
        overlaps.sort();
        overlaps
    }
}

impl Default for CompatibilityRuleTable {
    fn default() -> Self {
        Self::canonical()
    }
}
