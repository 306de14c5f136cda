use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::entry::ClassifiedEntry;
use crate::domain::rules::{Compatibility, CompatibilityChecker};
use crate::domain::shooter::Gender;
use crate::domain::team::{Team, TeamEvent, TeamMember, TeamScope, TEAM_SIZE};
use crate::services::entry_pool::{ExcludedEntry, ExclusionReason};

/// Teams formed in one run plus the entries that could not be placed
#[derive(Debug, Clone, Default)]
pub struct FormationReport {
    pub teams: Vec<Team>,
    pub events: Vec<TeamEvent>,
    pub excluded: Vec<ExcludedEntry>,
}

/// Greedy, score-first team formation
///
/// # Algorithm
/// 1. Rank entries by qualifying score, best first; equal scores by
///    shooter id ascending
/// 2. Seed a team with the best unplaced entry
/// 3. Add the next best unplaced entries that keep the team compatible,
///    until it has three members or nobody fits
/// 4. Repeat until every entry is placed; teams that stay short are kept
///    as incomplete teams
///
/// Teams never span clubs, disciplines or seasons.
#[derive(Debug, Clone)]
pub struct TeamFormationEngine {
    checker: CompatibilityChecker,
}

impl TeamFormationEngine {
    pub fn new(checker: CompatibilityChecker) -> Self {
        Self { checker }
    }

    /// Forms teams from a set of classified entries
    ///
    /// Teams are returned best first (total score, then best member score)
    /// and numbered from 1 per club in that order.
    pub fn generate(&self, entries: &[ClassifiedEntry]) -> FormationReport {
        let mut report = FormationReport::default();
        let mut scopes: BTreeMap<TeamScope, Vec<&ClassifiedEntry>> = BTreeMap::new();

        for entry in entries {
            if let Some(exclusion) = ExcludedEntry::for_class(entry.shooter_id, &entry.age_class) {
                report.excluded.push(exclusion);
                continue;
            }
            scopes.entry(entry.scope()).or_default().push(entry);
        }

        for (scope, mut ranked) in scopes {
            ranked.sort_by(|a, b| rank_order(a, b));

            let mut buckets = self.fill_buckets(&ranked, &mut report.excluded);
            buckets.sort_by(|a, b| bucket_order(a, b));

            for (index, bucket) in buckets.into_iter().enumerate() {
                let members = bucket.iter().map(|e| TeamMember::from(*e)).collect();
                match Team::generated(scope, index as i32 + 1, members) {
                    Ok((team, events)) => {
                        report.teams.push(team);
                        report.events.extend(events);
                    }
                    Err(e) => tracing::error!(%scope, error = %e, "Formed an invalid team"),
                }
            }

            tracing::debug!(
                %scope,
                entries = ranked.len(),
                "Formed teams for scope"
            );
        }

        report.teams.sort_by(|a, b| {
            b.total_score()
                .cmp(&a.total_score())
                .then_with(|| b.best_score().cmp(&a.best_score()))
                .then_with(|| a.member_ids().first().cmp(&b.member_ids().first()))
        });
        report
    }

    fn fill_buckets<'a>(
        &self,
        ranked: &[&'a ClassifiedEntry],
        excluded: &mut Vec<ExcludedEntry>,
    ) -> Vec<Vec<&'a ClassifiedEntry>> {
        let mut placed = vec![false; ranked.len()];
        let mut buckets = Vec::new();

        for seed in 0..ranked.len() {
            if placed[seed] {
                continue;
            }
            placed[seed] = true;

            let mut bucket = vec![ranked[seed]];
            if let Compatibility::NoMatchingRule { .. } = self.check(&bucket) {
                excluded.push(ExcludedEntry::new(
                    ranked[seed].shooter_id,
                    ExclusionReason::NoMatchingRule {
                        age_class: ranked[seed].age_class.label().to_string(),
                    },
                ));
                continue;
            }

            for candidate in seed + 1..ranked.len() {
                if bucket.len() == TEAM_SIZE {
                    break;
                }
                if placed[candidate] {
                    continue;
                }

                bucket.push(ranked[candidate]);
                if self.check(&bucket).is_compatible() {
                    placed[candidate] = true;
                } else {
                    bucket.pop();
                }
            }

            buckets.push(bucket);
        }

        buckets
    }

    fn check(&self, bucket: &[&ClassifiedEntry]) -> Compatibility {
        let genders: Vec<Gender> = bucket.iter().map(|e| e.gender).collect();
        self.checker
            .check(bucket.iter().map(|e| &e.age_class), &genders)
    }
}

/// Best score first, then shooter id ascending
fn rank_order(a: &ClassifiedEntry, b: &ClassifiedEntry) -> Ordering {
    b.qualifying_score
        .cmp(&a.qualifying_score)
        .then_with(|| a.shooter_id.cmp(&b.shooter_id))
}

fn bucket_order(a: &[&ClassifiedEntry], b: &[&ClassifiedEntry]) -> Ordering {
    let total = |bucket: &[&ClassifiedEntry]| -> rust_decimal::Decimal {
        bucket.iter().map(|e| e.qualifying_score).sum()
    };
    total(b)
        .cmp(&total(a))
        .then_with(|| rank_order(a[0], b[0]))
}
