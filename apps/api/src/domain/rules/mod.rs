// Compatibility rules module
// Which age classes may share one team is configuration, not code

pub mod checker;
pub mod table;

pub use checker::{Compatibility, CompatibilityChecker};
pub use table::{CompatibilityRule, CompatibilityRuleTable, RuleTableError};
