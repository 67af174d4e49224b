use crate::model::{Issue, Priority};

/// Rank how urgently a term needs fixing.
///
/// Count thresholds are checked first down to `high`; a term with more than one
/// issue is escalated to `high` before the `medium`/`low` thresholds apply, even
/// when nobody searched for it.
pub fn rank(occurrence_count: u64, issues: &[Issue]) -> Priority {
    if occurrence_count >= 20 {
        Priority::Critical
    } else if occurrence_count >= 10 || issues.len() > 1 {
        Priority::High
    } else if occurrence_count >= 5 {
        Priority::Medium
    } else {
        Priority::Low
    }
}
