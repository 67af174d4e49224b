//! # Merge View
//!
//! Combines the immutable [`TermRecord`]s with the operator's overrides into the
//! *effective* values everything else reads: listing, filtering, sorting, stats
//! and both exports. Nothing downstream looks at base values directly, so an
//! override always takes effect everywhere at once.
//!
//! | Effective value | Source |
//! |-----------------|--------|
//! | categories      | edited categories, else `[base_category]` |
//! | proposed term   | edited proposed term, else `base_proposed_term` |
//! | completed       | id is in the completed set |

use crate::error::{Result, TriageError};
use crate::model::{Category, Priority, TermRecord};
use crate::overrides::OverrideStore;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

/// Placeholder some operators type instead of leaving a term unchanged.
pub const NO_CHANGE_SENTINEL: &str = "No change needed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveRecord {
    pub record: TermRecord,
    pub categories: Vec<Category>,
    pub proposed_term: String,
    pub completed: bool,
    pub selected: bool,
}

impl EffectiveRecord {
    pub fn new(record: &TermRecord, overrides: &OverrideStore) -> Self {
        Self {
            categories: overrides.effective_categories(record).as_slice().to_vec(),
            proposed_term: overrides.effective_term(record).to_string(),
            completed: overrides.is_completed(record.id),
            selected: overrides.is_selected(record.id),
            record: record.clone(),
        }
    }

    /// Whether exporting this record would rewrite the stored term.
    pub fn needs_change(&self) -> bool {
        self.proposed_term != self.record.raw_term && self.proposed_term != NO_CHANGE_SENTINEL
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    fn primary_category(&self) -> Category {
        self.categories
            .first()
            .copied()
            .unwrap_or(self.record.base_category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl FromStr for StatusFilter {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" | "open" => Ok(StatusFilter::Pending),
            "completed" | "done" => Ok(StatusFilter::Completed),
            _ => Err(TriageError::Api(format!("Unknown status filter: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most failed searches first.
    #[default]
    Impact,
    Alphabetical,
    /// Primary category, then most failed searches.
    Category,
    Id,
}

impl FromStr for SortOrder {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "impact" => Ok(SortOrder::Impact),
            "alphabetical" | "alpha" => Ok(SortOrder::Alphabetical),
            "category" => Ok(SortOrder::Category),
            "id" => Ok(SortOrder::Id),
            _ => Err(TriageError::Api(format!("Unknown sort order: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub search: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub status: StatusFilter,
}

impl RecordFilter {
    pub fn matches(&self, rec: &EffectiveRecord) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty() && !rec.record.raw_term.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if self.priority.is_some_and(|p| p != rec.record.priority) {
            return false;
        }
        if self.category.is_some_and(|c| !rec.has_category(c)) {
            return false;
        }
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Pending => !rec.completed,
            StatusFilter::Completed => rec.completed,
        }
    }
}

pub fn effective_records(records: &[TermRecord], overrides: &OverrideStore) -> Vec<EffectiveRecord> {
    records
        .iter()
        .map(|r| EffectiveRecord::new(r, overrides))
        .collect()
}

/// Filter then sort. Ties keep input order.
pub fn query(
    records: &[TermRecord],
    overrides: &OverrideStore,
    filter: &RecordFilter,
    sort: SortOrder,
) -> Vec<EffectiveRecord> {
    let mut matching: Vec<EffectiveRecord> = records
        .iter()
        .map(|r| EffectiveRecord::new(r, overrides))
        .filter(|rec| filter.matches(rec))
        .collect();
    matching.sort_by(|a, b| compare(a, b, sort));
    matching
}

fn compare(a: &EffectiveRecord, b: &EffectiveRecord, sort: SortOrder) -> Ordering {
    let by_impact = || {
        b.record
            .occurrence_count
            .cmp(&a.record.occurrence_count)
    };
    match sort {
        SortOrder::Impact => by_impact(),
        SortOrder::Alphabetical => a
            .record
            .raw_term
            .to_lowercase()
            .cmp(&b.record.raw_term.to_lowercase()),
        SortOrder::Category => a
            .primary_category()
            .as_str()
            .cmp(b.primary_category().as_str())
            .then_with(by_impact),
        SortOrder::Id => a.record.id.cmp(&b.record.id),
    }
}

/// Headline numbers for a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_terms: usize,
    pub critical: usize,
    /// Records whose effective categories include formatting or incomplete.
    pub formatting: usize,
    /// Sum of failed searches.
    pub total_impact: u64,
    pub completed: usize,
    pub remaining: usize,
    pub needs_change: usize,
}

impl Stats {
    pub fn compute(records: &[EffectiveRecord]) -> Self {
        let completed = records.iter().filter(|r| r.completed).count();
        Self {
            total_terms: records.len(),
            critical: records
                .iter()
                .filter(|r| r.record.priority == Priority::Critical)
                .count(),
            formatting: records
                .iter()
                .filter(|r| r.has_category(Category::Formatting) || r.has_category(Category::Incomplete))
                .count(),
            total_impact: records.iter().map(|r| r.record.occurrence_count).sum(),
            completed,
            remaining: records.len() - completed,
            needs_change: records.iter().filter(|r| r.needs_change()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InputTerm;
    use crate::records::build_records;

    fn records() -> Vec<TermRecord> {
        build_records(&[
            InputTerm::new("\"rose", 12),
            InputTerm::new("assorted tulips", 3),
            InputTerm::new("Hydrangea", 25),
            InputTerm::new("christmas wreath", 12),
            InputTerm::new("lavendar", 1),
        ])
    }

    fn ids(list: &[EffectiveRecord]) -> Vec<u32> {
        list.iter().map(|r| r.record.id).collect()
    }

    #[test]
    fn test_effective_values_fall_back_to_base() {
        let records = records();
        let store = OverrideStore::new();
        let rec = EffectiveRecord::new(&records[0], &store);
        assert_eq!(rec.categories, vec![Category::Formatting]);
        assert_eq!(rec.proposed_term, "rose");
        assert!(!rec.completed);
        assert!(rec.needs_change());
    }

    #[test]
    fn test_effective_values_prefer_overrides() {
        let records = records();
        let mut store = OverrideStore::new();
        store.set_completed(1, true);
        store.edit_proposed_term(1, "roses");
        store.add_category(&records[0], Category::Typo);

        let rec = EffectiveRecord::new(&records[0], &store);
        assert_eq!(rec.categories, vec![Category::Formatting, Category::Typo]);
        assert_eq!(rec.proposed_term, "roses");
        assert!(rec.completed);
    }

    #[test]
    fn test_sentinel_and_identity_need_no_change() {
        let records = records();
        let mut store = OverrideStore::new();
        assert!(!EffectiveRecord::new(&records[2], &store).needs_change());

        store.edit_proposed_term(1, NO_CHANGE_SENTINEL);
        assert!(!EffectiveRecord::new(&records[0], &store).needs_change());
    }

    #[test]
    fn test_default_sort_is_impact_with_stable_ties() {
        let records = records();
        let list = query(&records, &OverrideStore::new(), &RecordFilter::default(), SortOrder::Impact);
        assert_eq!(ids(&list), vec![3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_alphabetical_sort_ignores_case() {
        let records = records();
        let list = query(
            &records,
            &OverrideStore::new(),
            &RecordFilter::default(),
            SortOrder::Alphabetical,
        );
        assert_eq!(ids(&list), vec![1, 2, 4, 3, 5]);
    }

    #[test]
    fn test_category_sort_uses_effective_category() {
        let records = records();
        let mut store = OverrideStore::new();
        store.remove_category(&records[2], Category::Typo);
        let list = query(&records, &store, &RecordFilter::default(), SortOrder::Category);
        // formatting, missing-assortment, seasonal, typo, unknown
        assert_eq!(ids(&list), vec![1, 2, 4, 5, 3]);
    }

    #[test]
    fn test_filters_combine() {
        let records = records();
        let mut store = OverrideStore::new();
        store.set_completed(4, true);

        let search = RecordFilter {
            search: Some("ROSE".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query(&records, &store, &search, SortOrder::Id)), vec![1]);

        let high = RecordFilter {
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert_eq!(ids(&query(&records, &store, &high, SortOrder::Id)), vec![1, 4]);

        let pending_high = RecordFilter {
            priority: Some(Priority::High),
            status: StatusFilter::Pending,
            ..Default::default()
        };
        assert_eq!(ids(&query(&records, &store, &pending_high, SortOrder::Id)), vec![1]);

        let typo = RecordFilter {
            category: Some(Category::Typo),
            ..Default::default()
        };
        assert_eq!(ids(&query(&records, &store, &typo, SortOrder::Id)), vec![3, 5]);
    }

    #[test]
    fn test_category_filter_sees_added_categories() {
        let records = records();
        let mut store = OverrideStore::new();
        store.add_category(&records[1], Category::Seasonal);
        let seasonal = RecordFilter {
            category: Some(Category::Seasonal),
            ..Default::default()
        };
        assert_eq!(ids(&query(&records, &store, &seasonal, SortOrder::Id)), vec![2, 4]);
    }

    #[test]
    fn test_stats() {
        let records = records();
        let mut store = OverrideStore::new();
        store.set_completed(1, true);
        let stats = Stats::compute(&effective_records(&records, &store));
        assert_eq!(
            stats,
            Stats {
                total_terms: 5,
                critical: 1,
                formatting: 1,
                total_impact: 53,
                completed: 1,
                remaining: 4,
                needs_change: 2,
            }
        );
    }

    #[test]
    fn test_parse_sort_and_status() {
        assert_eq!("Alpha".parse::<SortOrder>().unwrap(), SortOrder::Alphabetical);
        assert_eq!("done".parse::<StatusFilter>().unwrap(), StatusFilter::Completed);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
