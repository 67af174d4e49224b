use crate::dataset::InputTerm;
use crate::model::{RecordId, TermRecord};
use crate::rules::advise::advise;
use crate::rules::categorize::categorize_issues;
use crate::rules::{detect_issues, normalize, rank};

/// Classify every input term. Ids follow input order, starting at 1.
pub fn build_records(inputs: &[InputTerm]) -> Vec<TermRecord> {
    inputs
        .iter()
        .zip(1..)
        .map(|(input, id)| build_record(id, input))
        .collect()
}

pub fn build_record(id: RecordId, input: &InputTerm) -> TermRecord {
    let issues = detect_issues(&input.term);
    let base_category = categorize_issues(&input.term, &issues);
    let suggested_fix = advise(&issues, base_category);

    TermRecord {
        id,
        raw_term: input.term.clone(),
        occurrence_count: input.count,
        base_proposed_term: normalize(&input.term),
        priority: rank(input.count, &issues),
        issues,
        base_category,
        suggested_fix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Flower, Issue, Priority};
    use crate::rules::{categorize, suggested_fix};

    #[test]
    fn test_ids_follow_input_order() {
        let records = build_records(&[
            InputTerm::new("rose", 1),
            InputTerm::new("tulip", 2),
            InputTerm::new("rose", 3),
        ]);
        let ids: Vec<RecordId> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(records[2].raw_term, "rose");
        assert_eq!(records[2].occurrence_count, 3);
    }

    #[test]
    fn test_quote_prefixed_misspelling_record() {
        let record = build_record(1, &InputTerm::new("\"lillies  bunch", 2));
        assert_eq!(
            record.issues,
            vec![
                Issue::UnmatchedQuotes,
                Issue::IncompleteQuotes,
                Issue::MultipleSpaces,
                Issue::Misspelling(Flower::Lilies),
            ]
        );
        assert_eq!(record.base_category, Category::Formatting);
        assert_eq!(record.base_proposed_term, "lilies bunch");
        assert_eq!(record.suggested_fix, "Remove quotes or properly close them");
        // four issues escalate a low count
        assert_eq!(record.priority, Priority::High);
    }

    #[test]
    fn test_clean_record() {
        let record = build_record(7, &InputTerm::new("hydrangea", 4));
        assert!(record.issues.is_empty());
        assert_eq!(record.base_category, Category::Typo);
        assert_eq!(record.base_proposed_term, record.raw_term);
        assert_eq!(record.priority, Priority::Low);
    }

    #[test]
    fn test_assortment_record() {
        let record = build_record(1, &InputTerm::new("assorted roses", 3));
        assert_eq!(record.base_category, Category::MissingAssortment);
        assert_eq!(record.priority, Priority::Low);
    }

    #[test]
    fn test_record_agrees_with_standalone_rules() {
        for term in ["\"spring flowers", "tropicals", "roses (red", " moab "] {
            let record = build_record(1, &InputTerm::new(term, 0));
            assert_eq!(record.base_category, categorize(term));
            assert_eq!(record.suggested_fix, suggested_fix(term));
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(build_records(&[]).is_empty());
    }
}
