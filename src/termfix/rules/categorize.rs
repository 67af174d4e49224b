use super::detect::detect_issues;
use crate::model::{Category, Issue};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}/\d{1,2}/\d{2,4}").unwrap());

const ASSORTMENT_WORDS: &[&str] = &["assorted", "mixed", "variety", "selection", "bundle", "pack"];
const BEST_BY_WORDS: &[&str] = &[
    "best before",
    "best by",
    "bbd",
    "expiry",
    "expires",
    "expiration",
    "use by",
];
const SEASONAL_WORDS: &[&str] = &[
    "christmas",
    "xmas",
    "easter",
    "valentine",
    "mother's day",
    "mothers day",
    "halloween",
    "thanksgiving",
    "holiday",
    "seasonal",
    "spring",
    "summer",
    "autumn",
    "winter",
];
const UNAVAILABLE_WORDS: &[&str] = &[
    "not available",
    "unavailable",
    "out of stock",
    "sold out",
    "discontinued",
    "no longer",
];
const SYNONYM_WORDS: &[&str] = &["butterfly", "wildflowers", "tropicals", "greenery"];
const UNKNOWN_WORDS: &[&str] = &["moab", "kiera", "cremone", "ofea"];

/// Pick the single primary category for a term.
///
/// Issues are recomputed from the term so the result can never disagree with
/// [`detect_issues`].
pub fn categorize(term: &str) -> Category {
    categorize_issues(term, &detect_issues(term))
}

/// Precedence: issue-derived categories first, then keyword groups, then `typo`.
/// Within each tier the first matching check wins.
pub(crate) fn categorize_issues(term: &str, issues: &[Issue]) -> Category {
    if issues
        .iter()
        .any(|i| i.mentions_quotes() || i.mentions_parentheses() || i.mentions_brackets())
    {
        return Category::Formatting;
    }
    if issues.iter().any(Issue::is_incomplete) {
        return Category::Incomplete;
    }
    if issues.iter().any(|i| i.misspelled().is_some()) {
        return Category::Typo;
    }
    if issues.iter().any(Issue::mentions_spaces) {
        return Category::Spacing;
    }

    let clean = term.trim().to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| clean.contains(w));

    // Group order decides ties between overlapping keywords.
    if mentions(ASSORTMENT_WORDS) {
        Category::MissingAssortment
    } else if mentions(BEST_BY_WORDS) || DATE_LIKE.is_match(&clean) {
        Category::Bbd
    } else if mentions(SEASONAL_WORDS) {
        Category::Seasonal
    } else if mentions(UNAVAILABLE_WORDS) {
        Category::NotAvailable
    } else if mentions(SYNONYM_WORDS) {
        Category::Synonym
    } else if mentions(UNKNOWN_WORDS) {
        Category::Unknown
    } else {
        Category::Typo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_beats_seasonal_keyword() {
        assert_eq!(categorize("\"spring flowers"), Category::Formatting);
    }

    #[test]
    fn test_unclosed_bracket_is_formatting() {
        assert_eq!(categorize("roses [red"), Category::Formatting);
    }

    #[test]
    fn test_misspelling_is_typo() {
        assert_eq!(categorize("lavendar"), Category::Typo);
    }

    #[test]
    fn test_spacing_only() {
        assert_eq!(categorize("red  roses"), Category::Spacing);
        assert_eq!(categorize(" roses"), Category::Spacing);
    }

    #[test]
    fn test_misspelling_beats_spacing() {
        assert_eq!(categorize("lillies  bunch"), Category::Typo);
    }

    #[test]
    fn test_keyword_groups() {
        assert_eq!(categorize("assorted roses"), Category::MissingAssortment);
        assert_eq!(categorize("roses best before"), Category::Bbd);
        assert_eq!(categorize("tulips 12/03/2024"), Category::Bbd);
        assert_eq!(categorize("Christmas wreath"), Category::Seasonal);
        assert_eq!(categorize("peony sold out"), Category::NotAvailable);
        assert_eq!(categorize("butterfly bush"), Category::Synonym);
        assert_eq!(categorize("moab"), Category::Unknown);
    }

    #[test]
    fn test_first_keyword_group_wins() {
        // assortment outranks seasonal
        assert_eq!(categorize("mixed easter bunch"), Category::MissingAssortment);
        // seasonal outranks synonym
        assert_eq!(categorize("winter greenery"), Category::Seasonal);
    }

    #[test]
    fn test_default_is_typo() {
        assert_eq!(categorize("hydrangea"), Category::Typo);
        assert_eq!(categorize(""), Category::Typo);
    }
}
