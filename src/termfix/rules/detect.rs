use crate::model::{Flower, Issue};
use once_cell::sync::Lazy;
use regex::Regex;

static WRAPPED_IN_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^".*"$"#).unwrap());

/// Misspelling shapes, checked in this order. Each one matches a prefix of the
/// flower name followed by a character that breaks the correct spelling.
static MISSPELLINGS: Lazy<Vec<(Regex, Flower)>> = Lazy::new(|| {
    [
        (r"(?i)ranun[^c]", Flower::Ranunculus),
        (r"(?i)hydra[^n]", Flower::Hydrangea),
        (r"(?i)lisian[^t]", Flower::Lisianthus),
        (r"(?i)delphi?[^n]", Flower::Delphinium),
        (r"(?i)eucal[^y]", Flower::Eucalyptus),
        (r"(?i)alstro[^e]", Flower::Alstroemeria),
        (r"(?i)lavendar", Flower::Lavender),
        (r"(?i)lillies", Flower::Lilies),
    ]
    .into_iter()
    .map(|(pattern, flower)| (Regex::new(pattern).unwrap(), flower))
    .collect()
});

/// Inspect a raw term and list every defect it shows.
///
/// All rules are evaluated; none short-circuits another. The result follows
/// rule-declaration order, not severity.
pub fn detect_issues(term: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    // Enclosure balance
    if term.contains('"') && !WRAPPED_IN_QUOTES.is_match(term) {
        issues.push(Issue::UnmatchedQuotes);
    }
    if term.contains('(') && !term.contains(')') {
        issues.push(Issue::UnclosedParentheses);
    }
    if term.contains('[') && !term.contains(']') {
        issues.push(Issue::UnclosedBrackets);
    }
    if term.starts_with('"') && !term.ends_with('"') {
        issues.push(Issue::IncompleteQuotes);
    }

    // Spacing
    if term.starts_with(' ') || term.ends_with(' ') {
        issues.push(Issue::LeadingTrailingSpaces);
    }
    if term.contains("  ") {
        issues.push(Issue::MultipleSpaces);
    }

    for (pattern, flower) in MISSPELLINGS.iter() {
        if pattern.is_match(term) {
            issues.push(Issue::Misspelling(*flower));
        }
    }

    issues
}
