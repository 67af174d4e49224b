use super::categorize::categorize_issues;
use super::detect::detect_issues;
use crate::model::{Category, Flower, Issue};

/// Recommend an action for a term.
pub fn suggested_fix(term: &str) -> String {
    let issues = detect_issues(term);
    let category = categorize_issues(term, &issues);
    advise(&issues, category)
}

/// Issue-specific advice first; category advice when no issue message applies.
pub(crate) fn advise(issues: &[Issue], category: Category) -> String {
    if let Some(message) = issue_advice(issues) {
        return message;
    }

    match category {
        Category::Synonym => "Create synonym mapping or redirect".to_string(),
        Category::Unknown => "Investigate term - may need removal".to_string(),
        _ => "Review and correct as needed".to_string(),
    }
}

fn issue_advice(issues: &[Issue]) -> Option<String> {
    if issues.iter().any(Issue::mentions_quotes) {
        return Some("Remove quotes or properly close them".to_string());
    }
    if issues.iter().any(Issue::mentions_parentheses) {
        return Some("Add missing closing parenthesis".to_string());
    }
    if issues.iter().any(Issue::mentions_spaces) {
        return Some("Trim whitespace and normalize spacing".to_string());
    }

    let misspelled: Vec<Flower> = issues.iter().filter_map(Issue::misspelled).collect();
    for flower in [Flower::Ranunculus, Flower::Hydrangea, Flower::Lisianthus] {
        if misspelled.contains(&flower) {
            return Some(format!(
                "Correct spelling to \"{}\"",
                flower.name().to_lowercase()
            ));
        }
    }
    if !misspelled.is_empty() {
        return Some("Fix spelling error".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_take_precedence() {
        assert_eq!(
            suggested_fix("\"lillies  bunch"),
            "Remove quotes or properly close them"
        );
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(suggested_fix("roses (red"), "Add missing closing parenthesis");
    }

    #[test]
    fn test_spacing() {
        assert_eq!(
            suggested_fix("red  roses"),
            "Trim whitespace and normalize spacing"
        );
    }

    #[test]
    fn test_dedicated_spelling_messages() {
        assert_eq!(
            suggested_fix("ranunulus"),
            "Correct spelling to \"ranunculus\""
        );
        assert_eq!(
            suggested_fix("hydrageas"),
            "Correct spelling to \"hydrangea\""
        );
        assert_eq!(
            suggested_fix("lisianhus"),
            "Correct spelling to \"lisianthus\""
        );
    }

    #[test]
    fn test_generic_spelling_message() {
        assert_eq!(suggested_fix("lavendar"), "Fix spelling error");
    }

    #[test]
    fn test_bracket_only_falls_back_to_category_message() {
        assert_eq!(suggested_fix("roses [red"), "Review and correct as needed");
    }

    #[test]
    fn test_category_messages() {
        assert_eq!(
            suggested_fix("tropicals"),
            "Create synonym mapping or redirect"
        );
        assert_eq!(
            suggested_fix("kiera"),
            "Investigate term - may need removal"
        );
        assert_eq!(suggested_fix("hydrangea"), "Review and correct as needed");
    }
}
