use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Misspelling shapes and their canonical spelling, applied in this order.
/// Each shape swallows the character that broke the spelling.
static CORRECTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)ranun[^c]", "ranunculus"),
        (r"(?i)hydra[^n]", "hydrangea"),
        (r"(?i)lisian[^t]", "lisianthus"),
        (r"(?i)lavendar", "lavender"),
        (r"(?i)lillies", "lilies"),
        (r"(?i)alstro[^e]", "alstroemeria"),
    ]
    .into_iter()
    .map(|(pattern, canonical)| (Regex::new(pattern).unwrap(), canonical))
    .collect()
});

const MAX_PASSES: usize = 8;

/// Produce the cleaned replacement for a raw term.
///
/// Outer quotes and whitespace are stripped together, so `" "rose` loses both
/// quotes at once. The pipeline is then repeated until the output stops changing,
/// which keeps `normalize(normalize(s)) == normalize(s)` even when a correction
/// leaves text another rule would still rewrite.
pub fn normalize(term: &str) -> String {
    let mut current = clean_once(term);
    for _ in 1..MAX_PASSES {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn clean_once(term: &str) -> String {
    let unquoted = term.trim_matches(|c: char| c == '"' || c.is_whitespace());
    let mut cleaned = WHITESPACE_RUN.replace_all(unquoted, " ").into_owned();

    for (pattern, canonical) in CORRECTIONS.iter() {
        cleaned = pattern.replace_all(&cleaned, *canonical).into_owned();
    }

    cleaned.trim().to_string()
}
