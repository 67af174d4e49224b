use crate::error::TriageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable 1-based position of a term in the input file.
pub type RecordId = u32;

/// Closed set of defect categories a term can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Formatting,
    Incomplete,
    Typo,
    Spacing,
    Synonym,
    Unknown,
    MissingAssortment,
    Bbd,
    Seasonal,
    NotAvailable,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Formatting,
        Category::Incomplete,
        Category::Typo,
        Category::Spacing,
        Category::Synonym,
        Category::Unknown,
        Category::MissingAssortment,
        Category::Bbd,
        Category::Seasonal,
        Category::NotAvailable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Formatting => "formatting",
            Category::Incomplete => "incomplete",
            Category::Typo => "typo",
            Category::Spacing => "spacing",
            Category::Synonym => "synonym",
            Category::Unknown => "unknown",
            Category::MissingAssortment => "missing-assortment",
            Category::Bbd => "bbd",
            Category::Seasonal => "seasonal",
            Category::NotAvailable => "not-available",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| TriageError::InvalidCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(TriageError::Api(format!("Unknown priority: {}", s))),
        }
    }
}

/// Flower names with a known misspelling shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flower {
    Ranunculus,
    Hydrangea,
    Lisianthus,
    Delphinium,
    Eucalyptus,
    Alstroemeria,
    Lavender,
    Lilies,
}

impl Flower {
    pub fn name(&self) -> &'static str {
        match self {
            Flower::Ranunculus => "Ranunculus",
            Flower::Hydrangea => "Hydrangea",
            Flower::Lisianthus => "Lisianthus",
            Flower::Delphinium => "Delphinium",
            Flower::Eucalyptus => "Eucalyptus",
            Flower::Alstroemeria => "Alstroemeria",
            Flower::Lavender => "Lavender",
            Flower::Lilies => "Lilies",
        }
    }
}

/// A single defect found in a raw term.
///
/// `Display` renders the exact tag text shown to operators and written to exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issue {
    UnmatchedQuotes,
    UnclosedParentheses,
    UnclosedBrackets,
    IncompleteQuotes,
    LeadingTrailingSpaces,
    MultipleSpaces,
    Misspelling(Flower),
}

impl Issue {
    pub fn mentions_quotes(&self) -> bool {
        matches!(self, Issue::UnmatchedQuotes | Issue::IncompleteQuotes)
    }

    pub fn mentions_parentheses(&self) -> bool {
        matches!(self, Issue::UnclosedParentheses)
    }

    pub fn mentions_brackets(&self) -> bool {
        matches!(self, Issue::UnclosedBrackets)
    }

    pub fn mentions_spaces(&self) -> bool {
        matches!(self, Issue::LeadingTrailingSpaces | Issue::MultipleSpaces)
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, Issue::IncompleteQuotes)
    }

    pub fn misspelled(&self) -> Option<Flower> {
        match self {
            Issue::Misspelling(flower) => Some(*flower),
            _ => None,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::UnmatchedQuotes => f.write_str("Unmatched quotes"),
            Issue::UnclosedParentheses => f.write_str("Unclosed parentheses"),
            Issue::UnclosedBrackets => f.write_str("Unclosed brackets"),
            Issue::IncompleteQuotes => f.write_str("Incomplete quotes"),
            Issue::LeadingTrailingSpaces => f.write_str("Leading/trailing spaces"),
            Issue::MultipleSpaces => f.write_str("Multiple consecutive spaces"),
            Issue::Misspelling(flower) => write!(f, "{} misspelling", flower.name()),
        }
    }
}

impl Serialize for Issue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Computed classification of one input term. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermRecord {
    pub id: RecordId,
    pub raw_term: String,
    pub occurrence_count: u64,
    pub issues: Vec<Issue>,
    pub base_category: Category,
    pub suggested_fix: String,
    pub base_proposed_term: String,
    pub priority: Priority,
}
