//! # Input Dataset
//!
//! The input is a JSON array of `{ "term": ..., "count": ... }` objects, as exported
//! by the search analytics job. Array order defines the stable record ids.
//!
//! Overrides are persisted per dataset, so every input file gets a [`DatasetKey`]
//! derived from its first records. Two different exports do not share overrides,
//! while re-loading the same export finds its previous edits.

use crate::error::{Result, TriageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// How many leading records feed the dataset key.
const KEY_SAMPLE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTerm {
    pub term: String,
    pub count: u64,
}

impl InputTerm {
    pub fn new(term: impl Into<String>, count: u64) -> Self {
        Self {
            term: term.into(),
            count,
        }
    }
}

/// Read and parse an input file. Any failure is fatal for the session.
pub fn load_input<P: AsRef<Path>>(path: P) -> Result<Vec<InputTerm>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| TriageError::Load(format!("{}: {}", path.display(), e)))?;
    parse_input(&content).map_err(|e| match e {
        TriageError::Load(msg) => TriageError::Load(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

pub fn parse_input(content: &str) -> Result<Vec<InputTerm>> {
    serde_json::from_str(content).map_err(|e| TriageError::Load(e.to_string()))
}

/// Identifier scoping persisted overrides to one input dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetKey(String);

impl DatasetKey {
    /// Hash the compact JSON of the first ten records into `dataset_<n>`.
    ///
    /// Records are hashed in their typed `{"term", "count"}` form, so extra fields
    /// and key order in the input file do not affect the key.
    pub fn derive(inputs: &[InputTerm]) -> Result<Self> {
        let sample = &inputs[..inputs.len().min(KEY_SAMPLE)];
        let json = serde_json::to_string(sample)?;
        Ok(Self(format!("dataset_{}", rolling_hash(&json).unsigned_abs())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DatasetKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `hash * 31 + unit` over UTF-16 code units, wrapping at 32 bits.
fn rolling_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: usize) -> Vec<InputTerm> {
        (0..n)
            .map(|i| InputTerm::new(format!("term {}", i), i as u64))
            .collect()
    }

    #[test]
    fn test_parse_input() {
        let inputs = parse_input(r#"[{"term": "\"rose", "count": 12}, {"term": "tulip", "count": 0}]"#)
            .unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0], InputTerm::new("\"rose", 12));
    }

    #[test]
    fn test_parse_input_rejects_garbage() {
        let err = parse_input("not json").unwrap_err();
        assert!(matches!(err, TriageError::Load(_)));
    }

    #[test]
    fn test_parse_input_rejects_negative_counts() {
        assert!(parse_input(r#"[{"term": "rose", "count": -1}]"#).is_err());
    }

    #[test]
    fn test_load_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_input(dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_rolling_hash_matches_reference_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(rolling_hash("ab"), 97 * 31 + 98);
        // Long inputs wrap instead of overflowing.
        let _ = rolling_hash(&"z".repeat(10_000));
    }

    #[test]
    fn test_key_format() {
        let key = DatasetKey::derive(&sample(3)).unwrap();
        assert!(key.as_str().starts_with("dataset_"));
        assert!(key.as_str()["dataset_".len()..].parse::<u64>().is_ok());
    }

    #[test]
    fn test_key_is_stable() {
        assert_eq!(
            DatasetKey::derive(&sample(12)).unwrap(),
            DatasetKey::derive(&sample(12)).unwrap()
        );
    }

    #[test]
    fn test_key_only_looks_at_first_ten() {
        let mut longer = sample(12);
        let base = DatasetKey::derive(&longer).unwrap();
        longer[11].term = "changed".to_string();
        assert_eq!(DatasetKey::derive(&longer).unwrap(), base);
    }

    #[test]
    fn test_key_changes_with_leading_records() {
        let mut inputs = sample(12);
        let base = DatasetKey::derive(&inputs).unwrap();
        inputs[3].count += 1;
        assert_ne!(DatasetKey::derive(&inputs).unwrap(), base);
    }

    #[test]
    fn test_key_ignores_extra_fields_and_key_order() {
        let plain = parse_input(r#"[{"term": "rose", "count": 2}]"#).unwrap();
        let decorated =
            parse_input(r#"[{"count": 2, "locale": "en-GB", "term": "rose"}]"#).unwrap();
        assert_eq!(
            DatasetKey::derive(&plain).unwrap(),
            DatasetKey::derive(&decorated).unwrap()
        );
        // typed form is {"term":"rose","count":2}
        assert_eq!(
            DatasetKey::derive(&plain).unwrap().as_str(),
            format!("dataset_{}", rolling_hash(r#"[{"term":"rose","count":2}]"#).unsigned_abs())
        );
    }

    #[test]
    fn test_key_of_empty_dataset() {
        // "[]" = 91 * 31 + 93
        assert_eq!(DatasetKey::derive(&[]).unwrap().as_str(), "dataset_2914");
    }
}
