//! Wire shape of a stored snapshot.
//!
//! Documents may come from older clients or be edited by hand, so decoding is
//! forgiving: every field is read on its own and falls back to its default when
//! missing or malformed. One bad field never discards the rest.

use super::Snapshot;
use crate::dataset::DatasetKey;
use crate::model::{Category, RecordId};
use crate::overrides::CategorySet;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    pub completed_terms: Vec<RecordId>,
    pub edited_terms: BTreeMap<RecordId, String>,
    pub edited_categories: BTreeMap<RecordId, Vec<String>>,
    pub last_updated: Option<String>,
    pub dataset_id: Option<String>,
}

impl RemoteDocument {
    pub fn from_snapshot(key: &DatasetKey, snapshot: &Snapshot) -> Self {
        Self {
            completed_terms: snapshot.completed_ids.iter().copied().collect(),
            edited_terms: snapshot.edited_terms.clone(),
            edited_categories: snapshot
                .edited_categories
                .iter()
                .map(|(id, set)| {
                    let tags = set.as_slice().iter().map(|c| c.to_string()).collect();
                    (*id, tags)
                })
                .collect(),
            last_updated: snapshot
                .last_updated
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            dataset_id: Some(key.to_string()),
        }
    }

    /// Decode field by field from untyped JSON.
    pub fn from_value(value: &Value) -> Self {
        Self {
            completed_terms: field(value, "completedTerms"),
            edited_terms: field(value, "editedTerms"),
            edited_categories: field(value, "editedCategories"),
            last_updated: field(value, "lastUpdated"),
            dataset_id: field(value, "datasetId"),
        }
    }

    pub fn into_snapshot(self) -> Snapshot {
        let last_updated = self.last_updated.as_deref().and_then(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| warn!(value = raw, error = %e, "ignoring unparsable lastUpdated"))
                .ok()
        });

        let edited_categories = self
            .edited_categories
            .into_iter()
            .map(|(id, tags)| {
                let parsed = tags.iter().filter_map(|tag| {
                    tag.parse::<Category>()
                        .map_err(|_| warn!(record = id, tag = %tag, "dropping unknown category"))
                        .ok()
                });
                (id, CategorySet::from_tags(parsed))
            })
            .collect();

        Snapshot {
            completed_ids: self.completed_terms.into_iter().collect(),
            edited_terms: self.edited_terms,
            edited_categories,
            last_updated,
        }
    }
}

fn field<T: DeserializeOwned + Default>(value: &Value, name: &str) -> T {
    match value.get(name) {
        None | Some(Value::Null) => T::default(),
        Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
            warn!(field = name, error = %e, "malformed snapshot field, using default");
            T::default()
        }),
    }
}
