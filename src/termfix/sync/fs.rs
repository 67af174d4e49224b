use super::document::RemoteDocument;
use super::{RemoteStore, Snapshot};
use crate::dataset::DatasetKey;
use crate::error::{Result, TriageError};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::debug;

/// File-backed document store: one JSON document per dataset key.
///
/// Subscribers are notified of saves made through this handle; changes written
/// by other processes are picked up on the next load.
pub struct FileRemote {
    root: PathBuf,
    subscribers: HashMap<DatasetKey, Vec<Sender<Snapshot>>>,
}

impl FileRemote {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            subscribers: HashMap::new(),
        }
    }

    pub fn document_path(&self, key: &DatasetKey) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| {
                TriageError::Remote(format!("cannot create {}: {}", self.root.display(), e))
            })?;
        }
        Ok(())
    }
}

impl RemoteStore for FileRemote {
    fn load_snapshot(&self, key: &DatasetKey) -> Result<Option<Snapshot>> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| TriageError::Remote(format!("cannot read {}: {}", path.display(), e)))?;
        let value: Value = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "loaded snapshot document");
        Ok(Some(RemoteDocument::from_value(&value).into_snapshot()))
    }

    fn save_snapshot(&mut self, key: &DatasetKey, snapshot: &Snapshot) -> Result<()> {
        self.ensure_dir()?;
        let path = self.document_path(key);
        let document = RemoteDocument::from_snapshot(key, snapshot);
        let content = serde_json::to_string_pretty(&document)?;
        fs::write(&path, content)
            .map_err(|e| TriageError::Remote(format!("cannot write {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "saved snapshot document");

        if let Some(senders) = self.subscribers.get_mut(key) {
            senders.retain(|tx| tx.send(snapshot.clone()).is_ok());
        }
        Ok(())
    }

    fn subscribe(&mut self, key: &DatasetKey) -> Result<Receiver<Snapshot>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.entry(key.clone()).or_default().push(tx);
        Ok(rx)
    }
}
