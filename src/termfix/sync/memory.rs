use super::{RemoteStore, Snapshot};
use crate::dataset::DatasetKey;
use crate::error::{Result, TriageError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

/// In-memory remote for testing and development. Does NOT persist data.
///
/// Clones share one backing store, so two sessions holding clones behave like two
/// browser tabs on the same document: a save through one is pushed to the
/// subscribers of both.
#[derive(Clone, Default)]
pub struct InMemoryRemote {
    shared: Rc<RefCell<Shared>>,
}

#[derive(Default)]
struct Shared {
    snapshots: HashMap<DatasetKey, Snapshot>,
    subscribers: HashMap<DatasetKey, Vec<Sender<Snapshot>>>,
    unavailable: bool,
    saves: usize,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail, as if the store were unreachable.
    pub fn set_available(&self, available: bool) {
        self.shared.borrow_mut().unavailable = !available;
    }

    /// Number of successful saves across all clones.
    pub fn save_count(&self) -> usize {
        self.shared.borrow().saves
    }

    pub fn stored(&self, key: &DatasetKey) -> Option<Snapshot> {
        self.shared.borrow().snapshots.get(key).cloned()
    }

    fn check_available(&self) -> Result<()> {
        if self.shared.borrow().unavailable {
            return Err(TriageError::Remote("store unavailable".to_string()));
        }
        Ok(())
    }
}

impl RemoteStore for InMemoryRemote {
    fn load_snapshot(&self, key: &DatasetKey) -> Result<Option<Snapshot>> {
        self.check_available()?;
        Ok(self.stored(key))
    }

    fn save_snapshot(&mut self, key: &DatasetKey, snapshot: &Snapshot) -> Result<()> {
        self.check_available()?;
        let mut shared = self.shared.borrow_mut();
        shared.snapshots.insert(key.clone(), snapshot.clone());
        shared.saves += 1;
        if let Some(senders) = shared.subscribers.get_mut(key) {
            senders.retain(|tx| tx.send(snapshot.clone()).is_ok());
        }
        Ok(())
    }

    fn subscribe(&mut self, key: &DatasetKey) -> Result<Receiver<Snapshot>> {
        self.check_available()?;
        let (tx, rx) = mpsc::channel();
        self.shared
            .borrow_mut()
            .subscribers
            .entry(key.clone())
            .or_default()
            .push(tx);
        Ok(rx)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use chrono::{DateTime, Utc};

    pub struct RemoteFixture {
        pub remote: InMemoryRemote,
        pub key: DatasetKey,
    }

    impl RemoteFixture {
        pub fn new(key: &str) -> Self {
            Self {
                remote: InMemoryRemote::new(),
                key: DatasetKey::from(key),
            }
        }

        pub fn with_completed(mut self, ids: &[u32], at: DateTime<Utc>) -> Self {
            let mut snapshot = self.remote.stored(&self.key).unwrap_or_default();
            snapshot.completed_ids.extend(ids.iter().copied());
            snapshot.last_updated = Some(at);
            self.remote.save_snapshot(&self.key, &snapshot).unwrap();
            self
        }

        pub fn with_edited_term(mut self, id: u32, term: &str, at: DateTime<Utc>) -> Self {
            let mut snapshot = self.remote.stored(&self.key).unwrap_or_default();
            snapshot.edited_terms.insert(id, term.to_string());
            snapshot.last_updated = Some(at);
            self.remote.save_snapshot(&self.key, &snapshot).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::RemoteFixture;
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_load_missing_dataset() {
        let remote = InMemoryRemote::new();
        assert_eq!(remote.load_snapshot(&DatasetKey::from("dataset_1")).unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let fixture = RemoteFixture::new("dataset_1").with_completed(&[1, 2], Utc::now());
        let loaded = fixture.remote.load_snapshot(&fixture.key).unwrap().unwrap();
        assert_eq!(loaded.completed_ids.len(), 2);
        assert_eq!(fixture.remote.save_count(), 1);
    }

    #[test]
    fn test_datasets_are_isolated() {
        let fixture = RemoteFixture::new("dataset_1").with_edited_term(1, "rose", Utc::now());
        assert_eq!(
            fixture
                .remote
                .load_snapshot(&DatasetKey::from("dataset_2"))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_subscribers_on_every_clone_are_notified() {
        let key = DatasetKey::from("dataset_1");
        let mut tab_a = InMemoryRemote::new();
        let mut tab_b = tab_a.clone();
        let rx_a = tab_a.subscribe(&key).unwrap();
        let rx_b = tab_b.subscribe(&key).unwrap();

        let mut snapshot = Snapshot::default();
        snapshot.completed_ids.insert(5);
        tab_a.save_snapshot(&key, &snapshot).unwrap();

        assert_eq!(rx_a.try_recv().unwrap(), snapshot);
        assert_eq!(rx_b.try_recv().unwrap(), snapshot);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let key = DatasetKey::from("dataset_1");
        let mut remote = InMemoryRemote::new();
        drop(remote.subscribe(&key).unwrap());
        remote.save_snapshot(&key, &Snapshot::default()).unwrap();
        assert!(remote.shared.borrow().subscribers[&key].is_empty());
    }

    #[test]
    fn test_unavailable_store_fails_every_call() {
        let key = DatasetKey::from("dataset_1");
        let mut remote = InMemoryRemote::new();
        remote.set_available(false);
        assert!(remote.load_snapshot(&key).is_err());
        assert!(remote.save_snapshot(&key, &Snapshot::default()).is_err());
        assert!(remote.subscribe(&key).is_err());

        remote.set_available(true);
        assert!(remote.save_snapshot(&key, &Snapshot::default()).is_ok());
    }
}
