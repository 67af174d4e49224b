use super::debounce::Debouncer;
use super::{reconcile, RemoteStore, Resolution, Snapshot, SyncStatus};
use crate::dataset::DatasetKey;
use crate::overrides::{OverrideChange, OverrideStore};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Keeps an [`OverrideStore`] in step with a [`RemoteStore`].
///
/// Never returns errors: every remote failure is logged and reflected in
/// [`status`](SyncAdapter::status) while the local store stays usable.
pub struct SyncAdapter<R: RemoteStore> {
    remote: R,
    key: DatasetKey,
    debouncer: Debouncer,
    incoming: Option<Receiver<Snapshot>>,
    /// Timestamp of the last snapshot applied or saved by this session.
    last_applied: Option<DateTime<Utc>>,
    last_synced: Option<DateTime<Utc>>,
    dirty: bool,
    status: SyncStatus,
}

impl<R: RemoteStore> SyncAdapter<R> {
    pub fn new(remote: R, key: DatasetKey, quiet: Duration) -> Self {
        Self {
            remote,
            key,
            debouncer: Debouncer::new(quiet),
            incoming: None,
            last_applied: None,
            last_synced: None,
            dirty: false,
            status: SyncStatus::Disconnected("not connected yet".to_string()),
        }
    }

    /// Subscribe to remote changes and pull the stored snapshot into `store`.
    pub fn connect(&mut self, store: &mut OverrideStore) -> Option<OverrideChange> {
        match self.remote.subscribe(&self.key) {
            Ok(rx) => self.incoming = Some(rx),
            Err(e) => {
                self.disconnect(format!("subscribe failed: {}", e));
                return None;
            }
        }

        match self.remote.load_snapshot(&self.key) {
            Ok(Some(snapshot)) => {
                self.mark_connected();
                info!(dataset = %self.key, "loaded remote overrides");
                self.last_applied = snapshot.last_updated;
                Some(store.replace_from_snapshot(&snapshot))
            }
            Ok(None) => {
                self.mark_connected();
                debug!(dataset = %self.key, "no remote overrides yet");
                None
            }
            Err(e) => {
                self.disconnect(format!("load failed: {}", e));
                None
            }
        }
    }

    pub fn key(&self) -> &DatasetKey {
        &self.key
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    pub fn has_pending_save(&self) -> bool {
        self.dirty
    }

    /// Note a local edit; the save happens once the quiet period has passed.
    pub fn schedule_save(&mut self, now: Instant) {
        self.dirty = true;
        self.debouncer.trigger(now);
    }

    /// Run the debounced save if its deadline has passed.
    pub fn tick(&mut self, store: &OverrideStore, now: Instant) -> bool {
        if self.debouncer.take_due(now) {
            self.save_now(store)
        } else {
            false
        }
    }

    /// Save immediately if anything is unsaved, including edits whose earlier
    /// save failed.
    pub fn flush(&mut self, store: &OverrideStore) -> bool {
        self.debouncer.cancel();
        if self.dirty {
            self.save_now(store)
        } else {
            false
        }
    }

    fn save_now(&mut self, store: &OverrideStore) -> bool {
        let stamp = next_stamp(self.last_applied);
        let snapshot = store.to_snapshot(stamp);
        match self.remote.save_snapshot(&self.key, &snapshot) {
            Ok(()) => {
                self.last_applied = Some(stamp);
                self.dirty = false;
                self.mark_connected();
                debug!(dataset = %self.key, "saved overrides");
                true
            }
            Err(e) => {
                // keep dirty so the next save retries
                self.disconnect(format!("save failed: {}", e));
                false
            }
        }
    }

    /// Apply every snapshot pushed since the last poll, newest-wins.
    pub fn poll_incoming(&mut self, store: &mut OverrideStore) -> Vec<OverrideChange> {
        let mut changes = Vec::new();
        let Some(rx) = &self.incoming else {
            return changes;
        };

        let mut pending = Vec::new();
        let mut closed = false;
        loop {
            match rx.try_recv() {
                Ok(snapshot) => pending.push(snapshot),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    closed = true;
                    break;
                }
            }
        }

        for snapshot in pending {
            changes.extend(self.apply_if_newer(store, &snapshot));
        }

        if closed {
            self.incoming = None;
            self.disconnect("subscription closed".to_string());
        }
        changes
    }

    /// Re-read the stored snapshot, which also catches saves made by other
    /// processes, and apply it when it is newer than the local state.
    ///
    /// A lost subscription is re-established first.
    pub fn refresh(&mut self, store: &mut OverrideStore) -> Vec<OverrideChange> {
        let mut changes = self.poll_incoming(store);

        if self.incoming.is_none() {
            match self.remote.subscribe(&self.key) {
                Ok(rx) => self.incoming = Some(rx),
                Err(e) => {
                    self.disconnect(format!("subscribe failed: {}", e));
                    return changes;
                }
            }
        }

        match self.remote.load_snapshot(&self.key) {
            Ok(Some(snapshot)) => {
                self.mark_connected();
                changes.extend(self.apply_if_newer(store, &snapshot));
            }
            Ok(None) => self.mark_connected(),
            Err(e) => self.disconnect(format!("load failed: {}", e)),
        }
        changes
    }

    fn apply_if_newer(
        &mut self,
        store: &mut OverrideStore,
        snapshot: &Snapshot,
    ) -> Option<OverrideChange> {
        let local = Snapshot {
            last_updated: self.last_applied,
            ..Default::default()
        };
        if reconcile(&local, snapshot) == Resolution::TakeIncoming {
            info!(dataset = %self.key, "applying newer remote overrides");
            self.last_applied = snapshot.last_updated;
            Some(store.replace_from_snapshot(snapshot))
        } else {
            None
        }
    }

    fn mark_connected(&mut self) {
        self.status = SyncStatus::Connected;
        self.last_synced = Some(Utc::now());
    }

    fn disconnect(&mut self, reason: String) {
        warn!(dataset = %self.key, %reason, "remote store unavailable, working locally");
        self.status = SyncStatus::Disconnected(reason);
    }
}

/// Strictly later than anything this session has applied, so our own saves
/// always win against the snapshot they replace.
fn next_stamp(last_applied: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match last_applied {
        Some(last) if now <= last => last + ChronoDuration::milliseconds(1),
        _ => now,
    }
}
