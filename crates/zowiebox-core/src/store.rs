// ── Last-known device state ──
//
// One snapshot-swap slot per polled domain. A slot only ever changes on
// an *acceptable* poll result; failed polls leave the previous value in
// place (stale-but-present). Readers get immutable `Arc` snapshots, so
// the single-writer poller can swap values while feedback and variable
// evaluation iterate safely on another thread.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use zowiebox_api::record::{RecordingStatus, RecordingTask};
use zowiebox_api::streamplay::NdiSource;
use zowiebox_api::video::{InputSignal, OutputInfo};

use crate::model::{AudioProfile, DeviceClock, TallyState};

/// A single cached domain value with change notification.
///
/// Backed by a `watch` channel: writes swap an `Arc` snapshot and wake
/// subscribers; reads are a cheap `Arc` clone. Starts unpopulated.
pub struct StateSlot<T> {
    value: watch::Sender<Option<Arc<T>>>,
    version: watch::Sender<u64>,
}

impl<T> StateSlot<T> {
    pub(crate) fn new() -> Self {
        let (value, _) = watch::channel(None);
        let (version, _) = watch::channel(0u64);
        Self { value, version }
    }

    /// Current snapshot, or `None` if no poll has succeeded yet.
    pub fn get(&self) -> Option<Arc<T>> {
        self.value.borrow().clone()
    }

    /// Whether any poll has populated this slot.
    pub fn is_populated(&self) -> bool {
        self.value.borrow().is_some()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<T>>> {
        self.value.subscribe()
    }

    /// Mutation counter, bumped on every store.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Replace the slot wholesale. Poller-only.
    pub(crate) fn store(&self, value: T) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.value.send_modify(|slot| *slot = Some(Arc::new(value)));
        self.version.send_modify(|v| *v += 1);
    }
}

impl<T> Default for StateSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory mirror of the last-known device state.
///
/// Created empty at instance startup, written only by the poller, read
/// by the feedback and variable surfaces, dropped on instance teardown.
/// Nothing here persists across restarts.
pub struct StateCache {
    pub output_info: StateSlot<OutputInfo>,
    pub audio: StateSlot<AudioProfile>,
    pub clock: StateSlot<DeviceClock>,
    pub tally: StateSlot<TallyState>,
    pub recording_tasks: StateSlot<Vec<RecordingTask>>,
    pub input_signal: StateSlot<InputSignal>,
    pub ndi_sources: StateSlot<Vec<NdiSource>>,
    pub recording_status: StateSlot<RecordingStatus>,
    pub(crate) last_poll: watch::Sender<Option<DateTime<Utc>>>,
}

impl StateCache {
    pub fn new() -> Self {
        let (last_poll, _) = watch::channel(None);
        Self {
            output_info: StateSlot::new(),
            audio: StateSlot::new(),
            clock: StateSlot::new(),
            tally: StateSlot::new(),
            recording_tasks: StateSlot::new(),
            input_signal: StateSlot::new(),
            ndi_sources: StateSlot::new(),
            recording_status: StateSlot::new(),
            last_poll,
        }
    }

    /// When the most recent poll cycle completed, or `None` if none has.
    pub fn last_poll(&self) -> Option<DateTime<Utc>> {
        *self.last_poll.borrow()
    }

    /// How stale the cache is, or `None` if never polled.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_poll().map(|t| Utc::now() - t)
    }
}

impl Default for StateCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn slot_starts_unpopulated() {
        let slot: StateSlot<String> = StateSlot::new();
        assert!(!slot.is_populated());
        assert!(slot.get().is_none());
        assert_eq!(slot.version(), 0);
    }

    #[test]
    fn store_replaces_wholesale() {
        let slot: StateSlot<String> = StateSlot::new();
        slot.store("first".into());
        assert_eq!(*slot.get().unwrap(), "first");
        slot.store("second".into());
        assert_eq!(*slot.get().unwrap(), "second");
        assert_eq!(slot.version(), 2);
    }

    #[test]
    fn readers_keep_their_snapshot_across_writes() {
        let slot: StateSlot<Vec<u32>> = StateSlot::new();
        slot.store(vec![1, 2, 3]);
        let snapshot = slot.get().unwrap();
        slot.store(vec![9]);
        // The old snapshot is untouched; new readers see the new value.
        assert_eq!(*snapshot, vec![1, 2, 3]);
        assert_eq!(*slot.get().unwrap(), vec![9]);
    }

    #[tokio::test]
    async fn subscribers_wake_on_store() {
        let slot: StateSlot<u32> = StateSlot::new();
        let mut rx = slot.subscribe();
        slot.store(7);
        rx.changed().await.unwrap();
        assert_eq!(**rx.borrow().as_ref().unwrap(), 7);
    }
}
