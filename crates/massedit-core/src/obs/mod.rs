use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// EventState
///
/// Ephemeral, in-memory counters for engine operations. No timestamps, no
/// sinks; hosts that want durable telemetry snapshot and ship these
/// themselves.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventState {
    /// View synthesis invocations.
    pub synthesize_calls: u64,
    /// Update translation invocations.
    pub translate_calls: u64,
    /// Generic write directives emitted across all translations.
    pub directives_emitted: u64,
    /// Per-record map merges performed directly against the store.
    pub map_merges: u64,
    /// Batch writes handed to the host.
    pub batch_writes: u64,
    /// Records covered by those batch writes.
    pub records_written: u64,
}

thread_local! {
    static STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

pub(crate) fn record_synthesize() {
    STATE.with_borrow_mut(|s| s.synthesize_calls += 1);
}

pub(crate) fn record_translate() {
    STATE.with_borrow_mut(|s| s.translate_calls += 1);
}

pub(crate) fn record_directive() {
    STATE.with_borrow_mut(|s| s.directives_emitted += 1);
}

pub(crate) fn record_map_merge() {
    STATE.with_borrow_mut(|s| s.map_merges += 1);
}

pub(crate) fn record_batch_write(records: usize) {
    STATE.with_borrow_mut(|s| {
        s.batch_writes += 1;
        s.records_written += records as u64;
    });
}

/// Current counter values.
#[must_use]
pub fn snapshot() -> EventState {
    STATE.with_borrow(Clone::clone)
}

/// Reset all counters to zero.
pub fn reset() {
    STATE.with_borrow_mut(|s| *s = EventState::default());
}

///
/// TESTS
///
