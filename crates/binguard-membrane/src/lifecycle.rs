//! Guard lifecycle logging.
//!
//! Two layers, selected by [`crate::config::trace_level`]:
//! - [`GuardStats`]: relaxed atomic counters, maintained unless tracing is off.
//! - [`GuardLogRecord`]: structured per-event records kept in a bounded
//!   in-process ring when tracing is `full`. Hosts drain them with
//!   [`drain_lifecycle_logs`] or render JSONL with [`lifecycle_logs_jsonl`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::trace_level;

/// Maximum number of retained lifecycle records; the oldest are evicted first.
pub const LOG_CAPACITY: usize = 4096;

/// Lifecycle record severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Error,
}

/// Structured guard lifecycle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardLogRecord {
    /// Monotonic event id.
    pub decision_id: u64,
    /// Correlation id (`membrane::deleter::<variant>::<id>`).
    pub trace_id: String,
    pub level: LogLevel,
    /// Release variant (`object`, `array`, `malloc`).
    pub variant: &'static str,
    /// Event kind (`guard_created`, `slot_adopted`, `capacity_rejected`, `guard_released`).
    pub event: &'static str,
    /// Slot index involved in the event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
    /// Machine-readable outcome label.
    pub outcome: &'static str,
    /// Free-form `key=value;...` details.
    pub details: String,
}

impl GuardLogRecord {
    /// Renders the record as one JSON line (no trailing newline).
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

static LIFECYCLE_LOG: Mutex<VecDeque<GuardLogRecord>> =
    parking_lot::const_mutex(VecDeque::new());

static NEXT_DECISION_ID: AtomicU64 = AtomicU64::new(1);

fn record_event(
    level: LogLevel,
    variant: &'static str,
    event: &'static str,
    slot: Option<usize>,
    outcome: &'static str,
    details: impl Into<String>,
) {
    let decision_id = NEXT_DECISION_ID.fetch_add(1, Ordering::Relaxed);
    let record = GuardLogRecord {
        decision_id,
        trace_id: format!("membrane::deleter::{variant}::{decision_id:016x}"),
        level,
        variant,
        event,
        slot,
        outcome,
        details: details.into(),
    };
    let mut log = LIFECYCLE_LOG.lock();
    if log.len() == LOG_CAPACITY {
        log.pop_front();
    }
    log.push_back(record);
}

/// Removes and returns every retained record, oldest first.
pub fn drain_lifecycle_logs() -> Vec<GuardLogRecord> {
    LIFECYCLE_LOG.lock().drain(..).collect()
}

/// Renders the retained records as JSONL without draining them.
pub fn lifecycle_logs_jsonl() -> String {
    let log = LIFECYCLE_LOG.lock();
    let mut out = String::new();
    for record in log.iter() {
        if let Ok(line) = record.to_json_line() {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Guard lifecycle counters.
pub struct GuardStats {
    pub guards_created: AtomicU64,
    pub guards_dropped: AtomicU64,
    pub slots_released: AtomicU64,
    pub null_slots_skipped: AtomicU64,
    pub adoptions: AtomicU64,
    pub capacity_rejections: AtomicU64,
}

/// Point-in-time copy of [`GuardStats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuardStatsSnapshot {
    pub guards_created: u64,
    pub guards_dropped: u64,
    pub slots_released: u64,
    pub null_slots_skipped: u64,
    pub adoptions: u64,
    pub capacity_rejections: u64,
}

impl GuardStats {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            guards_created: AtomicU64::new(0),
            guards_dropped: AtomicU64::new(0),
            slots_released: AtomicU64::new(0),
            null_slots_skipped: AtomicU64::new(0),
            adoptions: AtomicU64::new(0),
            capacity_rejections: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GuardStatsSnapshot {
        GuardStatsSnapshot {
            guards_created: self.guards_created.load(Ordering::Relaxed),
            guards_dropped: self.guards_dropped.load(Ordering::Relaxed),
            slots_released: self.slots_released.load(Ordering::Relaxed),
            null_slots_skipped: self.null_slots_skipped.load(Ordering::Relaxed),
            adoptions: self.adoptions.load(Ordering::Relaxed),
            capacity_rejections: self.capacity_rejections.load(Ordering::Relaxed),
        }
    }
}

impl Default for GuardStats {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_GUARD_STATS: GuardStats = GuardStats::new();

/// Process-wide guard counters.
#[must_use]
pub fn global_guard_stats() -> &'static GuardStats {
    &GLOBAL_GUARD_STATS
}

#[inline]
fn bump(counter: &AtomicU64, by: u64) {
    if by != 0 {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}

pub(crate) fn on_guard_created(variant: &'static str, count: usize, capacity: usize) {
    let level = trace_level();
    if level.records_counters() {
        bump(&GLOBAL_GUARD_STATS.guards_created, 1);
    }
    if level.records_events() {
        record_event(
            LogLevel::Trace,
            variant,
            "guard_created",
            None,
            "armed",
            format!("count={count};capacity={capacity}"),
        );
    }
}

pub(crate) fn on_slot_adopted(variant: &'static str, slot: usize) {
    let level = trace_level();
    if level.records_counters() {
        bump(&GLOBAL_GUARD_STATS.adoptions, 1);
    }
    if level.records_events() {
        record_event(
            LogLevel::Trace,
            variant,
            "slot_adopted",
            Some(slot),
            "owned",
            format!("count={}", slot + 1),
        );
    }
}

pub(crate) fn on_capacity_rejected(variant: &'static str, count: usize, capacity: usize) {
    let level = trace_level();
    if level.records_counters() {
        bump(&GLOBAL_GUARD_STATS.capacity_rejections, 1);
    }
    if level.records_events() {
        record_event(
            LogLevel::Error,
            variant,
            "capacity_rejected",
            None,
            "rejected",
            format!("count={count};capacity={capacity}"),
        );
    }
}

pub(crate) fn on_guard_released(
    variant: &'static str,
    count: usize,
    released: usize,
    skipped: usize,
) {
    let level = trace_level();
    if level.records_counters() {
        bump(&GLOBAL_GUARD_STATS.guards_dropped, 1);
        bump(&GLOBAL_GUARD_STATS.slots_released, released as u64);
        bump(&GLOBAL_GUARD_STATS.null_slots_skipped, skipped as u64);
    }
    if level.records_events() {
        record_event(
            LogLevel::Debug,
            variant,
            "guard_released",
            None,
            if released == 0 { "noop" } else { "released" },
            format!("count={count};released={released};skipped={skipped}"),
        );
    }
}
