//! Lifecycle trace configuration.
//!
//! The trace level is process-wide and set by the host with
//! [`set_trace_level`]:
//! - `Counters` (default): guard lifecycle counters are maintained; no
//!   per-event records are kept.
//! - `Full`: counters plus a structured record for every guard creation,
//!   adoption, capacity rejection and release pass.
//! - `Off`: nothing is recorded. Guards still release what they own.

use std::sync::atomic::{AtomicU8, Ordering};

/// How much guard lifecycle information the membrane records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TraceLevel {
    /// No counters, no records.
    Off = 0,
    /// Relaxed atomic counters only.
    #[default]
    Counters = 1,
    /// Counters and structured lifecycle records.
    Full = 2,
}

impl TraceLevel {
    #[must_use]
    pub const fn records_counters(self) -> bool {
        !matches!(self, Self::Off)
    }

    #[must_use]
    pub const fn records_events(self) -> bool {
        matches!(self, Self::Full)
    }

    const fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Off,
            2 => Self::Full,
            _ => Self::Counters,
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(TraceLevel::Counters as u8);

/// Current trace level.
#[inline]
#[must_use]
pub fn trace_level() -> TraceLevel {
    TraceLevel::from_u8(LEVEL.load(Ordering::Relaxed))
}

/// Sets the trace level for the rest of the process (or until the next call).
pub fn set_trace_level(level: TraceLevel) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}
