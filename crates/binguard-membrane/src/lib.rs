//! # binguard-membrane
//!
//! The part of binguard that touches raw memory: scoped deleters for
//! partially-acquired resources, pointer reinterpretation, and atomic views.
//!
//! Every `unsafe` block here carries a `// SAFETY:` note. Guard activity is
//! counted and optionally logged per [`config::trace_level`].

pub mod atomic;
pub mod config;
pub mod deleter;
pub mod lifecycle;
pub mod ptr;

pub use atomic::{AtomicView, atomic_exchange, atomic_exchange_with, atomic_ptr_cast};
pub use config::{TraceLevel, set_trace_level, trace_level};
pub use deleter::{
    ArrayDeleter, ArrayRelease, MallocDeleter, MallocRelease, ObjectDeleter, ObjectRelease,
    Release, ScopedDeleter, null_slots,
};
pub use lifecycle::{
    GuardLogRecord, GuardStats, GuardStatsSnapshot, drain_lifecycle_logs, global_guard_stats,
    lifecycle_logs_jsonl,
};
pub use ptr::{
    PtrStaticCast, checked_ptr_cast, ptr_compatible_cast, ptr_static_cast, ptr_static_cast_mut,
};
