//! Precondition failures reported by the `try_*` entry points.
//!
//! The panicking counterparts treat the same conditions as fatal programmer
//! errors; these variants exist for hosts that validate untrusted layout data
//! before committing to an alignment or a guard capacity.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    #[error("alignment {alignment} is not a power of two")]
    AlignmentNotPowerOfTwo { alignment: u64 },
    #[error("aligning {value} up to {alignment} overflows")]
    AlignmentOverflow { value: u64, alignment: u64 },
    #[error("active count {count} exceeds slot capacity {capacity}")]
    CountExceedsCapacity { count: usize, capacity: usize },
}

pub type PrimitiveResult<T> = Result<T, PrimitiveError>;
