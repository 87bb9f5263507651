//! # binguard-core
//!
//! Representation primitives for programs that read and write fixed-layout
//! binary structures (executable headers, archive tables, packer stubs).
//!
//! Everything in this crate is safe, stateless, and where the language allows
//! it, usable in constant evaluation. No `unsafe` code is permitted at the
//! crate level; the zero-bit clearing module opts in locally.

#![deny(unsafe_code)]

pub mod capability;
pub mod compile_time;
pub mod error;
pub mod numeric;
pub mod tribool;
#[allow(unsafe_code)]
pub mod zero;

pub use capability::{HeapAllocation, NonCopyable};
pub use error::{PrimitiveError, PrimitiveResult};
pub use numeric::{
    FixedInt, align_down, align_gap, align_up, bswap16, bswap32, bswap64, max, min, umax, umin,
    wrapping_add, wrapping_sub,
};
pub use tribool::{TriBool, TriState, TriStorage, Tribool};
pub use zero::{ZeroBits, mem_clear};
