//! Primitives working together on a fixed-layout header, the way a format
//! reader uses them: tri-valued flags embedded by value, bulk clearing,
//! alignment of file offsets, magic comparison and heap capability.

#![allow(unsafe_code)]

use binguard_core::compile_time::{mem_eq, string_eq, string_len, string_lt};
use binguard_core::numeric::{align_up_u64, try_align_up};
use binguard_core::zero::{ZeroBits, mem_clear};
use binguard_core::{
    HeapAllocation, NonCopyable, PrimitiveError, TriBool, TriState, Tribool, align_gap, bswap32,
    forbid_heap, permit_heap, wrapping_add,
};
use serde::{Deserialize, Serialize};

type Flag8 = TriBool<u8>;
type Flag16Lenient = TriBool<u16, true>;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PackHeader {
    magic: [u8; 4],
    version: u8,
    compressed: Flag8,
    filtered: Flag16Lenient,
    entry: u32,
    stripped: Tribool,
}

// SAFETY: every field accepts the all-zero pattern and none has drop glue.
unsafe impl ZeroBits for PackHeader {}

permit_heap!(PackHeader);

/// Stub that aliases a file mapping and must stay embedded by value.
struct MappedStub {
    _nc: NonCopyable,
    _offset: u64,
}

forbid_heap!(MappedStub);

/// Wraps a restricted type; the restriction does not carry over.
struct StubHolder {
    _stub: MappedStub,
}

permit_heap!(StubHolder);

const MAGIC: &[u8] = b"UPX!";

const _: () = {
    assert!(string_len(MAGIC) == 4);
    assert!(string_eq(b"UPX!\0\0\0\0", MAGIC));
    assert!(string_lt(b".data", b".text"));
    assert!(mem_eq(b"UPX!abc", MAGIC, 4));
};

fn sample_header() -> PackHeader {
    PackHeader {
        magic: *b"UPX!",
        version: 14,
        compressed: Flag8::TRUE,
        filtered: Flag16Lenient::new(0x7f),
        entry: 0x0040_1000,
        stripped: Tribool::FALSE,
    }
}

#[test]
fn header_fields_keep_their_storage_width() {
    assert_eq!(size_of::<Flag8>(), 1);
    assert_eq!(size_of::<Flag16Lenient>(), 2);
    assert_eq!(size_of::<Tribool>(), 4);
    assert_eq!(align_of::<Flag16Lenient>(), align_of::<u16>());
}

#[test]
fn out_of_range_flag_reads_as_third() {
    let header = sample_header();
    assert!(header.filtered.is_third());
    assert_eq!(header.filtered.raw(), 2);
    assert!(header.filtered.to_bool());
    assert!(header.compressed.to_bool());
    assert!(!header.stripped.to_bool());
    assert_eq!(header.filtered, TriState::Third);
}

#[test]
fn clearing_yields_all_false_flags() {
    let mut header = sample_header();
    mem_clear(&mut header);
    assert_eq!(header.magic, [0; 4]);
    assert!(header.compressed.is_strict_false());
    assert!(header.filtered.is_strict_false());
    assert!(header.stripped.is_strict_false());
    assert_eq!(header.entry, 0);
}

#[test]
fn header_serializes_flags_as_raw_integers() {
    let header = sample_header();
    let json = serde_json::to_value(header).unwrap();
    assert_eq!(json["compressed"], 1);
    assert_eq!(json["filtered"], 2);
    assert_eq!(json["stripped"], 0);

    let mut patched = json.clone();
    patched["stripped"] = serde_json::json!(-3);
    let back: PackHeader = serde_json::from_value(patched).unwrap();
    assert!(back.stripped.is_third());
    assert_eq!(back.stripped.raw(), 2);
}

#[test]
fn capability_matrix_is_per_type() {
    assert!(<PackHeader as HeapAllocation>::PERMITTED);
    assert!(!<MappedStub as HeapAllocation>::PERMITTED);
    assert!(<StubHolder as HeapAllocation>::PERMITTED);
    assert!(!<[MappedStub; 3] as HeapAllocation>::PERMITTED);

    let boxed = binguard_core::capability::heap_new(sample_header());
    assert_eq!(boxed.version, 14);
    let holder = binguard_core::capability::heap_new(StubHolder {
        _stub: MappedStub {
            _nc: NonCopyable::new(),
            _offset: 0x200,
        },
    });
    drop(holder);
}

#[test]
fn section_offsets_align_and_wrap() {
    let section_end = 0x1234_u64;
    assert_eq!(align_up_u64(section_end, 0x200), 0x1400);
    assert_eq!(align_gap(0x1234, 0x10), 0xc);
    assert_eq!(
        try_align_up(usize::MAX - 2, 8),
        Err(PrimitiveError::AlignmentOverflow {
            value: (usize::MAX - 2) as u64,
            alignment: 8,
        })
    );
    assert_eq!(wrapping_add(u32::MAX, sample_header().entry), 0x0040_0fff);
    assert_eq!(bswap32(u32::from_le_bytes(*b"UPX!")), u32::from_be_bytes(*b"UPX!"));
}
