//! Const string and memory comparison.
//!
//! Strings are NUL-terminated byte sequences: a sequence ends at its first NUL
//! byte or at the end of the slice, whichever comes first. That accepts both
//! `b"name"` literals and raw header fields padded with zeros (`b"UPX!\0\0\0\0"`).
//! Every function is a `const fn` so section names and magic values can be
//! checked in `const` items.

/// Number of bytes before the terminator.
#[must_use]
pub const fn string_len(s: &[u8]) -> usize {
    let mut i = 0;
    while i < s.len() && s[i] != 0 {
        i += 1;
    }
    i
}

#[inline]
const fn byte_at(s: &[u8], i: usize) -> u8 {
    if i < s.len() { s[i] } else { 0 }
}

/// Three-way comparison returning -1, 0 or 1.
const fn string_cmp(a: &[u8], b: &[u8]) -> i8 {
    let mut i = 0;
    loop {
        let ca = byte_at(a, i);
        let cb = byte_at(b, i);
        if ca != cb {
            return if ca < cb { -1 } else { 1 };
        }
        if ca == 0 {
            return 0;
        }
        i += 1;
    }
}

#[must_use]
pub const fn string_eq(a: &[u8], b: &[u8]) -> bool {
    string_cmp(a, b) == 0
}

#[must_use]
pub const fn string_ne(a: &[u8], b: &[u8]) -> bool {
    string_cmp(a, b) != 0
}

/// Lexicographic order; the empty string sorts before everything else.
#[must_use]
pub const fn string_lt(a: &[u8], b: &[u8]) -> bool {
    string_cmp(a, b) < 0
}

#[must_use]
pub const fn string_gt(a: &[u8], b: &[u8]) -> bool {
    string_lt(b, a)
}

#[must_use]
pub const fn string_le(a: &[u8], b: &[u8]) -> bool {
    !string_lt(b, a)
}

#[must_use]
pub const fn string_ge(a: &[u8], b: &[u8]) -> bool {
    !string_lt(a, b)
}

/// Compares the first `n` bytes of two fixed-length buffers.
///
/// # Panics
///
/// Panics if `n` exceeds either buffer; in a `const` item that is a build error.
#[must_use]
pub const fn mem_eq(a: &[u8], b: &[u8], n: usize) -> bool {
    assert!(n <= a.len() && n <= b.len(), "mem_eq length exceeds buffer");
    let mut i = 0;
    while i < n {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = {
    assert!(string_len(b"") == 0);
    assert!(string_len(b"abc") == 3);
    assert!(string_eq(b"", b""));
    assert!(string_lt(b"", b"a"));
    assert!(string_lt(b"ab", b"abc"));
    assert!(mem_eq(b"abc", b"abc", 3));
    assert!(mem_eq(&[], &[], 0));
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_stops_at_terminator() {
        assert_eq!(string_len(b""), 0);
        assert_eq!(string_len(b"a"), 1);
        assert_eq!(string_len(b"ab"), 2);
        assert_eq!(string_len(b"abc"), 3);
        assert_eq!(string_len(b"ab\0cd"), 2);
        assert_eq!(string_len(b"\0"), 0);
    }

    #[test]
    fn equality() {
        assert!(string_eq(b"", b""));
        assert!(!string_eq(b"a", b""));
        assert!(!string_eq(b"", b"a"));
        assert!(string_eq(b"abc", b"abc"));
        assert!(!string_eq(b"ab", b"abc"));
        assert!(!string_eq(b"abc", b"ab"));
        assert!(string_eq(b"abc\0\0\0", b"abc"));
    }

    #[test]
    fn lexicographic_order() {
        assert!(!string_lt(b"", b""));
        assert!(!string_lt(b"a", b""));
        assert!(string_lt(b"", b"a"));
        assert!(!string_lt(b"abc", b"abc"));
        assert!(string_lt(b"ab", b"abc"));
        assert!(!string_lt(b"abc", b"ab"));
        assert!(!string_lt(b"abc", b"aba"));
        assert!(string_lt(b"abc", b"abz"));
    }

    #[test]
    fn derived_comparisons() {
        assert!(string_ne(b"abc", b"abz"));
        assert!(!string_gt(b"abc", b"abz"));
        assert!(!string_ge(b"abc", b"abz"));
        assert!(string_le(b"abc", b"abz"));
        assert!(string_le(b"abc", b"abc"));
        assert!(string_ge(b"abc", b"abc"));
        assert!(string_gt(b"b", b"abc"));
    }

    #[test]
    fn high_bytes_compare_unsigned() {
        assert!(string_lt(b"a", b"\xff"));
    }

    #[test]
    fn raw_memory_equality() {
        assert!(mem_eq(&[], &[], 0));
        assert!(mem_eq(b"", b"", 0));
        assert!(mem_eq(b"abc", b"abc", 3));
        assert!(!mem_eq(b"abc", b"abz", 3));
        assert!(mem_eq(b"abc", b"abz", 2));
        assert!(mem_eq(b"a\0c", b"a\0c", 3));
    }

    #[test]
    #[should_panic(expected = "exceeds buffer")]
    fn mem_eq_rejects_overlong_length() {
        let _ = mem_eq(b"ab", b"abc", 3);
    }
}
