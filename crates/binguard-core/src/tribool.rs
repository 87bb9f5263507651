//! Tri-valued logic stored in a plain integer.
//!
//! Binary formats often carry flags that are logically boolean but reserve
//! other encodings for "unknown" or "not applicable". [`TriBool`] keeps that
//! third state explicit instead of coercing it to a boolean, while occupying
//! exactly the storage of its underlying integer so it can sit inside a
//! `#[repr(C)]` header struct.
//!
//! Storage is canonical: `0` is `False`, `1` is `True`, and every other raw
//! value is folded to the single sentinel [`TriBool::THIRD_RAW`] (`2`, at every
//! width). An all-zero instance is therefore `False`.
//!
//! The `THIRD_IS_TRUE` parameter only changes the boolean interpretation of
//! the third state. Equality and the `is_*` predicates look at the canonical
//! state and ignore it.

use core::fmt;
use core::ops::Not;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical state of a [`TriBool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TriState {
    False = 0,
    True = 1,
    Third = 2,
}

impl TriState {
    /// Const-evaluable equality.
    #[inline]
    #[must_use]
    pub const fn same(self, other: Self) -> bool {
        self as u8 == other as u8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::False => "false",
            Self::True => "true",
            Self::Third => "third",
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Integer kinds that can back a [`TriBool`].
pub trait TriStorage:
    sealed::Sealed + Copy + Eq + core::hash::Hash + fmt::Debug + 'static
{
    /// Folds an arbitrary raw value onto `0`, `1` or `2`.
    fn canonical(self) -> Self;
}

/// A boolean-compatible value with a third state, laid out as `U`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriBool<U: TriStorage = i32, const THIRD_IS_TRUE: bool = false> {
    raw: U,
}

/// The default flavour: `i32` storage, third state reads as `false`.
pub type Tribool = TriBool<i32>;

macro_rules! tribool_storage {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl TriStorage for $t {
                #[inline]
                fn canonical(self) -> Self {
                    match self {
                        0 => 0,
                        1 => 1,
                        _ => 2,
                    }
                }
            }

            impl<const THIRD_IS_TRUE: bool> TriBool<$t, THIRD_IS_TRUE> {
                pub const FALSE: Self = Self { raw: 0 };
                pub const TRUE: Self = Self { raw: 1 };
                pub const THIRD: Self = Self { raw: 2 };
                /// Stored value of the third state.
                pub const THIRD_RAW: $t = 2;
                pub const IS_THIRD_TRUE: bool = THIRD_IS_TRUE;

                /// Builds from a raw field value; anything but 0 or 1 becomes `Third`.
                #[inline]
                #[must_use]
                pub const fn new(raw: $t) -> Self {
                    Self {
                        raw: match raw {
                            0 => 0,
                            1 => 1,
                            _ => Self::THIRD_RAW,
                        },
                    }
                }

                #[inline]
                #[must_use]
                pub const fn from_bool(b: bool) -> Self {
                    if b { Self::TRUE } else { Self::FALSE }
                }

                #[inline]
                #[must_use]
                pub const fn from_state(state: TriState) -> Self {
                    match state {
                        TriState::False => Self::FALSE,
                        TriState::True => Self::TRUE,
                        TriState::Third => Self::THIRD,
                    }
                }

                #[inline]
                #[must_use]
                pub const fn value(self) -> TriState {
                    match self.raw {
                        0 => TriState::False,
                        1 => TriState::True,
                        _ => TriState::Third,
                    }
                }

                /// Canonical stored integer, ready to be written back to a header.
                #[inline]
                #[must_use]
                pub const fn raw(self) -> $t {
                    self.raw
                }

                /// Boolean interpretation; `Third` maps to `THIRD_IS_TRUE`.
                #[inline]
                #[must_use]
                pub const fn to_bool(self) -> bool {
                    match self.value() {
                        TriState::False => false,
                        TriState::True => true,
                        TriState::Third => THIRD_IS_TRUE,
                    }
                }

                #[inline]
                #[must_use]
                pub const fn is_strict_false(self) -> bool {
                    self.raw == 0
                }

                #[inline]
                #[must_use]
                pub const fn is_strict_true(self) -> bool {
                    self.raw == 1
                }

                #[inline]
                #[must_use]
                pub const fn is_strict_bool(self) -> bool {
                    self.raw == 0 || self.raw == 1
                }

                #[inline]
                #[must_use]
                pub const fn is_third(self) -> bool {
                    !self.is_strict_bool()
                }

                #[inline]
                #[must_use]
                pub const fn equals(self, other: Self) -> bool {
                    self.raw == other.raw
                }

                #[inline]
                #[must_use]
                pub const fn equals_raw(self, raw: $t) -> bool {
                    self.equals(Self::new(raw))
                }

                #[inline]
                #[must_use]
                pub const fn equals_state(self, state: TriState) -> bool {
                    self.value().same(state)
                }
            }

            impl<const THIRD_IS_TRUE: bool> Default for TriBool<$t, THIRD_IS_TRUE> {
                #[inline]
                fn default() -> Self {
                    Self::FALSE
                }
            }

            impl<const THIRD_IS_TRUE: bool> From<$t> for TriBool<$t, THIRD_IS_TRUE> {
                #[inline]
                fn from(raw: $t) -> Self {
                    Self::new(raw)
                }
            }

            impl<const THIRD_IS_TRUE: bool> From<bool> for TriBool<$t, THIRD_IS_TRUE> {
                #[inline]
                fn from(b: bool) -> Self {
                    Self::from_bool(b)
                }
            }

            impl<const THIRD_IS_TRUE: bool> From<TriState> for TriBool<$t, THIRD_IS_TRUE> {
                #[inline]
                fn from(state: TriState) -> Self {
                    Self::from_state(state)
                }
            }

            impl<const THIRD_IS_TRUE: bool> From<TriBool<$t, THIRD_IS_TRUE>> for bool {
                #[inline]
                fn from(t: TriBool<$t, THIRD_IS_TRUE>) -> Self {
                    t.to_bool()
                }
            }

            impl<const THIRD_IS_TRUE: bool> PartialEq<$t> for TriBool<$t, THIRD_IS_TRUE> {
                #[inline]
                fn eq(&self, other: &$t) -> bool {
                    self.equals_raw(*other)
                }
            }

            impl<const THIRD_IS_TRUE: bool> PartialEq<TriState> for TriBool<$t, THIRD_IS_TRUE> {
                #[inline]
                fn eq(&self, other: &TriState) -> bool {
                    self.equals_state(*other)
                }
            }

            impl<const THIRD_IS_TRUE: bool> Not for TriBool<$t, THIRD_IS_TRUE> {
                type Output = bool;

                #[inline]
                fn not(self) -> bool {
                    !self.to_bool()
                }
            }

            impl<const THIRD_IS_TRUE: bool> fmt::Debug for TriBool<$t, THIRD_IS_TRUE> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_tuple("TriBool").field(&self.value()).finish()
                }
            }

            impl<const THIRD_IS_TRUE: bool> fmt::Display for TriBool<$t, THIRD_IS_TRUE> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(&self.value(), f)
                }
            }

            const _: () = {
                assert!(size_of::<TriBool<$t>>() == size_of::<$t>());
                assert!(align_of::<TriBool<$t>>() == align_of::<$t>());
                assert!(size_of::<TriBool<$t, true>>() == size_of::<$t>());
                assert!(align_of::<TriBool<$t, true>>() == align_of::<$t>());
            };
        )*
    };
}

tribool_storage!(i8, u8, i16, u16, i32, u32, i64, u64);

impl<U: TriStorage + Serialize, const THIRD_IS_TRUE: bool> Serialize
    for TriBool<U, THIRD_IS_TRUE>
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, U: TriStorage + Deserialize<'de>, const THIRD_IS_TRUE: bool> Deserialize<'de>
    for TriBool<U, THIRD_IS_TRUE>
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        U::deserialize(deserializer).map(|raw| Self {
            raw: raw.canonical(),
        })
    }
}

const _: () = {
    assert!(!Tribool::from_bool(false).to_bool());
    assert!(Tribool::from_bool(true).to_bool());
    assert!(!Tribool::THIRD.to_bool());
    assert!(TriBool::<i32, true>::THIRD.to_bool());
    assert!(Tribool::new(8).equals(Tribool::new(9)));
    assert!(Tribool::new(8).equals_state(TriState::Third));
};
