//! Structural hashing.
//!
//! Hash codes are 32-bit and consistent with structural equality:
//! `a.structural_eq(b)` implies `a.structural_hash() == b.structural_hash()`.
//!
//! - numbers hash their IEEE-754 bit pattern, so `1_i64` and `1.0_f64` agree
//! - text folds UTF-16 code units with `h = h * 31 + unit`
//! - ordered sequences fold element hashes the same way
//! - unordered collections sum element hashes
//! - maps and records sum [`combine`]`(hash(value), hash(key))` per pair
//! - opaque values get a per-object code from [`identity`](crate::identity)

use std::rc::Rc;
use std::sync::Arc;

/// A 32-bit hash code. Not unique; collisions are resolved by equality.
pub type HashCode = i32;

/// Hash of the null sentinel.
pub const NIL_HASH: HashCode = 1_108_378_658;

/// Hash of the absent sentinel.
pub const UNDEFINED_HASH: HashCode = 1_108_378_659;

/// Hash of `true`.
pub const TRUE_HASH: HashCode = 1_108_378_657;

/// Hash of `false`.
pub const FALSE_HASH: HashCode = 1_108_378_656;

/// Golden-ratio constant mixed into [`combine`].
const GOLDEN: HashCode = 0x9E37_79B9_u32.cast_signed();

/// Multiplier folding the high word of a float.
const NUMBER_MIX: HashCode = 73_244_475;

/// Value with a content hash and a structural equality.
///
/// The trie compares keys with [`structural_eq`](Self::structural_eq) and
/// routes them with [`structural_hash`](Self::structural_hash). Implementors
/// must keep the two consistent.
pub trait Structural {
    /// Returns the 32-bit structural hash.
    fn structural_hash(&self) -> HashCode;

    /// Returns `true` if `self` and `other` are structurally equal.
    fn structural_eq(&self, other: &Self) -> bool;

    /// Returns `true` if `other` is the same value as `self`, cheaply.
    ///
    /// Used to skip updates that store a value already present. Pointer-backed
    /// types compare identity here; the default falls back to
    /// [`structural_eq`](Self::structural_eq).
    fn identical(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

/// Mixes two hashes; order-sensitive in its arguments, summed per pair by callers.
#[inline]
#[must_use]
pub const fn combine(a: HashCode, b: HashCode) -> HashCode {
    a ^ b
        .wrapping_add(GOLDEN)
        .wrapping_add(a << 6)
        .wrapping_add(a >> 2)
}

/// Hashes a number through its IEEE-754 representation.
///
/// `-0.0` hashes like `0.0`.
#[must_use]
pub fn hash_number(n: f64) -> HashCode {
    #[allow(clippy::float_cmp)]
    let bits: u64 = if n == 0.0 { 0 } else { n.to_bits() };
    let [a, b, c, d, e, f, g, h] = bits.to_be_bytes();
    let high = i32::from_be_bytes([a, b, c, d]);
    let low = i32::from_be_bytes([e, f, g, h]);
    NUMBER_MIX.wrapping_mul((high >> 16) ^ high) ^ low
}

/// Hashes text over its UTF-16 code units.
#[must_use]
pub fn hash_string(s: &str) -> HashCode {
    s.encode_utf16()
        .fold(0, |h: HashCode, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Order-sensitive fold of element hashes.
pub fn hash_ordered<I: IntoIterator<Item = HashCode>>(hashes: I) -> HashCode {
    hashes
        .into_iter()
        .fold(0, |h, element| h.wrapping_mul(31).wrapping_add(element))
}

/// Order-insensitive sum of element hashes.
pub fn hash_unordered<I: IntoIterator<Item = HashCode>>(hashes: I) -> HashCode {
    hashes.into_iter().fold(0, HashCode::wrapping_add)
}

/// Order-insensitive sum of `combine(value_hash, key_hash)` over pairs.
pub fn hash_pairs<I: IntoIterator<Item = (HashCode, HashCode)>>(pairs: I) -> HashCode {
    pairs
        .into_iter()
        .fold(0, |h, (value, key)| h.wrapping_add(combine(value, key)))
}

// ---------------------------------------------------------------------------
// Structural impls for std types
// ---------------------------------------------------------------------------

impl Structural for bool {
    fn structural_hash(&self) -> HashCode {
        if *self { TRUE_HASH } else { FALSE_HASH }
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl Structural for () {
    fn structural_hash(&self) -> HashCode {
        NIL_HASH
    }

    fn structural_eq(&self, _: &Self) -> bool {
        true
    }
}

macro_rules! structural_lossless_number {
    ($($t:ty),*) => {
        $(
            impl Structural for $t {
                fn structural_hash(&self) -> HashCode {
                    hash_number(f64::from(*self))
                }

                #[allow(clippy::float_cmp)]
                fn structural_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

structural_lossless_number!(i8, i16, i32, u8, u16, u32, f32, f64);

macro_rules! structural_wide_integer {
    ($($t:ty),*) => {
        $(
            impl Structural for $t {
                #[allow(clippy::cast_precision_loss)]
                fn structural_hash(&self) -> HashCode {
                    hash_number(*self as f64)
                }

                fn structural_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

structural_wide_integer!(i64, u64, i128, u128, isize, usize);

impl Structural for char {
    fn structural_hash(&self) -> HashCode {
        hash_string(self.encode_utf8(&mut [0; 4]))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl Structural for str {
    fn structural_hash(&self) -> HashCode {
        hash_string(self)
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

macro_rules! structural_text {
    ($($t:ty),*) => {
        $(
            impl Structural for $t {
                fn structural_hash(&self) -> HashCode {
                    hash_string(self)
                }

                fn structural_eq(&self, other: &Self) -> bool {
                    **self == **other
                }
            }
        )*
    };
}

structural_text!(String, Box<str>, Rc<str>, Arc<str>);

impl<T: Structural> Structural for [T] {
    fn structural_hash(&self) -> HashCode {
        hash_ordered(self.iter().map(Structural::structural_hash))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.structural_eq(b))
    }
}

impl<T: Structural> Structural for Vec<T> {
    fn structural_hash(&self) -> HashCode {
        self.as_slice().structural_hash()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.as_slice().structural_eq(other)
    }
}

impl<T: Structural> Structural for Option<T> {
    fn structural_hash(&self) -> HashCode {
        self.as_ref().map_or(NIL_HASH, Structural::structural_hash)
    }

    fn structural_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.structural_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Structural + ?Sized> Structural for &T {
    fn structural_hash(&self) -> HashCode {
        (**self).structural_hash()
    }

    fn structural_eq(&self, other: &Self) -> bool {
        (**self).structural_eq(*other)
    }

    fn identical(&self, other: &Self) -> bool {
        (**self).identical(*other)
    }
}
