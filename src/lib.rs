//! Persistent hash map based on a HAMT.
//!
//! A HAMT (Hash Array Mapped Trie) routes each key by successive 5-bit slices
//! of its 32-bit hash. Every update copies only the path from the changed
//! slot to the root and shares every other subtree with the previous version,
//! so old versions stay valid and cheap to keep.
//!
//! # Node kinds
//!
//! - **Entry**: one key-value pair
//! - **Index node**: sparse branch, bitmap plus packed children, at most
//!   [`MAX_INDEX_NODE`](config::MAX_INDEX_NODE) children
//! - **Array node**: dense 32-slot branch, demoted back to an index node once
//!   it holds [`MIN_ARRAY_NODE`](config::MIN_ARRAY_NODE) or fewer
//! - **Collision node**: two or more keys sharing one full hash
//!
//! # Keys and values
//!
//! Keys implement [`Structural`]: a 32-bit content hash plus a structural
//! equality. [`Value`] is a ready-made dynamic value type whose lists, sets,
//! maps and records hash and compare by content, and whose opaque objects
//! hash by identity.
//!
//! ```
//! use hamt_dict::HamtMap;
//!
//! let m1: HamtMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
//! let m2 = m1.remove(&"b");
//! assert_eq!(m1.get(&"b"), Some(&2));
//! assert_eq!(m2.get(&"b"), None);
//! assert_eq!((m1.len(), m2.len()), (3, 2));
//! ```
//!
//! # References
//!
//! - Bagwell, 2001, "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod equality;
pub mod error;
pub mod hash;
pub mod identity;
pub mod iter;
pub mod node;
pub mod value;

mod map;
mod map_sync;
mod ops;
#[cfg(feature = "serde")]
mod ser;

#[cfg(test)]
mod tests;

pub use error::InvariantViolation;
pub use hash::{HashCode, Structural};
pub use map::HamtMap;
pub use map_sync::HamtMapSync;
pub use value::{Opaque, Record, Value};
