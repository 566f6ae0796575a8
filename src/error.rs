//! Trie invariant violations reported by
//! [`HamtMap::check_invariants`](crate::HamtMap::check_invariants).
//!
//! The map API itself never fails. A violation means the trie was built
//! incorrectly, so each variant carries enough of the node's position to
//! locate it: `shift` is the bit offset of the node's level.

use thiserror::Error;

use crate::hash::HashCode;

/// A broken structural invariant found while walking a trie.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// An index node has no children or more than
    /// [`MAX_INDEX_NODE`](crate::config::MAX_INDEX_NODE).
    #[error("index node at shift {shift} has {children} children")]
    IndexNodeSize {
        /// Level of the node.
        shift: u32,
        /// Number of children found.
        children: usize,
    },

    /// An index node's bitmap does not count its children.
    #[error("index node at shift {shift}: bitmap {bitmap:#034b} for {children} children")]
    BitmapMismatch {
        /// Level of the node.
        shift: u32,
        /// The node's bitmap.
        bitmap: u32,
        /// Number of children found.
        children: usize,
    },

    /// An array node's recorded size differs from its occupied slots.
    #[error("array node at shift {shift} records size {recorded}, holds {actual}")]
    ArraySizeMismatch {
        /// Level of the node.
        shift: u32,
        /// The node's `size` field.
        recorded: usize,
        /// Occupied slots found.
        actual: usize,
    },

    /// An array node is small enough that it should have been an index node.
    #[error("array node at shift {shift} holds only {size} children")]
    ArrayNodeUnderflow {
        /// Level of the node.
        shift: u32,
        /// Occupied slots found.
        size: usize,
    },

    /// A collision node holds fewer than two entries.
    #[error("collision node at shift {shift} holds {entries} entries")]
    CollisionUnderflow {
        /// Level of the node.
        shift: u32,
        /// Entries found.
        entries: usize,
    },

    /// A collision node holds an entry with a different hash.
    #[error("collision node for hash {expected} holds an entry with hash {found}")]
    CollisionHashMismatch {
        /// The node's hash.
        expected: HashCode,
        /// The stray entry's hash.
        found: HashCode,
    },

    /// Two entries under one collision node have equal keys.
    #[error("collision node for hash {hash} holds a duplicate key")]
    DuplicateKey {
        /// The node's hash.
        hash: HashCode,
    },

    /// An entry or collision node sits in a slot its hash does not select.
    #[error("hash {hash} found at slot {slot} of shift {shift}")]
    MisplacedHash {
        /// The misplaced hash.
        hash: HashCode,
        /// Level of the parent branch.
        shift: u32,
        /// Slot the hash was found under.
        slot: u32,
    },

    /// The cached size differs from the number of reachable entries.
    #[error("map records {recorded} entries, trie holds {actual}")]
    SizeMismatch {
        /// The map's cached size.
        recorded: usize,
        /// Entries reachable from the root.
        actual: usize,
    },
}
