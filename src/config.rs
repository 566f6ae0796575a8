//! Trie geometry.

/// Bits of the hash consumed per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Number of slots in a branch.
pub const BUCKET_SIZE: usize = 1 << BITS_PER_LEVEL;

/// Mask selecting one level's fragment of the hash.
pub const MASK: u32 = (1 << BITS_PER_LEVEL) - 1;

/// An index node holding this many children converts to an array node on the
/// next insertion into an empty slot.
pub const MAX_INDEX_NODE: usize = BUCKET_SIZE / 2;

/// An array node whose live count drops to this value on removal converts
/// back to an index node.
pub const MIN_ARRAY_NODE: usize = BUCKET_SIZE / 4;
