//! HAMT node types and bitmap helpers.
//!
//! Every node is a handle around a [`SharedPointer`], so cloning a node only
//! bumps a reference count and a subtree can be linked from any number of map
//! versions at once. Nodes are never mutated after construction.

use std::fmt;

use archery::{SharedPointer, SharedPointerKind};

use crate::config::{BUCKET_SIZE, MASK};
use crate::hash::HashCode;

/// Key-value pair stored at a slot, with the key's hash cached.
pub struct Entry<K, V> {
    /// Structural hash of `key`.
    pub hash: HashCode,
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

/// Sparse branch: one bitmap bit per occupied slot.
///
/// Invariant: `children.len() == bitmap.count_ones()`, children in slot order.
pub struct IndexNode<K, V, P>
where
    P: SharedPointerKind,
{
    /// Occupied slots at this level.
    pub bitmap: u32,
    /// Children of the occupied slots, densely packed.
    pub children: Vec<Node<K, V, P>>,
}

/// Dense branch: slots addressed directly by hash fragment.
///
/// Invariant: `size` equals the number of occupied slots.
pub struct ArrayNode<K, V, P>
where
    P: SharedPointerKind,
{
    /// Number of occupied slots.
    pub size: usize,
    /// All 32 slots.
    pub children: [Option<Node<K, V, P>>; BUCKET_SIZE],
}

/// Entries whose keys share one full hash.
///
/// Invariant: `entries.len() >= 2`, every entry has `hash`.
pub struct CollisionNode<K, V, P>
where
    P: SharedPointerKind,
{
    /// The shared hash.
    pub hash: HashCode,
    /// Entries, scanned linearly by key equality.
    pub entries: Vec<SharedPointer<Entry<K, V>, P>>,
}

/// HAMT node.
pub enum Node<K, V, P>
where
    P: SharedPointerKind,
{
    /// A single key-value pair.
    Entry(SharedPointer<Entry<K, V>, P>),
    /// Bitmap-compressed branch with at most
    /// [`MAX_INDEX_NODE`](crate::config::MAX_INDEX_NODE) children.
    Index(SharedPointer<IndexNode<K, V, P>, P>),
    /// 32-slot branch.
    Array(SharedPointer<ArrayNode<K, V, P>, P>),
    /// Full-hash collision bucket.
    Collision(SharedPointer<CollisionNode<K, V, P>, P>),
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit hash fragment at the given bit-shift depth.
///
/// Shifts past the width of the hash yield fragment 0.
#[inline]
#[must_use]
pub const fn fragment(hash: HashCode, shift: u32) -> u32 {
    match hash.cast_unsigned().checked_shr(shift) {
        Some(bits) => bits & MASK,
        None => 0,
    }
}

/// Returns the single-bit mask of `hash`'s slot at `shift`.
#[inline]
#[must_use]
pub const fn bitpos(hash: HashCode, shift: u32) -> u32 {
    1 << fragment(hash, shift)
}

/// Returns the compact index of `bit` within `bitmap`.
///
/// Counts the number of set bits below `bit`.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

/// Returns an array of 32 empty slots.
#[must_use]
pub fn empty_slots<K, V, P: SharedPointerKind>() -> [Option<Node<K, V, P>>; BUCKET_SIZE] {
    std::array::from_fn(|_| None)
}

// ---------------------------------------------------------------------------
// Copy-on-write slice builders
// ---------------------------------------------------------------------------

/// Copies `items`, replacing the element at `at`.
#[must_use]
pub fn clone_and_set<T: Clone>(items: &[T], at: usize, item: T) -> Vec<T> {
    let mut out = items.to_vec();
    out[at] = item;
    out
}

/// Copies `items` with `item` inserted at `at`.
#[must_use]
pub fn splice_in<T: Clone>(items: &[T], at: usize, item: T) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(&items[..at]);
    out.push(item);
    out.extend_from_slice(&items[at..]);
    out
}

/// Copies `items` without the element at `at`.
#[must_use]
pub fn splice_out<T: Clone>(items: &[T], at: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() - 1);
    out.extend_from_slice(&items[..at]);
    out.extend_from_slice(&items[at + 1..]);
    out
}

// ---------------------------------------------------------------------------
// Constructors & accessors
// ---------------------------------------------------------------------------

impl<K, V, P: SharedPointerKind> Node<K, V, P> {
    /// Allocates an entry node.
    #[must_use]
    pub fn entry(hash: HashCode, key: K, value: V) -> Self {
        Self::Entry(SharedPointer::new(Entry { hash, key, value }))
    }

    /// Allocates an index node.
    #[must_use]
    pub fn index(bitmap: u32, children: Vec<Self>) -> Self {
        debug_assert_eq!(bitmap.count_ones() as usize, children.len());
        Self::Index(SharedPointer::new(IndexNode { bitmap, children }))
    }

    /// Allocates an array node.
    #[must_use]
    pub fn array(size: usize, children: [Option<Self>; BUCKET_SIZE]) -> Self {
        Self::Array(SharedPointer::new(ArrayNode { size, children }))
    }

    /// Allocates a collision node.
    #[must_use]
    pub fn collision(hash: HashCode, entries: Vec<SharedPointer<Entry<K, V>, P>>) -> Self {
        debug_assert!(entries.len() >= 2);
        Self::Collision(SharedPointer::new(CollisionNode { hash, entries }))
    }

    /// Returns `true` if both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Entry(a), Self::Entry(b)) => SharedPointer::ptr_eq(a, b),
            (Self::Index(a), Self::Index(b)) => SharedPointer::ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => SharedPointer::ptr_eq(a, b),
            (Self::Collision(a), Self::Collision(b)) => SharedPointer::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Manual trait impls, free of `K: Trait, V: Trait` bounds
// ---------------------------------------------------------------------------

impl<K, V, P: SharedPointerKind> Clone for Node<K, V, P> {
    fn clone(&self) -> Self {
        match self {
            Self::Entry(entry) => Self::Entry(SharedPointer::clone(entry)),
            Self::Index(node) => Self::Index(SharedPointer::clone(node)),
            Self::Array(node) => Self::Array(SharedPointer::clone(node)),
            Self::Collision(node) => Self::Collision(SharedPointer::clone(node)),
        }
    }
}

impl<K, V, P: SharedPointerKind> fmt::Debug for Node<K, V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry(entry) => f
                .debug_struct("Entry")
                .field("hash", &entry.hash)
                .finish_non_exhaustive(),
            Self::Index(node) => f
                .debug_struct("Index")
                .field("bitmap", &format_args!("{:#034b}", node.bitmap))
                .field("children", &node.children)
                .finish(),
            Self::Array(node) => f
                .debug_struct("Array")
                .field("size", &node.size)
                .field(
                    "children",
                    &node.children.iter().flatten().collect::<Vec<_>>(),
                )
                .finish(),
            Self::Collision(node) => f
                .debug_struct("Collision")
                .field("hash", &node.hash)
                .field("entries_len", &node.entries.len())
                .finish(),
        }
    }
}
