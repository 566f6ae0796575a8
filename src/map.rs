//! Persistent HAMT map.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;

use archery::{RcK, SharedPointerKind};

use crate::error::InvariantViolation;
use crate::hash::{self, HashCode, Structural};
use crate::iter::{Iter, Keys, Values};
use crate::node::Node;
use crate::ops::get::find;
use crate::ops::insert::assoc;
use crate::ops::remove::{RemoveOutcome, without};
use crate::ops::validate::validate;

/// Persistent hash map based on a HAMT.
///
/// Every version is immutable. [`insert`](Self::insert) and
/// [`remove`](Self::remove) return a new map that shares every untouched
/// subtree with the original; cloning is O(1).
///
/// Keys are routed by [`Structural::structural_hash`] and compared with
/// [`Structural::structural_eq`], so composite keys such as lists or nested
/// maps work by content.
///
/// `P` selects the reference-counting pointer: [`RcK`] by default, or
/// [`ArcK`](archery::ArcK) for [`HamtMapSync`](crate::HamtMapSync).
pub struct HamtMap<K, V, P: SharedPointerKind = RcK> {
    pub(crate) root: Option<Node<K, V, P>>,
    pub(crate) size: usize,
}

// ---------------------------------------------------------------------------
// Construction & accessors (no trait bounds)
// ---------------------------------------------------------------------------

impl<K, V> HamtMap<K, V> {
    /// Creates an empty single-threaded map.
    #[must_use]
    pub const fn new() -> Self {
        Self::new_with_ptr_kind()
    }
}

impl<K, V, P: SharedPointerKind> HamtMap<K, V, P> {
    /// Creates an empty map with the pointer kind `P`.
    #[must_use]
    pub const fn new_with_ptr_kind() -> Self {
        Self { root: None, size: 0 }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if both maps are the same version: they share a root,
    /// or both are empty.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns an iterator over `(&K, &V)` pairs in trie order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, P> {
        Iter::new(self.root.as_ref(), self.size)
    }

    /// Returns an iterator over the keys in trie order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V, P> {
        Keys(self.iter())
    }

    /// Returns an iterator over the values in trie order.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V, P> {
        Values(self.iter())
    }

    /// Calls `visit(value, key)` once per entry, in trie order.
    pub fn for_each<F: FnMut(&V, &K)>(&self, mut visit: F) {
        for (key, value) in self {
            visit(value, key);
        }
    }

    /// Collects the entries into owned pairs, in trie order.
    #[must_use]
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Read & remove operations (K: Structural)
// ---------------------------------------------------------------------------

impl<K: Structural, V, P: SharedPointerKind> HamtMap<K, V, P> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and value equal to `key`.
    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let root = self.root.as_ref()?;
        let entry = find(root, 0, key.structural_hash(), key)?;
        Some((&entry.key, &entry.value))
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Returns a map without `key`.
    ///
    /// If `key` is absent the result is the same version as `self`
    /// (see [`ptr_eq`](Self::ptr_eq)).
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let mut map = self.clone();
        map.remove_mut(key);
        map
    }

    /// Removes `key` in place. Returns `true` if the key was present.
    ///
    /// Other versions sharing nodes with this one are unaffected.
    pub fn remove_mut(&mut self, key: &K) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        match without(root, 0, key.structural_hash(), key) {
            RemoveOutcome::NotFound => false,
            RemoveOutcome::Removed { node } => {
                self.root = node;
                self.size -= 1;
                true
            }
        }
    }

    /// Walks the whole trie and checks its structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let actual = match &self.root {
            Some(root) => validate(root)?,
            None => 0,
        };
        if actual == self.size {
            Ok(())
        } else {
            Err(InvariantViolation::SizeMismatch {
                recorded: self.size,
                actual,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Write operations (K: Structural, V: Structural)
// ---------------------------------------------------------------------------

impl<K: Structural, V: Structural, P: SharedPointerKind> HamtMap<K, V, P> {
    /// Returns a map with `key` associated to `value`.
    ///
    /// If `key` is already bound to a value [`identical`](Structural::identical)
    /// to `value`, the result is the same version as `self`.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let mut map = self.clone();
        map.insert_mut(key, value);
        map
    }

    /// Associates `key` with `value` in place. Returns `false` if the map
    /// already held exactly this binding and nothing changed.
    ///
    /// Other versions sharing nodes with this one are unaffected.
    pub fn insert_mut(&mut self, key: K, value: V) -> bool {
        let hash = key.structural_hash();
        let Some(root) = &self.root else {
            self.root = Some(Node::entry(hash, key, value));
            self.size = 1;
            return true;
        };

        let outcome = assoc(root, 0, hash, key, value);
        if outcome.node.ptr_eq(root) {
            return false;
        }
        self.root = Some(outcome.node);
        if outcome.added {
            self.size += 1;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Structural hashing & equality
// ---------------------------------------------------------------------------

impl<K: Structural, V: Structural, P: SharedPointerKind> Structural for HamtMap<K, V, P> {
    fn structural_hash(&self) -> HashCode {
        hash::hash_pairs(
            self.iter()
                .map(|(key, value)| (value.structural_hash(), key.structural_hash())),
        )
    }

    fn structural_eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.size == other.size
            && self.iter().all(|(key, value)| {
                other
                    .get(key)
                    .is_some_and(|theirs| value.structural_eq(theirs))
            })
    }

    fn identical(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V, P: SharedPointerKind> Clone for HamtMap<K, V, P> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
        }
    }
}

impl<K, V, P: SharedPointerKind> Default for HamtMap<K, V, P> {
    fn default() -> Self {
        Self::new_with_ptr_kind()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, P: SharedPointerKind> fmt::Debug for HamtMap<K, V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Structural, V: Structural, P: SharedPointerKind> PartialEq for HamtMap<K, V, P> {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

impl<K: Structural, V: Structural, P: SharedPointerKind> Hash for HamtMap<K, V, P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.structural_hash());
    }
}

impl<K: Structural, V: Structural, P: SharedPointerKind> Extend<(K, V)> for HamtMap<K, V, P> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert_mut(key, value);
        }
    }
}

impl<K: Structural, V: Structural, P: SharedPointerKind> FromIterator<(K, V)> for HamtMap<K, V, P> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new_with_ptr_kind();
        map.extend(iter);
        map
    }
}

impl<K: Structural, V: Structural, P: SharedPointerKind, S> From<HashMap<K, V, S>> for HamtMap<K, V, P> {
    fn from(source: HashMap<K, V, S>) -> Self {
        source.into_iter().collect()
    }
}

impl<K: Structural, V, P: SharedPointerKind> ops::Index<&K> for HamtMap<K, V, P> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V, P: SharedPointerKind> IntoIterator for &'a HamtMap<K, V, P> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, P>;

    fn into_iter(self) -> Iter<'a, K, V, P> {
        self.iter()
    }
}
