//! Lookup operation: traverses the trie to find a key.

use archery::SharedPointerKind;

use crate::config::BITS_PER_LEVEL;
use crate::hash::{HashCode, Structural};
use crate::node::{self, Entry, Node};

/// Searches for `key` in the subtree rooted at `node`, which sits at `shift`.
///
/// Returns the matching entry if found.
pub fn find<'a, K, V, P>(
    node: &'a Node<K, V, P>,
    shift: u32,
    hash: HashCode,
    key: &K,
) -> Option<&'a Entry<K, V>>
where
    K: Structural,
    P: SharedPointerKind,
{
    match node {
        Node::Entry(entry) => {
            (entry.hash == hash && key.structural_eq(&entry.key)).then_some(&**entry)
        }
        Node::Index(index) => {
            let bit = node::bitpos(hash, shift);
            if index.bitmap & bit == 0 {
                return None;
            }
            let child = &index.children[node::index(index.bitmap, bit)];
            find(child, shift + BITS_PER_LEVEL, hash, key)
        }
        Node::Array(array) => {
            // Slots are addressed directly, no popcount.
            let child = array.children[node::fragment(hash, shift) as usize].as_ref()?;
            find(child, shift + BITS_PER_LEVEL, hash, key)
        }
        Node::Collision(collision) => {
            if collision.hash != hash {
                return None;
            }
            collision
                .entries
                .iter()
                .find(|entry| key.structural_eq(&entry.key))
                .map(|entry| &**entry)
        }
    }
}
