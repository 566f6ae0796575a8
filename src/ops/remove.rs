//! Removal operation: COW path-copy dissociate.

use archery::SharedPointerKind;

use crate::config::{BITS_PER_LEVEL, MIN_ARRAY_NODE};
use crate::hash::{HashCode, Structural};
use crate::node::{self, ArrayNode, CollisionNode, IndexNode, Node};

/// Outcome of a recursive remove.
pub enum RemoveOutcome<K, V, P>
where
    P: SharedPointerKind,
{
    /// Key was not found; the tree is unchanged.
    NotFound,
    /// Key was removed.
    Removed {
        /// Successor of the visited node, or `None` if the subtree is now
        /// empty and must be pruned from its parent.
        node: Option<Node<K, V, P>>,
    },
}

/// Removes `key` from the subtree rooted at `node`, which sits at `shift`.
pub fn without<K, V, P>(
    node: &Node<K, V, P>,
    shift: u32,
    hash: HashCode,
    key: &K,
) -> RemoveOutcome<K, V, P>
where
    K: Structural,
    P: SharedPointerKind,
{
    match node {
        Node::Entry(entry) => {
            if entry.hash == hash && key.structural_eq(&entry.key) {
                RemoveOutcome::Removed { node: None }
            } else {
                RemoveOutcome::NotFound
            }
        }
        Node::Index(index) => without_index(index, shift, hash, key),
        Node::Array(array) => without_array(array, shift, hash, key),
        Node::Collision(collision) => without_collision(collision, hash, key),
    }
}

// ---------------------------------------------------------------------------
// Index node
// ---------------------------------------------------------------------------

fn without_index<K, V, P>(
    index: &IndexNode<K, V, P>,
    shift: u32,
    hash: HashCode,
    key: &K,
) -> RemoveOutcome<K, V, P>
where
    K: Structural,
    P: SharedPointerKind,
{
    let bit = node::bitpos(hash, shift);
    if index.bitmap & bit == 0 {
        return RemoveOutcome::NotFound;
    }
    let pos = node::index(index.bitmap, bit);

    match without(&index.children[pos], shift + BITS_PER_LEVEL, hash, key) {
        RemoveOutcome::NotFound => RemoveOutcome::NotFound,
        RemoveOutcome::Removed { node: Some(child) } => RemoveOutcome::Removed {
            node: Some(Node::index(
                index.bitmap,
                node::clone_and_set(&index.children, pos, child),
            )),
        },
        RemoveOutcome::Removed { node: None } => {
            if index.bitmap == bit {
                return RemoveOutcome::Removed { node: None };
            }
            // A lone remaining child is kept under this node, not hoisted.
            RemoveOutcome::Removed {
                node: Some(Node::index(
                    index.bitmap ^ bit,
                    node::splice_out(&index.children, pos),
                )),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Array node
// ---------------------------------------------------------------------------

fn without_array<K, V, P>(
    array: &ArrayNode<K, V, P>,
    shift: u32,
    hash: HashCode,
    key: &K,
) -> RemoveOutcome<K, V, P>
where
    K: Structural,
    P: SharedPointerKind,
{
    let pos = node::fragment(hash, shift) as usize;
    let Some(child) = &array.children[pos] else {
        return RemoveOutcome::NotFound;
    };

    match without(child, shift + BITS_PER_LEVEL, hash, key) {
        RemoveOutcome::NotFound => RemoveOutcome::NotFound,
        RemoveOutcome::Removed { node: Some(child) } => {
            let mut children = array.children.clone();
            children[pos] = Some(child);
            RemoveOutcome::Removed {
                node: Some(Node::array(array.size, children)),
            }
        }
        RemoveOutcome::Removed { node: None } => {
            let size = array.size - 1;
            if size <= MIN_ARRAY_NODE {
                return RemoveOutcome::Removed {
                    node: Some(pack(array, pos, size)),
                };
            }
            let mut children = array.children.clone();
            children[pos] = None;
            RemoveOutcome::Removed {
                node: Some(Node::array(size, children)),
            }
        }
    }
}

/// Compacts an array node into an index node, leaving out slot `skip`.
fn pack<K, V, P: SharedPointerKind>(
    array: &ArrayNode<K, V, P>,
    skip: usize,
    size: usize,
) -> Node<K, V, P> {
    let mut bitmap = 0_u32;
    let mut children = Vec::with_capacity(size);
    for (pos, slot) in array.children.iter().enumerate() {
        if pos == skip {
            continue;
        }
        if let Some(child) = slot {
            bitmap |= 1 << pos;
            children.push(child.clone());
        }
    }
    Node::index(bitmap, children)
}

// ---------------------------------------------------------------------------
// Collision node
// ---------------------------------------------------------------------------

fn without_collision<K, V, P>(
    collision: &CollisionNode<K, V, P>,
    hash: HashCode,
    key: &K,
) -> RemoveOutcome<K, V, P>
where
    K: Structural,
    P: SharedPointerKind,
{
    if hash != collision.hash {
        return RemoveOutcome::NotFound;
    }
    let Some(pos) = collision
        .entries
        .iter()
        .position(|entry| key.structural_eq(&entry.key))
    else {
        return RemoveOutcome::NotFound;
    };

    if collision.entries.len() == 2 {
        // One survivor → hand the bare entry back to the parent slot.
        let remaining = &collision.entries[1 - pos];
        return RemoveOutcome::Removed {
            node: Some(Node::Entry(remaining.clone())),
        };
    }

    RemoveOutcome::Removed {
        node: Some(Node::collision(
            collision.hash,
            node::splice_out(&collision.entries, pos),
        )),
    }
}
