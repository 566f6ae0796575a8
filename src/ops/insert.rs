//! Insertion operation: COW path-copy associate.
//!
//! Every function takes the node being replaced by reference and returns its
//! successor. When nothing changes the successor is a clone of the same
//! handle, so callers detect no-ops with [`Node::ptr_eq`] and stop copying.

use archery::{SharedPointer, SharedPointerKind};

use crate::config::{BITS_PER_LEVEL, MAX_INDEX_NODE};
use crate::hash::{HashCode, Structural};
use crate::node::{self, ArrayNode, CollisionNode, Entry, IndexNode, Node};

/// Outcome of a recursive insert.
pub struct InsertOutcome<K, V, P>
where
    P: SharedPointerKind,
{
    /// Successor of the visited node; `ptr_eq` to it if nothing changed.
    pub node: Node<K, V, P>,
    /// `true` if a new key was added, `false` on update or no-op.
    pub added: bool,
}

impl<K, V, P: SharedPointerKind> InsertOutcome<K, V, P> {
    fn unchanged(node: &Node<K, V, P>) -> Self {
        Self {
            node: node.clone(),
            added: false,
        }
    }
}

/// Associates `key` with `value` in the subtree rooted at `node`, which sits
/// at `shift`.
pub fn assoc<K, V, P>(
    node: &Node<K, V, P>,
    shift: u32,
    hash: HashCode,
    key: K,
    value: V,
) -> InsertOutcome<K, V, P>
where
    K: Structural,
    V: Structural,
    P: SharedPointerKind,
{
    match node {
        Node::Entry(entry) => assoc_entry(node, entry, shift, hash, key, value),
        Node::Index(index) => assoc_index(node, index, shift, hash, key, value),
        Node::Array(array) => assoc_array(node, array, shift, hash, key, value),
        Node::Collision(collision) => assoc_collision(node, collision, shift, hash, key, value),
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

fn assoc_entry<K, V, P>(
    node: &Node<K, V, P>,
    entry: &SharedPointer<Entry<K, V>, P>,
    shift: u32,
    hash: HashCode,
    key: K,
    value: V,
) -> InsertOutcome<K, V, P>
where
    K: Structural,
    V: Structural,
    P: SharedPointerKind,
{
    if entry.hash == hash && key.structural_eq(&entry.key) {
        if value.identical(&entry.value) {
            return InsertOutcome::unchanged(node);
        }
        return InsertOutcome {
            node: Node::entry(hash, key, value),
            added: false,
        };
    }

    let incoming = SharedPointer::new(Entry { hash, key, value });
    InsertOutcome {
        node: branch(shift, SharedPointer::clone(entry), incoming),
        added: true,
    }
}

/// Builds the smallest subtree at `shift` holding two distinct entries.
///
/// Chains single-child index nodes until the hash fragments diverge, or
/// wraps both in a collision node if the full hashes are equal.
fn branch<K, V, P: SharedPointerKind>(
    shift: u32,
    existing: SharedPointer<Entry<K, V>, P>,
    incoming: SharedPointer<Entry<K, V>, P>,
) -> Node<K, V, P> {
    if existing.hash == incoming.hash {
        return Node::collision(existing.hash, vec![existing, incoming]);
    }

    let existing_bit = node::bitpos(existing.hash, shift);
    let incoming_bit = node::bitpos(incoming.hash, shift);

    if existing_bit == incoming_bit {
        let child = branch(shift + BITS_PER_LEVEL, existing, incoming);
        Node::index(existing_bit, vec![child])
    } else {
        let children = if existing_bit < incoming_bit {
            vec![Node::Entry(existing), Node::Entry(incoming)]
        } else {
            vec![Node::Entry(incoming), Node::Entry(existing)]
        };
        Node::index(existing_bit | incoming_bit, children)
    }
}

// ---------------------------------------------------------------------------
// Index node
// ---------------------------------------------------------------------------

fn assoc_index<K, V, P>(
    node: &Node<K, V, P>,
    index: &IndexNode<K, V, P>,
    shift: u32,
    hash: HashCode,
    key: K,
    value: V,
) -> InsertOutcome<K, V, P>
where
    K: Structural,
    V: Structural,
    P: SharedPointerKind,
{
    let bit = node::bitpos(hash, shift);
    let pos = node::index(index.bitmap, bit);

    if index.bitmap & bit != 0 {
        // Occupied slot → recurse; an entry child splits into a branch.
        let child = &index.children[pos];
        let outcome = assoc(child, shift + BITS_PER_LEVEL, hash, key, value);
        if outcome.node.ptr_eq(child) {
            return InsertOutcome::unchanged(node);
        }
        return InsertOutcome {
            node: Node::index(
                index.bitmap,
                node::clone_and_set(&index.children, pos, outcome.node),
            ),
            added: outcome.added,
        };
    }

    if index.children.len() >= MAX_INDEX_NODE {
        // Full → rehome every child by its own slot in a 32-slot array.
        let mut slots = node::empty_slots();
        let mut children = index.children.iter();
        for (slot_pos, slot) in slots.iter_mut().enumerate() {
            if index.bitmap & (1 << slot_pos) != 0 {
                *slot = children.next().cloned();
            }
        }
        slots[node::fragment(hash, shift) as usize] = Some(Node::entry(hash, key, value));
        return InsertOutcome {
            node: Node::array(index.children.len() + 1, slots),
            added: true,
        };
    }

    InsertOutcome {
        node: Node::index(
            index.bitmap | bit,
            node::splice_in(&index.children, pos, Node::entry(hash, key, value)),
        ),
        added: true,
    }
}

// ---------------------------------------------------------------------------
// Array node
// ---------------------------------------------------------------------------

fn assoc_array<K, V, P>(
    node: &Node<K, V, P>,
    array: &ArrayNode<K, V, P>,
    shift: u32,
    hash: HashCode,
    key: K,
    value: V,
) -> InsertOutcome<K, V, P>
where
    K: Structural,
    V: Structural,
    P: SharedPointerKind,
{
    let pos = node::fragment(hash, shift) as usize;

    let Some(child) = &array.children[pos] else {
        let mut children = array.children.clone();
        children[pos] = Some(Node::entry(hash, key, value));
        return InsertOutcome {
            node: Node::array(array.size + 1, children),
            added: true,
        };
    };

    let outcome = assoc(child, shift + BITS_PER_LEVEL, hash, key, value);
    if outcome.node.ptr_eq(child) {
        return InsertOutcome::unchanged(node);
    }
    let mut children = array.children.clone();
    children[pos] = Some(outcome.node);
    InsertOutcome {
        node: Node::array(array.size, children),
        added: outcome.added,
    }
}

// ---------------------------------------------------------------------------
// Collision node
// ---------------------------------------------------------------------------

fn assoc_collision<K, V, P>(
    node: &Node<K, V, P>,
    collision: &CollisionNode<K, V, P>,
    shift: u32,
    hash: HashCode,
    key: K,
    value: V,
) -> InsertOutcome<K, V, P>
where
    K: Structural,
    V: Structural,
    P: SharedPointerKind,
{
    if hash != collision.hash {
        // Demote: hang the collision under an index node and insert beside it.
        let wrapper = Node::index(node::bitpos(collision.hash, shift), vec![node.clone()]);
        return assoc(&wrapper, shift, hash, key, value);
    }

    let found = collision
        .entries
        .iter()
        .position(|entry| key.structural_eq(&entry.key));

    let Some(pos) = found else {
        let mut entries = collision.entries.clone();
        entries.push(SharedPointer::new(Entry { hash, key, value }));
        return InsertOutcome {
            node: Node::collision(hash, entries),
            added: true,
        };
    };

    if value.identical(&collision.entries[pos].value) {
        return InsertOutcome::unchanged(node);
    }
    let entries = node::clone_and_set(
        &collision.entries,
        pos,
        SharedPointer::new(Entry { hash, key, value }),
    );
    InsertOutcome {
        node: Node::collision(hash, entries),
        added: false,
    }
}
