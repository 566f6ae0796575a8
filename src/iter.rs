//! Iterator types for HAMT maps.
//!
//! Traversal is pre-order over the trie: a branch's children are visited in
//! slot order, collision entries in storage order. The order depends on key
//! hashes, not on insertion order, and is the same for every traversal of
//! one map version.

use std::iter::FusedIterator;
use std::slice;

use archery::{SharedPointer, SharedPointerKind};

use crate::node::{Entry, Node};

/// One level of the traversal stack.
enum Frame<'a, K, V, P>
where
    P: SharedPointerKind,
{
    /// Children of an index node (or the root).
    Nodes(slice::Iter<'a, Node<K, V, P>>),
    /// Slots of an array node.
    Slots(slice::Iter<'a, Option<Node<K, V, P>>>),
    /// Entries of a collision node.
    Entries(slice::Iter<'a, SharedPointer<Entry<K, V>, P>>),
}

/// Iterator over references to key-value pairs in a [`HamtMap`](crate::HamtMap).
pub struct Iter<'a, K, V, P>
where
    P: SharedPointerKind,
{
    stack: Vec<Frame<'a, K, V, P>>,
    remaining: usize,
}

impl<'a, K, V, P: SharedPointerKind> Iter<'a, K, V, P> {
    /// Creates an iterator over the trie rooted at `root` holding `len` entries.
    pub(crate) fn new(root: Option<&'a Node<K, V, P>>, len: usize) -> Self {
        let stack = root
            .map(|root| Frame::Nodes(slice::from_ref(root).iter()))
            .into_iter()
            .collect();
        Self {
            stack,
            remaining: len,
        }
    }
}

impl<'a, K, V, P: SharedPointerKind> Iterator for Iter<'a, K, V, P> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = match self.stack.last_mut()? {
                Frame::Nodes(children) => children.next(),
                Frame::Slots(slots) => slots.find_map(Option::as_ref),
                Frame::Entries(entries) => {
                    if let Some(entry) = entries.next() {
                        self.remaining -= 1;
                        return Some((&entry.key, &entry.value));
                    }
                    None
                }
            };

            match node {
                None => {
                    self.stack.pop();
                }
                Some(Node::Entry(entry)) => {
                    self.remaining -= 1;
                    return Some((&entry.key, &entry.value));
                }
                Some(Node::Index(index)) => self.stack.push(Frame::Nodes(index.children.iter())),
                Some(Node::Array(array)) => self.stack.push(Frame::Slots(array.children.iter())),
                Some(Node::Collision(collision)) => {
                    self.stack.push(Frame::Entries(collision.entries.iter()));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, P: SharedPointerKind> ExactSizeIterator for Iter<'_, K, V, P> {}

impl<K, V, P: SharedPointerKind> FusedIterator for Iter<'_, K, V, P> {}

/// Iterator over the keys of a [`HamtMap`](crate::HamtMap).
pub struct Keys<'a, K, V, P: SharedPointerKind>(pub(crate) Iter<'a, K, V, P>);

impl<'a, K, V, P: SharedPointerKind> Iterator for Keys<'a, K, V, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V, P: SharedPointerKind> ExactSizeIterator for Keys<'_, K, V, P> {}

impl<K, V, P: SharedPointerKind> FusedIterator for Keys<'_, K, V, P> {}

/// Iterator over the values of a [`HamtMap`](crate::HamtMap).
pub struct Values<'a, K, V, P: SharedPointerKind>(pub(crate) Iter<'a, K, V, P>);

impl<'a, K, V, P: SharedPointerKind> Iterator for Values<'a, K, V, P> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V, P: SharedPointerKind> ExactSizeIterator for Values<'_, K, V, P> {}

impl<K, V, P: SharedPointerKind> FusedIterator for Values<'_, K, V, P> {}
