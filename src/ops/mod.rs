//! Pure trie operations: each takes a node and returns its successor.

pub mod get;
pub mod insert;
pub mod remove;
pub mod validate;
