//! Structural invariant walk.

use archery::SharedPointerKind;

use crate::config::{BITS_PER_LEVEL, MAX_INDEX_NODE, MIN_ARRAY_NODE};
use crate::error::InvariantViolation;
use crate::hash::{HashCode, Structural};
use crate::node::{self, Node};

/// Slots selected on the way down: `(shift, slot)` per branch.
type Path = Vec<(u32, u32)>;

/// Checks every node under `node` and returns the number of entries found.
pub fn validate<K, V, P>(node: &Node<K, V, P>) -> Result<usize, InvariantViolation>
where
    K: Structural,
    P: SharedPointerKind,
{
    walk(node, 0, &mut Path::new())
}

fn walk<K, V, P>(node: &Node<K, V, P>, shift: u32, path: &mut Path) -> Result<usize, InvariantViolation>
where
    K: Structural,
    P: SharedPointerKind,
{
    match node {
        Node::Entry(entry) => {
            check_placement(entry.hash, path)?;
            Ok(1)
        }
        Node::Index(index) => {
            let children = index.children.len();
            if children == 0 || children > MAX_INDEX_NODE {
                return Err(InvariantViolation::IndexNodeSize { shift, children });
            }
            if index.bitmap.count_ones() as usize != children {
                return Err(InvariantViolation::BitmapMismatch {
                    shift,
                    bitmap: index.bitmap,
                    children,
                });
            }
            let slots = (0..u32::BITS).filter(|slot| index.bitmap & (1 << slot) != 0);
            let mut count = 0;
            for (slot, child) in slots.zip(&index.children) {
                count += descend(child, shift, slot, path)?;
            }
            Ok(count)
        }
        Node::Array(array) => {
            let actual = array.children.iter().flatten().count();
            if actual != array.size {
                return Err(InvariantViolation::ArraySizeMismatch {
                    shift,
                    recorded: array.size,
                    actual,
                });
            }
            if actual <= MIN_ARRAY_NODE {
                return Err(InvariantViolation::ArrayNodeUnderflow { shift, size: actual });
            }
            let mut count = 0;
            for (slot, child) in (0..).zip(&array.children) {
                if let Some(child) = child {
                    count += descend(child, shift, slot, path)?;
                }
            }
            Ok(count)
        }
        Node::Collision(collision) => {
            let entries = &collision.entries;
            if entries.len() < 2 {
                return Err(InvariantViolation::CollisionUnderflow {
                    shift,
                    entries: entries.len(),
                });
            }
            if let Some(stray) = entries.iter().find(|entry| entry.hash != collision.hash) {
                return Err(InvariantViolation::CollisionHashMismatch {
                    expected: collision.hash,
                    found: stray.hash,
                });
            }
            for (i, entry) in entries.iter().enumerate() {
                if entries[i + 1..]
                    .iter()
                    .any(|other| entry.key.structural_eq(&other.key))
                {
                    return Err(InvariantViolation::DuplicateKey {
                        hash: collision.hash,
                    });
                }
            }
            check_placement(collision.hash, path)?;
            Ok(entries.len())
        }
    }
}

fn descend<K, V, P>(
    child: &Node<K, V, P>,
    shift: u32,
    slot: u32,
    path: &mut Path,
) -> Result<usize, InvariantViolation>
where
    K: Structural,
    P: SharedPointerKind,
{
    path.push((shift, slot));
    let count = walk(child, shift + BITS_PER_LEVEL, path);
    path.pop();
    count
}

/// Every branch on the path must have routed `hash` to the slot it took.
fn check_placement(hash: HashCode, path: &Path) -> Result<(), InvariantViolation> {
    match path
        .iter()
        .find(|&&(shift, slot)| node::fragment(hash, shift) != slot)
    {
        Some(&(shift, slot)) => Err(InvariantViolation::MisplacedHash { hash, shift, slot }),
        None => Ok(()),
    }
}
