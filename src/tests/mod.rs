mod persistence;
mod stress;
mod sync;
mod traits;
mod value;

use crate::hash::{HashCode, Structural};

/// A key whose hash is chosen by the test, to steer it into a given slot or
/// force full-hash collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ForcedKey {
    id: u32,
    hash: HashCode,
}

impl ForcedKey {
    const fn new(id: u32, hash: HashCode) -> Self {
        Self { id, hash }
    }
}

impl Structural for ForcedKey {
    fn structural_hash(&self) -> HashCode {
        self.hash
    }

    fn structural_eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
