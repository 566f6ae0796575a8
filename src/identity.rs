//! Per-object hash codes for values with no content to hash.
//!
//! The first time an object is hashed it is assigned the next value of a
//! process-wide counter; later hashes of the same object return that code.
//! The table holds only [`Weak`] references, so it never keeps a target alive.
//! A slot whose target has been dropped is stale: it is overwritten if the
//! allocator reuses the address, and swept once the table has doubled since
//! the last sweep. The counter resets to 0 when it reaches [`i32::MAX`].

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError, Weak};

use crate::hash::HashCode;

/// An object hashed by identity.
pub type Target = dyn Any + Send + Sync;

/// Table size below which no sweep is attempted.
const MIN_SWEEP: usize = 64;

static TABLE: LazyLock<Mutex<IdentityTable>> = LazyLock::new(|| Mutex::new(IdentityTable::new()));

/// Returns the identity hash code of `target`, assigning one on first use.
#[must_use]
pub fn identity_hash(target: &Arc<Target>) -> HashCode {
    TABLE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .code_for(target)
}

struct Slot {
    target: Weak<Target>,
    code: HashCode,
}

/// Address-keyed table of assigned identity codes.
pub struct IdentityTable {
    next: HashCode,
    slots: HashMap<usize, Slot>,
    sweep_at: usize,
}

impl IdentityTable {
    /// Creates an empty table whose first code is 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: 0,
            slots: HashMap::new(),
            sweep_at: MIN_SWEEP,
        }
    }

    /// Returns the code of `target`, assigning the next counter value if it
    /// has none.
    pub fn code_for(&mut self, target: &Arc<Target>) -> HashCode {
        let address = Arc::as_ptr(target).cast::<()>().addr();
        if let Some(slot) = self.slots.get(&address)
            && slot.target.strong_count() > 0
        {
            return slot.code;
        }

        let code = self.next;
        self.next = if self.next == HashCode::MAX - 1 {
            0
        } else {
            self.next + 1
        };
        self.slots.insert(
            address,
            Slot {
                target: Arc::downgrade(target),
                code,
            },
        );
        if self.slots.len() >= self.sweep_at {
            self.sweep();
        }
        code
    }

    /// Drops slots whose targets are gone.
    pub fn sweep(&mut self) {
        self.slots.retain(|_, slot| slot.target.strong_count() > 0);
        self.sweep_at = (self.slots.len() * 2).max(MIN_SWEEP);
    }

    /// Number of slots, live or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no code has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[cfg(test)]
    pub(crate) const fn set_next(&mut self, next: HashCode) {
        self.next = next;
    }
}

impl Default for IdentityTable {
    fn default() -> Self {
        Self::new()
    }
}
