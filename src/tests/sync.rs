use std::thread;

use crate::{HamtMapSync, Value};

#[test]
fn sync_empty() {
    let map: HamtMapSync<i32, i32> = HamtMapSync::new_sync();
    assert!(map.is_empty());
}

#[test]
fn sync_insert_and_get() {
    let map = HamtMapSync::new_sync().insert("key", 42);
    assert_eq!(map.get(&"key"), Some(&42));
    assert_eq!(map.len(), 1);
}

#[test]
fn sync_remove() {
    let mut map = HamtMapSync::new_sync();
    map.insert_mut(1, 10);
    map.insert_mut(2, 20);
    assert!(map.remove_mut(&1));
    assert_eq!(map.get(&1), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn sync_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<HamtMapSync<String, i32>>();
    assert_send::<Value>();
}

#[test]
fn sync_is_sync() {
    fn assert_sync<T: Sync>() {}
    assert_sync::<HamtMapSync<String, i32>>();
    assert_sync::<Value>();
}

/// Readers on other threads see their version while the owner moves on.
#[test]
fn concurrent_readers_of_one_version() {
    let base: HamtMapSync<u64, u64> = (0..500).map(|i| (i, i * 5)).collect();

    thread::scope(|scope| {
        for _ in 0..4 {
            let snapshot = base.clone();
            scope.spawn(move || {
                for i in 0..500 {
                    assert_eq!(snapshot.get(&i), Some(&(i * 5)));
                }
            });
        }
        let next = (0..500).fold(base.clone(), |m, i| m.remove(&i));
        assert!(next.is_empty());
    });

    assert_eq!(base.len(), 500);
    assert_eq!(base.check_invariants(), Ok(()));
}

/// Versions built on different threads from one base stay independent.
#[test]
fn writers_branch_from_shared_base() {
    let base: HamtMapSync<u64, u64> = (0..100).map(|i| (i, i)).collect();

    let branches: Vec<HamtMapSync<u64, u64>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4_u64)
            .map(|t| {
                let base = &base;
                scope.spawn(move || base.insert(1_000 + t, t).remove(&t))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("writer thread panicked"))
            .collect()
    });

    for (t, branch) in (0_u64..).zip(&branches) {
        assert_eq!(branch.len(), 100);
        assert_eq!(branch.get(&(1_000 + t)), Some(&t));
        assert_eq!(branch.get(&t), None);
    }
    assert_eq!(base.len(), 100);
}
