use crate::{HamtMap, Value};

/// 1000 entries: insert all, verify all, remove all.
#[test]
fn thousand_entries() {
    let mut map = HamtMap::new();
    for i in 0_u64..1000 {
        map.insert_mut(i, i * 3);
    }
    assert_eq!(map.len(), 1000);
    assert_eq!(map.check_invariants(), Ok(()));

    for i in 0_u64..1000 {
        assert_eq!(map.get(&i), Some(&(i * 3)), "missing key {i}");
    }

    for i in 0_u64..1000 {
        assert!(map.remove_mut(&i), "failed to remove key {i}");
        if i % 100 == 0 {
            assert_eq!(map.check_invariants(), Ok(()));
        }
    }
    assert!(map.is_empty());
    assert!(map.root.is_none());
}

/// Insert + overwrite + remove interleaved.
#[test]
fn interleaved_operations() {
    let mut map = HamtMap::new();
    for i in 0_u64..200 {
        map.insert_mut(i, i);
    }
    // Overwrite even keys.
    for i in (0_u64..200).step_by(2) {
        map.insert_mut(i, i + 1000);
    }
    // Remove odd keys.
    for i in (1_u64..200).step_by(2) {
        assert!(map.remove_mut(&i));
    }
    assert_eq!(map.len(), 100);
    for i in (0_u64..200).step_by(2) {
        assert_eq!(map.get(&i), Some(&(i + 1000)));
    }
    assert_eq!(map.check_invariants(), Ok(()));
}

/// Text keys spread over the whole hash space.
#[test]
fn text_keys() {
    let map: HamtMap<Value, Value> = (0..5_000)
        .map(|i| (Value::from(format!("key-{i}")), Value::from(i)))
        .collect();
    assert_eq!(map.len(), 5_000);
    assert_eq!(map.iter().count(), 5_000);
    assert_eq!(map.check_invariants(), Ok(()));
    for i in (0..5_000).step_by(7) {
        assert_eq!(map.get(&Value::from(format!("key-{i}"))), Some(&Value::from(i)));
    }
}

/// Growing and shrinking repeatedly crosses every node transition.
#[test]
fn grow_and_shrink_cycles() {
    let mut map = HamtMap::new();
    for round in 0_i64..5 {
        for i in 0..2_000 {
            map.insert_mut(i, round);
        }
        assert_eq!(map.len(), 2_000);
        for i in (0..2_000).filter(|i| i % 5 != 0) {
            map.remove_mut(&i);
        }
        assert_eq!(map.len(), 400);
        assert_eq!(map.check_invariants(), Ok(()));
    }
    for i in (0..2_000).step_by(5) {
        assert_eq!(map.get(&i), Some(&4));
    }
}
