use crate::node::Node;
use crate::tests::ForcedKey;
use crate::{HamtMap, Value};

/// Inserting into a new version leaves the old one untouched.
#[test]
fn old_version_survives_insert() {
    let m1: HamtMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    let m2 = m1.insert(5, 999).insert(1000, 1000);

    assert_eq!(m1.len(), 100);
    assert_eq!(m1.get(&5), Some(&5));
    assert_eq!(m1.get(&1000), None);
    assert_eq!(m2.len(), 101);
    assert_eq!(m2.get(&5), Some(&999));
    for i in (0..100).filter(|&i| i != 5) {
        assert_eq!(m1.get(&i), Some(&i));
        assert_eq!(m2.get(&i), Some(&i));
    }
}

/// Removing from a new version leaves the old one untouched.
#[test]
fn old_version_survives_remove() {
    let m1: HamtMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    let m2 = (0..50).fold(m1.clone(), |m, i| m.remove(&i));

    assert_eq!(m1.len(), 100);
    assert_eq!(m2.len(), 50);
    for i in 0..100 {
        assert_eq!(m1.get(&i), Some(&i));
        assert_eq!(m2.get(&i), (i >= 50).then_some(&i));
    }
    assert_eq!(m1.check_invariants(), Ok(()));
    assert_eq!(m2.check_invariants(), Ok(()));
}

/// In-place updates on one handle do not leak into clones.
#[test]
fn mutating_a_clone_is_isolated() {
    let original: HamtMap<i32, i32> = (0..40).map(|i| (i, i)).collect();
    let mut copy = original.clone();
    copy.insert_mut(7, -7);
    copy.remove_mut(&8);

    assert_eq!(original.get(&7), Some(&7));
    assert_eq!(original.get(&8), Some(&8));
    assert_eq!(copy.get(&7), Some(&-7));
    assert_eq!(copy.get(&8), None);
}

/// Rebinding a key to the value it already holds returns the same version.
#[test]
fn same_value_insert_returns_same_version() {
    let m1: HamtMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    let m2 = m1.insert(42, 42);
    assert!(m2.ptr_eq(&m1));
}

/// Removing an absent key returns the same version.
#[test]
fn absent_remove_returns_same_version() {
    let m1: HamtMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    let m2 = m1.remove(&1000);
    assert!(m2.ptr_eq(&m1));
    assert!(m2.remove(&1000).ptr_eq(&m1));
}

/// Shared payloads short-circuit; an equal but separate payload is stored.
#[test]
fn value_identity_decides_noop() {
    let list = Value::list([Value::from(1), Value::from(2)]);
    let m1 = HamtMap::new().insert(Value::from("k"), list.clone());

    let same = m1.insert(Value::from("k"), list);
    assert!(same.ptr_eq(&m1));

    let rebuilt = m1.insert(Value::from("k"), Value::list([Value::from(1), Value::from(2)]));
    assert!(!rebuilt.ptr_eq(&m1));
    assert_eq!(rebuilt, m1);
    assert_eq!(rebuilt.len(), 1);
}

/// Only the slot on the updated path is copied; siblings are shared.
#[test]
fn untouched_subtrees_are_shared() {
    let m1: HamtMap<ForcedKey, u32> = (0..32).map(|i| (ForcedKey::new(i, i.cast_signed()), i)).collect();
    let m2 = m1.insert(ForcedKey::new(100, 32 + 5), 100);

    let (Some(Node::Array(before)), Some(Node::Array(after))) = (&m1.root, &m2.root) else {
        panic!("expected array roots, got {:?} / {:?}", m1.root, m2.root);
    };
    let shared: Vec<usize> = before
        .children
        .iter()
        .zip(after.children.iter())
        .enumerate()
        .filter(|(_, (a, b))| matches!((a, b), (Some(a), Some(b)) if a.ptr_eq(b)))
        .map(|(slot, _)| slot)
        .collect();

    assert_eq!(shared.len(), 31);
    assert!(!shared.contains(&5));
    assert_eq!(m2.check_invariants(), Ok(()));
}

/// Many versions built from one another all stay readable.
#[test]
fn version_chain() {
    let mut versions = vec![HamtMap::new()];
    for i in 0..64 {
        let next = versions[versions.len() - 1].insert(i, i * i);
        versions.push(next);
    }
    for (len, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), len);
        for i in 0..64 {
            let expected = (usize::try_from(i).unwrap() < len).then_some(i * i);
            assert_eq!(version.get(&i).copied(), expected);
        }
    }
}
