use std::collections::HashMap;
use std::hash::{BuildHasher, RandomState};

use crate::HamtMap;

#[test]
fn default_is_empty() {
    let map: HamtMap<i32, i32> = HamtMap::default();
    assert!(map.is_empty());
}

#[test]
fn debug_format() {
    let map: HamtMap<i32, i32> = HamtMap::new().insert(1, 10);
    assert_eq!(format!("{map:?}"), "{1: 10}");
    assert_eq!(format!("{:?}", HamtMap::<i32, i32>::new()), "{}");
}

#[test]
fn from_iterator() {
    let map: HamtMap<i32, i32> = vec![(1, 10), (2, 20), (3, 30)].into_iter().collect();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&1), Some(&10));
}

#[test]
fn from_iterator_last_wins() {
    let map: HamtMap<i32, i32> = vec![(1, 10), (1, 11)].into_iter().collect();
    assert_eq!(map.len(), 1);
    assert_eq!(map[&1], 11);
}

#[test]
fn extend_trait() {
    let mut map = HamtMap::new().insert(1, 10);
    map.extend(vec![(2, 20), (3, 30)]);
    assert_eq!(map.len(), 3);
}

#[test]
fn from_std_hash_map() {
    let source: HashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    let map = HamtMap::<&str, i32>::from(source);
    assert_eq!(map.len(), 2);
    assert_eq!(map[&"b"], 2);
}

#[test]
fn index_existing() {
    let map = HamtMap::new().insert("key", 42);
    assert_eq!(map[&"key"], 42);
}

#[test]
#[should_panic(expected = "key not found")]
fn index_missing_panics() {
    let map: HamtMap<i32, i32> = HamtMap::new();
    let _ = map[&999];
}

#[test]
fn into_iterator_for_reference() {
    let map: HamtMap<i32, i32> = (0..5).map(|i| (i, i)).collect();
    let mut total = 0;
    for (k, v) in &map {
        total += k + v;
    }
    assert_eq!(total, 20);
}

#[test]
fn clone_shares_root() {
    let map: HamtMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
    let copy = map.clone();
    assert!(copy.ptr_eq(&map));
    assert_eq!(copy, map);
}

#[test]
fn equality_ignores_insertion_order() {
    let forward: HamtMap<i32, i32> = (0..200).map(|i| (i, -i)).collect();
    let backward: HamtMap<i32, i32> = (0..200).rev().map(|i| (i, -i)).collect();
    assert!(!forward.ptr_eq(&backward));
    assert_eq!(forward, backward);

    let changed = backward.insert(17, 0);
    assert_ne!(forward, changed);
    assert_ne!(forward, forward.remove(&3));
}

#[test]
fn equal_maps_hash_equal() {
    let forward: HamtMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
    let backward: HamtMap<i32, i32> = (0..50).rev().map(|i| (i, i)).collect();
    let state = RandomState::new();
    assert_eq!(state.hash_one(&forward), state.hash_one(&backward));
}
