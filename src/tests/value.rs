use pretty_assertions::assert_eq;

use crate::{HamtMap, HamtMapSync, Record, Value};

#[test]
fn record_fields() {
    let record = Record::new("User")
        .with_field("name", "ada")
        .with_field("age", 36)
        .with_field("name", "grace");

    assert_eq!(record.name(), "User");
    assert_eq!(record.fields().len(), 2);
    assert_eq!(record.field("name").and_then(Value::as_str), Some("grace"));
    assert_eq!(record.field("age").and_then(Value::as_f64), Some(36.0));
    assert!(record.field("email").is_none());
}

#[test]
fn map_from_record_uses_field_names() {
    let record = Record::new("User").with_field("name", "ada").with_field("admin", true);
    let map = HamtMapSync::from_record(&record);

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&Value::from("name")), Some(&Value::from("ada")));
    assert_eq!(map.get(&Value::from("admin")), Some(&Value::Bool(true)));
}

#[test]
fn conversions() {
    assert_eq!(Value::from(Some(3)), Value::Int(3));
    assert_eq!(Value::from(None::<i64>), Value::Nil);
    assert_eq!(Value::from(String::from("s")).as_str(), Some("s"));
    assert_eq!(Value::from(2.5).as_f64(), Some(2.5));
    assert_eq!(Value::from(true).as_f64(), None);
    assert_eq!(Value::Nil.as_str(), None);
}

#[test]
fn composite_keys_are_found_by_content() {
    let map = HamtMap::new()
        .insert(Value::list([Value::from(1), Value::from("a")]), "list")
        .insert(Value::set([Value::from(1), Value::from(2)]), "set")
        .insert(Value::map([(Value::from("k"), Value::Nil)]), "map");

    let list_key = Value::list([Value::from(1), Value::from("a")]);
    let set_key = Value::set([Value::from(2), Value::from(1)]);
    let map_key = Value::map([(Value::from("k"), Value::Nil)]);
    assert_eq!(map.get(&list_key), Some(&"list"));
    assert_eq!(map.get(&set_key), Some(&"set"));
    assert_eq!(map.get(&map_key), Some(&"map"));
    assert_eq!(map.get(&Value::list([Value::from(1)])), None);
}

#[test]
fn int_and_float_keys_are_one_key() {
    let map = HamtMap::new().insert(Value::Int(1), "int").insert(Value::Float(1.0), "float");
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&Value::Int(1)), Some(&"float"));
}

#[test]
fn set_collapses_duplicates() {
    let Value::Set(set) = Value::set([Value::from(1), Value::from(1.0), Value::from(2)]) else {
        panic!("expected a set");
    };
    assert_eq!(set.len(), 2);
}

#[test]
fn map_constructor_keeps_last_binding() {
    let Value::Map(map) = Value::map([
        (Value::from("k"), Value::from(1)),
        (Value::from("k"), Value::from(2)),
    ]) else {
        panic!("expected a map");
    };
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&Value::from("k")), Some(&Value::Int(2)));
}

#[test]
fn debug_format() {
    assert_eq!(format!("{:?}", Value::Nil), "Nil");
    assert_eq!(format!("{:?}", Value::from(1)), "1");
    assert_eq!(format!("{:?}", Value::from(1.0)), "1.0");
    assert_eq!(
        format!("{:?}", Value::list([Value::from("a"), Value::Bool(false)])),
        r#"["a", false]"#
    );
    assert_eq!(
        format!("{:?}", Value::record(Record::new("P").with_field("x", 1))),
        "P { x: 1 }"
    );
    assert_eq!(format!("{:?}", Value::map([(Value::from("k"), Value::Nil)])), r#"{"k": Nil}"#);
    assert!(format!("{:?}", Value::opaque(())).starts_with("Opaque("));
}

#[test]
fn values_work_as_std_hash_keys() {
    let mut seen = std::collections::HashSet::new();
    seen.insert(HashableValue(Value::Int(1)));
    assert!(seen.contains(&HashableValue(Value::Float(1.0))));
    assert!(!seen.contains(&HashableValue(Value::Int(2))));
}

/// `Value` has no `Eq` (NaN); tests that need a std set assert it locally.
#[derive(Debug, PartialEq)]
struct HashableValue(Value);

impl Eq for HashableValue {}

impl std::hash::Hash for HashableValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::hash::Hash::hash(&self.0, state);
    }
}
