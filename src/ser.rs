use std::fmt;
use std::marker::PhantomData;

use archery::SharedPointerKind;
use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

use crate::hash::Structural;
use crate::map::HamtMap;
use crate::value::Value;

// Map

struct MapVisitor<'de, K, V, P> {
    phantom_k: PhantomData<K>,
    phantom_v: PhantomData<V>,
    phantom_p: PhantomData<P>,
    phantom_lifetime: PhantomData<&'de ()>,
}

impl<'de, K, V, P> MapVisitor<'de, K, V, P> {
    const fn new() -> Self {
        Self {
            phantom_k: PhantomData,
            phantom_v: PhantomData,
            phantom_p: PhantomData,
            phantom_lifetime: PhantomData,
        }
    }
}

impl<'de, K, V, P> Visitor<'de> for MapVisitor<'de, K, V, P>
where
    K: Deserialize<'de> + Structural,
    V: Deserialize<'de> + Structural,
    P: SharedPointerKind,
{
    type Value = HamtMap<K, V, P>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<Access>(self, mut access: Access) -> Result<Self::Value, Access::Error>
    where
        Access: MapAccess<'de>,
    {
        let mut map = HamtMap::new_with_ptr_kind();
        while let Some((key, value)) = access.next_entry()? {
            map.insert_mut(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V, P> Deserialize<'de> for HamtMap<K, V, P>
where
    K: Deserialize<'de> + Structural,
    V: Deserialize<'de> + Structural,
    P: SharedPointerKind,
{
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        des.deserialize_map(MapVisitor::<'de, K, V, P>::new())
    }
}

impl<K: Serialize, V: Serialize, P: SharedPointerKind> Serialize for HamtMap<K, V, P> {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = ser.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            s.serialize_entry(k, v)?;
        }
        s.end()
    }
}

// Value
//
// Nil is unit and Undefined is none; formats without that distinction read
// both back as Nil. Sets come back as lists, records as maps of their fields.

impl Serialize for Value {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Nil => ser.serialize_unit(),
            Self::Undefined => ser.serialize_none(),
            Self::Bool(b) => ser.serialize_bool(*b),
            Self::Int(i) => ser.serialize_i64(*i),
            Self::Float(f) => ser.serialize_f64(*f),
            Self::Text(s) => ser.serialize_str(s),
            Self::Bytes(b) => ser.serialize_bytes(b),
            Self::List(items) => ser.collect_seq(items.iter()),
            Self::Set(set) => ser.collect_seq(set.keys()),
            Self::Map(map) => map.serialize(ser),
            Self::Record(record) => {
                let mut s = ser.serialize_map(Some(record.fields().len()))?;
                for (name, value) in record.fields() {
                    s.serialize_entry(&**name, value)?;
                }
                s.end()
            }
            Self::Opaque(_) => Err(S::Error::custom("opaque values cannot be serialized")),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any value")
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Undefined)
    }

    fn visit_some<D>(self, des: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(des)
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Int(i))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E>(self, u: u64) -> Result<Value, E> {
        Ok(i64::try_from(u).map_or(Value::Float(u as f64), Value::Int))
    }

    fn visit_f64<E>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Float(f))
    }

    fn visit_str<E>(self, s: &str) -> Result<Value, E> {
        Ok(Value::text(s))
    }

    fn visit_string<E>(self, s: String) -> Result<Value, E> {
        Ok(Value::text(s))
    }

    fn visit_bytes<E>(self, b: &[u8]) -> Result<Value, E> {
        Ok(Value::bytes(b))
    }

    fn visit_byte_buf<E>(self, b: Vec<u8>) -> Result<Value, E> {
        Ok(Value::bytes(b))
    }

    fn visit_seq<Access>(self, mut access: Access) -> Result<Value, Access::Error>
    where
        Access: SeqAccess<'de>,
    {
        let mut items: Vec<Value> = match access.size_hint() {
            None => Vec::new(),
            Some(l) => Vec::with_capacity(l),
        };
        while let Some(item) = access.next_element()? {
            items.push(item);
        }
        Ok(Value::List(items.into()))
    }

    fn visit_map<Access>(self, access: Access) -> Result<Value, Access::Error>
    where
        Access: MapAccess<'de>,
    {
        MapVisitor::new().visit_map(access).map(Value::Map)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(des: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        des.deserialize_any(ValueVisitor)
    }
}
