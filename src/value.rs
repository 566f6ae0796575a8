//! Dynamic values with structural hashing and equality.
//!
//! [`Value`] is a closed set of value kinds. Each kind has one hashing rule
//! (see [`hash`](crate::hash)) and one equality rule (see
//! [`equality`](crate::equality)), selected by `match`.
//!
//! Every payload is immutable and reference-counted, so a `Value` graph is
//! always acyclic.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::HamtMapSync;
use crate::equality;
use crate::hash::{self, HashCode, NIL_HASH, Structural, UNDEFINED_HASH};
use crate::identity::{self, Target};

/// A dynamically typed value.
#[derive(Clone)]
pub enum Value {
    /// The null sentinel.
    Nil,
    /// The absent sentinel.
    Undefined,
    /// A boolean.
    Bool(bool),
    /// An integer. Equal to a [`Float`](Self::Float) holding the same number.
    Int(i64),
    /// A float. `NaN` equals nothing, `-0.0` equals `0.0`.
    Float(f64),
    /// Text.
    Text(Arc<str>),
    /// A byte string.
    Bytes(Arc<[u8]>),
    /// An ordered sequence.
    List(Arc<[Value]>),
    /// An unordered set.
    Set(HamtMapSync<Value, ()>),
    /// An associative map.
    Map(HamtMapSync<Value, Value>),
    /// A named record.
    Record(Arc<Record>),
    /// An object compared and hashed by identity.
    Opaque(Opaque),
}

/// A record: a name and named fields.
///
/// Two records are equal when their names match and every field is equal.
#[derive(Clone, Debug)]
pub struct Record {
    name: Arc<str>,
    fields: Vec<(Arc<str>, Value)>,
}

/// An object with no content to compare.
///
/// Equal only to clones of itself; hashed through the
/// [identity table](crate::identity).
#[derive(Clone)]
pub struct Opaque(Arc<Target>);

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

impl Record {
    /// Creates a record with no fields.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Sets a field, replacing any field of the same name.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// The record's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[(Arc<str>, Value)] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(n, v)| (**n == *name).then_some(v))
    }
}

// ---------------------------------------------------------------------------
// Opaque
// ---------------------------------------------------------------------------

impl Opaque {
    /// Wraps `value` as an identity-only object.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the wrapped object if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Returns `true` if both handles refer to the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The object's identity hash code.
    #[must_use]
    pub fn identity_hash(&self) -> HashCode {
        identity::identity_hash(&self.0)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Value constructors
// ---------------------------------------------------------------------------

impl Value {
    /// Creates a text value.
    #[must_use]
    pub fn text(s: impl Into<Arc<str>>) -> Self {
        Self::Text(s.into())
    }

    /// Creates a byte string.
    #[must_use]
    pub fn bytes(b: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(b.into())
    }

    /// Creates an ordered sequence.
    #[must_use]
    pub fn list<I: IntoIterator<Item = Self>>(items: I) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Creates a set; duplicates collapse.
    #[must_use]
    pub fn set<I: IntoIterator<Item = Self>>(items: I) -> Self {
        Self::Set(items.into_iter().map(|item| (item, ())).collect())
    }

    /// Creates a map; later pairs win.
    #[must_use]
    pub fn map<I: IntoIterator<Item = (Self, Self)>>(pairs: I) -> Self {
        Self::Map(pairs.into_iter().collect())
    }

    /// Wraps a record.
    #[must_use]
    pub fn record(record: Record) -> Self {
        Self::Record(Arc::new(record))
    }

    /// Wraps an identity-only object.
    #[must_use]
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Opaque::new(value))
    }

    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number as `f64` if this is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s.into())
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::record(record)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Bulk construction from a record
// ---------------------------------------------------------------------------

impl HamtMapSync<Value, Value> {
    /// Builds a map keyed by the record's field names.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        record
            .fields()
            .iter()
            .map(|(name, value)| (Value::Text(Arc::clone(name)), value.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Hashing & equality
// ---------------------------------------------------------------------------

impl Structural for Value {
    fn structural_hash(&self) -> HashCode {
        match self {
            Self::Nil => NIL_HASH,
            Self::Undefined => UNDEFINED_HASH,
            Self::Bool(b) => b.structural_hash(),
            Self::Int(i) => i.structural_hash(),
            Self::Float(f) => hash::hash_number(*f),
            Self::Text(s) => hash::hash_string(s),
            Self::Bytes(b) => <[u8]>::structural_hash(b),
            Self::List(items) => <[Self]>::structural_hash(items),
            Self::Set(set) => hash::hash_unordered(set.keys().map(Structural::structural_hash)),
            Self::Map(map) => map.structural_hash(),
            Self::Record(record) => hash::hash_pairs(
                record
                    .fields
                    .iter()
                    .map(|(name, value)| (value.structural_hash(), hash::hash_string(name))),
            ),
            Self::Opaque(opaque) => opaque.identity_hash(),
        }
    }

    fn structural_eq(&self, other: &Self) -> bool {
        equality::is_equal(self, other)
    }

    fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bytes(a), Self::Bytes(b)) => Arc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => Arc::ptr_eq(a, b),
            (Self::Set(a), Self::Set(b)) => a.ptr_eq(b),
            (Self::Map(a), Self::Map(b)) => a.ptr_eq(b),
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b),
            (Self::Opaque(a), Self::Opaque(b)) => a.ptr_eq(b),
            _ => equality::is_equal_scalar(self, other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equality::is_equal(self, other)
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.structural_hash());
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("Nil"),
            Self::Undefined => f.write_str("Undefined"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "b{b:?}"),
            Self::List(items) => f.debug_list().entries(items.iter()).finish(),
            Self::Set(set) => f.debug_set().entries(set.keys()).finish(),
            Self::Map(map) => fmt::Debug::fmt(map, f),
            Self::Record(record) => {
                let mut s = f.debug_struct(record.name());
                for (name, value) in &record.fields {
                    s.field(name, value);
                }
                s.finish()
            }
            Self::Opaque(opaque) => fmt::Debug::fmt(opaque, f),
        }
    }
}
