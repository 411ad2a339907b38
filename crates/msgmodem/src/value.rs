//! Decoded MessagePack values.
//!
//! This module defines the [`Value`] enum, the in-memory form of one decoded
//! MessagePack value, and [`Map`], the insertion-ordered mapping used for
//! decoded map values.
use alloc::{string::String, vec::Vec};

/// One decoded MessagePack value.
///
/// Integer signedness follows the wire tag: the `uint` family and positive
/// fixint decode to [`Value::Uint`], the `int` family and negative fixint to
/// [`Value::Int`]. Float width is preserved as encoded.
///
/// `str`-family payloads decode to [`Value::String`] only when a string
/// encoding is configured on the decoder; otherwise they are surfaced as
/// [`Value::Binary`], exactly like `bin`-family payloads.
///
/// # Examples
///
/// ```
/// use msgmodem::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert(Value::Uint(1), Value::Binary(b"one".to_vec()));
/// let v = Value::Map(map);
/// assert!(v.is_map());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    /// Signed integer, produced by the `int 8/16/32/64` tags and negative
    /// fixint.
    Int(i64),
    /// Unsigned integer, produced by the `uint 8/16/32/64` tags and positive
    /// fixint.
    Uint(u64),
    F32(f32),
    F64(f64),
    /// Raw bytes: every `bin` payload, and `str` payloads when no string
    /// encoding is configured.
    Binary(Vec<u8>),
    /// Decoded text, produced from `str` payloads when a string encoding is
    /// configured.
    String(String),
    Array(Vec<Value>),
    Map(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Nil
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Nil`].
    ///
    /// [`Nil`]: Value::Nil
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is an integer of either signedness.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int(..) | Self::Uint(..))
    }

    /// Returns `true` if the value is a float of either width.
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32(..) | Self::F64(..))
    }

    /// Returns `true` if the value is [`Binary`].
    ///
    /// [`Binary`]: Value::Binary
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Map`].
    ///
    /// [`Map`]: Value::Map
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(..))
    }

    /// Name of the value's kind, used in diagnostics.
    #[must_use]
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Boolean(..) => "boolean",
            Self::Int(..) | Self::Uint(..) => "integer",
            Self::F32(..) | Self::F64(..) => "float",
            Self::Binary(..) => "binary",
            Self::String(..) => "string",
            Self::Array(..) => "array",
            Self::Map(..) => "map",
        }
    }
}

/// An insertion-ordered mapping from decoded keys to decoded values.
///
/// MessagePack map keys may be *any* value, including floats and nested
/// containers, which rules out tree- or hash-based storage; entries are kept
/// as a pair vector in wire order of first appearance. [`Map::insert`] is
/// last-wins: inserting an equal key replaces the value in place.
///
/// Two maps compare equal only when their entries match pairwise, i.e.
/// insertion order is significant.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Map {
    entries: Vec<(Value, Value)>,
}

impl Map {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `value` under `key`, replacing the value of an equal existing
    /// key in place. Returns the replaced value, if any.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, (Value, Value)> {
        self.entries.iter()
    }

    /// Folds a wire-ordered pair list into a map, last-wins on duplicate
    /// keys.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(Value, Value)>) -> Self {
        let mut map = Self {
            entries: Vec::with_capacity(pairs.len()),
        };
        for (key, value) in pairs {
            map.insert(key, value);
        }
        map
    }

    /// Consumes the map, returning its entries in insertion order.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(Value, Value)> {
        self.entries
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = &'a (Value, Value);
    type IntoIter = core::slice::Iter<'a, (Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Map {
    type Item = (Value, Value);
    type IntoIter = alloc::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
