use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::ser;

static NULL: Value = Value::Null;

/// One node of a JSON document.
///
/// Three numeric variants keep the width of the source distinct: integer
/// literals are [`Value::Long`], literals with a fraction or exponent are
/// [`Value::Double`], and values assigned from an `f32` stay
/// [`Value::Float`]. The serializer uses the variant to pick the right
/// precision, so a `Float` never grows spurious digits by being formatted
/// as a double.
///
/// Objects are ordered maps whose iteration order is the sorted key
/// order; that order is canonical for serialization and for equality, so
/// insertion history never shows up in output.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Value::Long(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    /// Any of the three numeric widths.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Long(_) | Value::Float(_) | Value::Double(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(x) => Some(*x),
            _ => None,
        }
    }

    /// Any numeric width, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Long(x) => Some(*x as f64),
            Value::Float(x) => Some(f64::from(*x)),
            Value::Double(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// `true` when this is an object with the given member.
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Value::Object(map) => map.contains_key(key),
            _ => false,
        }
    }

    /// Takes the value out, leaving `Null` behind.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    /// Serializes with newlines and indentation for human consumption.
    /// The compact form is available through `Display` / `to_string`.
    pub fn to_string_pretty(&self) -> String {
        let mut out = String::new();
        ser::write_value(&mut out, self, true, 0);
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        ser::write_value(&mut out, self, false, 0);
        f.write_str(&out)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Value {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Long(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Long(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Value {
        // values past i64::MAX lose their integer representation
        match i64::try_from(value) {
            Ok(x) => Value::Long(x),
            Err(_) => Value::Double(value as f64),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Value {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Missing or out-of-range slots read as `Null`.
    fn index(&self, index: usize) -> &Value {
        match self {
            Value::Array(items) => items.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl IndexMut<usize> for Value {
    /// Converts the target into an array if it is not one, and grows it
    /// with `Null` fill when `index` is past the end.
    fn index_mut(&mut self, index: usize) -> &mut Value {
        if !self.is_array() {
            *self = Value::Array(Vec::new());
        }
        let Value::Array(items) = self else {
            unreachable!()
        };
        if index >= items.len() {
            items.resize_with(index + 1, Value::default);
        }
        &mut items[index]
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self {
            Value::Object(map) => map.get(key).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl IndexMut<&str> for Value {
    /// Converts the target into an object if it is not one, inserting
    /// `Null` on first touch of a missing key.
    fn index_mut(&mut self, key: &str) -> &mut Value {
        if !self.is_object() {
            *self = Value::Object(BTreeMap::new());
        }
        let Value::Object(map) = self else {
            unreachable!()
        };
        map.entry(key.to_owned()).or_default()
    }
}
