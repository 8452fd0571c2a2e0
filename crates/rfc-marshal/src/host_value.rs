//! [`HostValue`], the untyped value a caller hands to the marshaller.

use indexmap::IndexMap;

/// Ordered field-name to value map used for parameters and structure rows.
pub type HostMap = IndexMap<String, HostValue>;

/// A dynamically-typed host value.
///
/// Callers build these from whatever their runtime holds; the marshaller
/// classifies each one with [`HostValue::kind`] before any type-specific rule
/// runs, and never coerces between kinds implicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// Absent value; encodes as the field's initial value.
    Null,
    Bool(bool),
    /// Native integer number.
    Integer(i64),
    /// Native floating-point number.
    Float(f64),
    /// Arbitrary-precision decimal object, kept as its textual form
    /// (`"-12.345"`, `"1.5e-3"`).
    Decimal(String),
    /// Text.
    Str(String),
    /// Byte buffer.
    Bytes(Vec<u8>),
    /// Table rows.
    Array(Vec<HostValue>),
    /// Structure.
    Object(HostMap),
}

/// Closed set of value kinds used for the classification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Absent,
    Number,
    Decimal,
    Text,
    Bytes,
    Structure,
    Table,
    Unrecognized,
}

impl HostValue {
    /// Wraps the textual form of a decimal object.
    pub fn decimal(text: impl Into<String>) -> Self {
        HostValue::Decimal(text.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            HostValue::Null => ValueKind::Absent,
            HostValue::Integer(_) | HostValue::Float(_) => ValueKind::Number,
            HostValue::Decimal(_) => ValueKind::Decimal,
            HostValue::Str(_) => ValueKind::Text,
            HostValue::Bytes(_) => ValueKind::Bytes,
            HostValue::Object(_) => ValueKind::Structure,
            HostValue::Array(_) => ValueKind::Table,
            HostValue::Bool(_) => ValueKind::Unrecognized,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            HostValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HostValue::Float(f) => Some(*f),
            HostValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HostValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HostMap> {
        match self {
            HostValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[HostValue]> {
        match self {
            HostValue::Array(rows) => Some(rows),
            _ => None,
        }
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Str(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Str(s)
    }
}

impl From<i64> for HostValue {
    fn from(n: i64) -> Self {
        HostValue::Integer(n)
    }
}

impl From<i32> for HostValue {
    fn from(n: i32) -> Self {
        HostValue::Integer(n as i64)
    }
}

impl From<f64> for HostValue {
    fn from(f: f64) -> Self {
        HostValue::Float(f)
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Bool(b)
    }
}

impl From<Vec<u8>> for HostValue {
    fn from(b: Vec<u8>) -> Self {
        HostValue::Bytes(b)
    }
}

impl From<&[u8]> for HostValue {
    fn from(b: &[u8]) -> Self {
        HostValue::Bytes(b.to_vec())
    }
}

impl From<HostMap> for HostValue {
    fn from(map: HostMap) -> Self {
        HostValue::Object(map)
    }
}

impl From<serde_json::Value> for HostValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => HostValue::Null,
            serde_json::Value::Bool(b) => HostValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    HostValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    // Out of i64 range: keep it exact as a decimal.
                    HostValue::Decimal(u.to_string())
                } else {
                    HostValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => HostValue::Str(s),
            serde_json::Value::Array(arr) => {
                HostValue::Array(arr.into_iter().map(HostValue::from).collect())
            }
            serde_json::Value::Object(obj) => HostValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, HostValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<HostValue> for serde_json::Value {
    fn from(v: HostValue) -> Self {
        match v {
            HostValue::Null => serde_json::Value::Null,
            HostValue::Bool(b) => serde_json::Value::Bool(b),
            HostValue::Integer(i) => serde_json::json!(i),
            HostValue::Float(f) => serde_json::json!(f),
            HostValue::Decimal(s) | HostValue::Str(s) => serde_json::Value::String(s),
            HostValue::Bytes(b) => {
                serde_json::Value::Array(b.into_iter().map(serde_json::Value::from).collect())
            }
            HostValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            HostValue::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
