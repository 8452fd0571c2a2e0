//! Field and function interface descriptions.
//!
//! Descriptions come from the remote system's metadata service, which is
//! outside this crate. They derive serde so they can be cached or loaded from
//! JSON/TOML files.

use serde::{Deserialize, Serialize};

use crate::constants::RfcType;

/// Description of one field of an RFC parameter, structure or table line.
///
/// `length` is counted in characters for CHAR, NUM, DATE and TIME, in bytes
/// for BCD, BYTE and the numeric types, and is the maximum length (0 means
/// unbounded) for STRING and XSTRING. `fields` holds the line type of a
/// STRUCTURE or TABLE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub rfc_type: RfcType,
    #[serde(default)]
    pub length: u32,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, rfc_type: RfcType, length: u32, decimals: u32) -> Self {
        Self {
            name: name.into(),
            rfc_type,
            length,
            decimals,
            fields: Vec::new(),
        }
    }

    pub fn char(name: impl Into<String>, length: u32) -> Self {
        Self::new(name, RfcType::Char, length, 0)
    }

    pub fn bcd(name: impl Into<String>, length: u32, decimals: u32) -> Self {
        Self::new(name, RfcType::Bcd, length, decimals)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, RfcType::Float, 8, 0)
    }

    pub fn raw(name: impl Into<String>, length: u32) -> Self {
        Self::new(name, RfcType::Byte, length, 0)
    }

    pub fn structure(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            ..Self::new(name, RfcType::Structure, 0, 0)
        }
    }

    pub fn table(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            ..Self::new(name, RfcType::Table, 0, 0)
        }
    }

    /// Looks up a line-type field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Exact payload size in bytes for fixed-width types, `None` otherwise.
    pub fn byte_width(&self) -> Option<usize> {
        let length = self.length as usize;
        match self.rfc_type {
            RfcType::Char | RfcType::Num | RfcType::Date | RfcType::Time => Some(length * 2),
            RfcType::Bcd | RfcType::Byte => Some(length),
            RfcType::Float | RfcType::Int8 => Some(8),
            RfcType::Int => Some(4),
            RfcType::Int2 => Some(2),
            RfcType::Int1 => Some(1),
            RfcType::String | RfcType::XString | RfcType::Structure | RfcType::Table => None,
        }
    }
}

/// Interface description of one remote function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescription {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<FieldDescriptor>,
}

impl FunctionDescription {
    pub fn parameter(&self, name: &str) -> Option<&FieldDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }
}
