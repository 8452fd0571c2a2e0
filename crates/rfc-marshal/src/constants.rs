//! RFC type codes and return codes.
//!
//! Numeric values follow the remote system's `RFCTYPE` and `RFC_RC`
//! enumerations so they can be compared with what the interface
//! description and the remote side report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field type code of an RFC interface field.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RfcType {
    #[serde(rename = "RFCTYPE_CHAR", alias = "CHAR")]
    Char = 0,
    #[serde(rename = "RFCTYPE_DATE", alias = "DATE")]
    Date = 1,
    #[serde(rename = "RFCTYPE_BCD", alias = "BCD")]
    Bcd = 2,
    #[serde(rename = "RFCTYPE_TIME", alias = "TIME")]
    Time = 3,
    #[serde(rename = "RFCTYPE_BYTE", alias = "RAW")]
    Byte = 4,
    #[serde(rename = "RFCTYPE_TABLE", alias = "TABLE")]
    Table = 5,
    #[serde(rename = "RFCTYPE_NUM", alias = "NUM")]
    Num = 6,
    #[serde(rename = "RFCTYPE_FLOAT", alias = "FLOAT")]
    Float = 7,
    #[serde(rename = "RFCTYPE_INT", alias = "INT4")]
    Int = 8,
    #[serde(rename = "RFCTYPE_INT2", alias = "INT2")]
    Int2 = 9,
    #[serde(rename = "RFCTYPE_INT1", alias = "INT1")]
    Int1 = 10,
    #[serde(rename = "RFCTYPE_STRUCTURE", alias = "STRUCTURE")]
    Structure = 17,
    #[serde(rename = "RFCTYPE_STRING", alias = "STRING")]
    String = 29,
    #[serde(rename = "RFCTYPE_XSTRING", alias = "XSTRING")]
    XString = 30,
    #[serde(rename = "RFCTYPE_INT8", alias = "INT8")]
    Int8 = 31,
}

impl RfcType {
    pub const ALL: [RfcType; 15] = [
        RfcType::Char,
        RfcType::Date,
        RfcType::Bcd,
        RfcType::Time,
        RfcType::Byte,
        RfcType::Table,
        RfcType::Num,
        RfcType::Float,
        RfcType::Int,
        RfcType::Int2,
        RfcType::Int1,
        RfcType::Structure,
        RfcType::String,
        RfcType::XString,
        RfcType::Int8,
    ];

    /// Numeric type code as reported in error messages.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Symbolic name, e.g. `RFCTYPE_FLOAT`.
    pub fn name(self) -> &'static str {
        match self {
            RfcType::Char => "RFCTYPE_CHAR",
            RfcType::Date => "RFCTYPE_DATE",
            RfcType::Bcd => "RFCTYPE_BCD",
            RfcType::Time => "RFCTYPE_TIME",
            RfcType::Byte => "RFCTYPE_BYTE",
            RfcType::Table => "RFCTYPE_TABLE",
            RfcType::Num => "RFCTYPE_NUM",
            RfcType::Float => "RFCTYPE_FLOAT",
            RfcType::Int => "RFCTYPE_INT",
            RfcType::Int2 => "RFCTYPE_INT2",
            RfcType::Int1 => "RFCTYPE_INT1",
            RfcType::Structure => "RFCTYPE_STRUCTURE",
            RfcType::String => "RFCTYPE_STRING",
            RfcType::XString => "RFCTYPE_XSTRING",
            RfcType::Int8 => "RFCTYPE_INT8",
        }
    }

    /// Structures and tables carry a line type instead of a scalar payload.
    pub fn is_container(self) -> bool {
        matches!(self, RfcType::Structure | RfcType::Table)
    }
}

impl fmt::Display for RfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for RfcType {
    type Error = u8;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        RfcType::ALL
            .iter()
            .copied()
            .find(|t| t.code() == v)
            .ok_or(v)
    }
}

/// Return codes attached to conversion errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfcRc {
    SerializationFailure = 12,
    NotFound = 17,
    InvalidParameter = 20,
    CodepageConversionFailure = 21,
    ConversionFailure = 22,
    BufferTooSmall = 23,
}

impl RfcRc {
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Stable symbolic key, e.g. `RFC_CONVERSION_FAILURE`.
    pub fn key(self) -> &'static str {
        match self {
            RfcRc::SerializationFailure => "RFC_SERIALIZATION_FAILURE",
            RfcRc::NotFound => "RFC_NOT_FOUND",
            RfcRc::InvalidParameter => "RFC_INVALID_PARAMETER",
            RfcRc::CodepageConversionFailure => "RFC_CODEPAGE_CONVERSION_FAILURE",
            RfcRc::ConversionFailure => "RFC_CONVERSION_FAILURE",
            RfcRc::BufferTooSmall => "RFC_BUFFER_TOO_SMALL",
        }
    }
}

/// Pad character for CHAR fields.
pub const CHAR_PAD: u16 = b' ' as u16;
/// Pad character for NUM, DATE and TIME fields.
pub const DIGIT_PAD: u16 = b'0' as u16;

/// Sign nibbles of a packed decimal.
pub const BCD_PLUS: u8 = 0x0C;
pub const BCD_MINUS: u8 = 0x0D;
