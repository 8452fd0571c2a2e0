//! Type code → codec lookup table.
//!
//! Every scalar [`RfcType`] has exactly one [`FieldCodec`] entry. Structures
//! and tables have none; the dispatcher handles them by recursing into their
//! line type.

use indexmap::IndexMap;

use crate::constants::RfcType;
use crate::descriptor::FieldDescriptor;
use crate::binary::BYTES_EXPECTED;
use crate::decoder;
use crate::encoder::{self, CHAR_EXPECTED, INTEGER_EXPECTED};
use crate::error::ConversionError;
use crate::host_value::{HostValue, ValueKind};
use crate::numeric::NUMBER_EXPECTED;
use crate::options::MarshalOptions;

pub type EncodeFn =
    fn(&HostValue, &FieldDescriptor, &MarshalOptions) -> Result<Vec<u8>, ConversionError>;
pub type DecodeFn =
    fn(&[u8], &FieldDescriptor, &MarshalOptions) -> Result<HostValue, ConversionError>;

/// Which host value kinds a type accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    /// CHAR, NUM, DATE, TIME, STRING: text only.
    Character,
    /// BCD, FLOAT: numbers, numeric text, decimal objects.
    Numeric,
    /// INT1, INT2, INT4, INT8: native numbers only.
    Integer,
    /// BYTE, XSTRING: byte buffers and binary-safe text.
    Binary,
}

impl TypeFamily {
    pub fn accepts(self, kind: ValueKind) -> bool {
        match self {
            TypeFamily::Character => kind == ValueKind::Text,
            TypeFamily::Numeric => matches!(
                kind,
                ValueKind::Number | ValueKind::Text | ValueKind::Decimal
            ),
            TypeFamily::Integer => kind == ValueKind::Number,
            TypeFamily::Binary => matches!(kind, ValueKind::Text | ValueKind::Bytes),
        }
    }

    /// Leading word of the type-mismatch message.
    pub fn expected(self) -> &'static str {
        match self {
            TypeFamily::Character => CHAR_EXPECTED,
            TypeFamily::Numeric => NUMBER_EXPECTED,
            TypeFamily::Integer => INTEGER_EXPECTED,
            TypeFamily::Binary => BYTES_EXPECTED,
        }
    }
}

/// Encoder/decoder pair for one scalar type.
#[derive(Debug)]
pub struct FieldCodec {
    pub rfc_type: RfcType,
    pub family: TypeFamily,
    pub encode_fn: EncodeFn,
    pub decode_fn: DecodeFn,
}

impl FieldCodec {
    /// Encodes `value`, checking its kind against the family first so a
    /// wrong-kind value never reaches length or range validation. An absent
    /// value encodes as the field's initial value.
    pub fn encode(
        &self,
        value: &HostValue,
        field: &FieldDescriptor,
        options: &MarshalOptions,
    ) -> Result<Vec<u8>, ConversionError> {
        match value.kind() {
            ValueKind::Absent => Ok(encoder::encode_initial(field)),
            kind if self.family.accepts(kind) => (self.encode_fn)(value, field, options),
            _ => Err(ConversionError::type_mismatch(field, self.family.expected())),
        }
    }

    pub fn decode(
        &self,
        data: &[u8],
        field: &FieldDescriptor,
        options: &MarshalOptions,
    ) -> Result<HostValue, ConversionError> {
        (self.decode_fn)(data, field, options)
    }
}

macro_rules! entry {
    ($t:ident, $family:ident, $enc:path, $dec:path) => {
        FieldCodec {
            rfc_type: RfcType::$t,
            family: TypeFamily::$family,
            encode_fn: $enc,
            decode_fn: $dec,
        }
    };
}

pub static CODECS: [FieldCodec; 13] = [
    entry!(Char, Character, encoder::encode_char, decoder::decode_char),
    entry!(Num, Character, encoder::encode_num, decoder::decode_char),
    entry!(Date, Character, encoder::encode_date_time, decoder::decode_char),
    entry!(Time, Character, encoder::encode_date_time, decoder::decode_char),
    entry!(String, Character, encoder::encode_string, decoder::decode_string),
    entry!(Bcd, Numeric, encoder::encode_bcd, decoder::decode_bcd),
    entry!(Float, Numeric, encoder::encode_float, decoder::decode_float),
    entry!(Int1, Integer, encoder::encode_int, decoder::decode_int),
    entry!(Int2, Integer, encoder::encode_int, decoder::decode_int),
    entry!(Int, Integer, encoder::encode_int, decoder::decode_int),
    entry!(Int8, Integer, encoder::encode_int, decoder::decode_int),
    entry!(Byte, Binary, encoder::encode_raw, decoder::decode_raw),
    entry!(XString, Binary, encoder::encode_xstring, decoder::decode_xstring),
];

/// Looks up the codec for a scalar type; `None` for STRUCTURE and TABLE.
pub fn codec(rfc_type: RfcType) -> Option<&'static FieldCodec> {
    CODECS.iter().find(|c| c.rfc_type == rfc_type)
}

/// Payload tree handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Field(Vec<u8>),
    Structure(EncodedMap),
    Table(Vec<EncodedMap>),
}

pub type EncodedMap = IndexMap<String, Encoded>;

impl Encoded {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Encoded::Field(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&EncodedMap> {
        match self {
            Encoded::Structure(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&[EncodedMap]> {
        match self {
            Encoded::Table(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Encoded::Field(_) => "field",
            Encoded::Structure(_) => "structure",
            Encoded::Table(_) => "table",
        }
    }
}
