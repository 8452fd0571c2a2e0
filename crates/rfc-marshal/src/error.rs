//! Field-addressed conversion errors.

use thiserror::Error;

use crate::constants::RfcRc;
use crate::descriptor::FieldDescriptor;

/// What went wrong while converting a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionErrorKind {
    /// Wrong host value kind for the field's type family.
    TypeMismatch,
    /// Input names a field the description does not have.
    UnknownField,
    /// Syntactically invalid numeric text, or a non-finite float.
    ConversionFailure,
    /// Text that is not binary-safe supplied for a byte field.
    EncodingError,
    /// Value does not fit the declared length, range or scale.
    LengthExceeded,
    /// Malformed payload coming back from the remote side.
    DecodingError,
}

impl ConversionErrorKind {
    pub fn rc(self) -> RfcRc {
        match self {
            ConversionErrorKind::TypeMismatch => RfcRc::InvalidParameter,
            ConversionErrorKind::UnknownField => RfcRc::NotFound,
            ConversionErrorKind::ConversionFailure => RfcRc::ConversionFailure,
            ConversionErrorKind::EncodingError => RfcRc::CodepageConversionFailure,
            ConversionErrorKind::LengthExceeded => RfcRc::BufferTooSmall,
            ConversionErrorKind::DecodingError => RfcRc::SerializationFailure,
        }
    }
}

/// A conversion error addressed to one field.
///
/// `row` is set only for table rows and only when the marshaller is
/// configured with `include_row_index`; the message never includes it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConversionError {
    pub kind: ConversionErrorKind,
    pub field: String,
    pub row: Option<usize>,
    pub message: String,
}

impl ConversionError {
    fn new(kind: ConversionErrorKind, field: &str, message: String) -> Self {
        Self {
            kind,
            field: field.to_string(),
            row: None,
            message,
        }
    }

    pub fn code(&self) -> u32 {
        self.kind.rc().code()
    }

    pub fn key(&self) -> &'static str {
        self.kind.rc().key()
    }

    /// Error class name as the host binding reports it.
    pub fn name(&self) -> &'static str {
        match self.kind {
            ConversionErrorKind::TypeMismatch => "TypeError",
            _ => "RfcLibError",
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// `"{expected} expected when filling field {name} of type {code}"`.
    pub fn type_mismatch(field: &FieldDescriptor, expected: &str) -> Self {
        Self::new(
            ConversionErrorKind::TypeMismatch,
            &field.name,
            format!(
                "{expected} expected when filling field {} of type {}",
                field.name,
                field.rfc_type.code()
            ),
        )
    }

    /// Invalid character at `position` of a numeric or digit string.
    pub fn invalid_string(field: &FieldDescriptor, value: &str, position: usize) -> Self {
        Self::new(
            ConversionErrorKind::ConversionFailure,
            &field.name,
            format!(
                "Cannot convert string value {value} at position {position} for the field {} to type {}",
                field.name, field.rfc_type
            ),
        )
    }

    pub fn non_finite(field: &FieldDescriptor, value: f64) -> Self {
        Self::new(
            ConversionErrorKind::ConversionFailure,
            &field.name,
            format!(
                "Cannot convert float value {value} for the field {} to type {}",
                field.name, field.rfc_type
            ),
        )
    }

    /// Numeric text or decimal beyond the finite double range.
    pub fn float_overflow(field: &FieldDescriptor, value: &str) -> Self {
        Self::new(
            ConversionErrorKind::ConversionFailure,
            &field.name,
            format!(
                "Cannot convert number value {value} for the field {} to type {}",
                field.name, field.rfc_type
            ),
        )
    }

    /// Non-binary-safe character at `position`.
    pub fn not_binary_safe(field: &FieldDescriptor, ch: char, position: usize) -> Self {
        Self::new(
            ConversionErrorKind::EncodingError,
            &field.name,
            format!(
                "Character U+{:04X} at position {position} is not binary-safe when filling field {} of type {}",
                ch as u32,
                field.name,
                field.rfc_type.code()
            ),
        )
    }

    pub fn too_long(field: &FieldDescriptor, actual: usize, max: usize) -> Self {
        Self::new(
            ConversionErrorKind::LengthExceeded,
            &field.name,
            format!(
                "Length {actual} exceeds declared length {max} when filling field {} of type {}",
                field.name,
                field.rfc_type.code()
            ),
        )
    }

    pub fn out_of_range(field: &FieldDescriptor, value: impl std::fmt::Display) -> Self {
        Self::new(
            ConversionErrorKind::LengthExceeded,
            &field.name,
            format!(
                "Number {value} out of range when filling field {} of type {}",
                field.name,
                field.rfc_type.code()
            ),
        )
    }

    pub fn too_many_decimals(field: &FieldDescriptor, value: impl std::fmt::Display) -> Self {
        Self::new(
            ConversionErrorKind::LengthExceeded,
            &field.name,
            format!(
                "Number {value} has more than {} decimal places when filling field {} of type {}",
                field.decimals,
                field.name,
                field.rfc_type.code()
            ),
        )
    }

    pub fn decoding(field: &FieldDescriptor, detail: impl std::fmt::Display) -> Self {
        Self::new(
            ConversionErrorKind::DecodingError,
            &field.name,
            format!(
                "Cannot decode field {} of type {}: {detail}",
                field.name, field.rfc_type
            ),
        )
    }

    pub fn unknown_field(name: &str) -> Self {
        Self::new(
            ConversionErrorKind::UnknownField,
            name,
            format!("Field {name} not found"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RfcType;

    #[test]
    fn kind_code_key_matrix() {
        let cases = vec![
            (ConversionErrorKind::TypeMismatch, 20, "RFC_INVALID_PARAMETER"),
            (ConversionErrorKind::UnknownField, 17, "RFC_NOT_FOUND"),
            (ConversionErrorKind::ConversionFailure, 22, "RFC_CONVERSION_FAILURE"),
            (
                ConversionErrorKind::EncodingError,
                21,
                "RFC_CODEPAGE_CONVERSION_FAILURE",
            ),
            (ConversionErrorKind::LengthExceeded, 23, "RFC_BUFFER_TOO_SMALL"),
            (ConversionErrorKind::DecodingError, 12, "RFC_SERIALIZATION_FAILURE"),
        ];
        for (kind, code, key) in cases {
            assert_eq!(kind.rc().code(), code, "code of {kind:?}");
            assert_eq!(kind.rc().key(), key, "key of {kind:?}");
        }
    }

    #[test]
    fn messages_name_the_field() {
        let field = FieldDescriptor::float("RFCFLOAT");
        let err = ConversionError::invalid_string(&field, "A", 0);
        assert_eq!(
            err.to_string(),
            "Cannot convert string value A at position 0 for the field RFCFLOAT to type RFCTYPE_FLOAT"
        );
        assert_eq!(err.code(), 22);
        assert_eq!(err.name(), "RfcLibError");
        assert_eq!(err.field, "RFCFLOAT");

        let field = FieldDescriptor::new("RFCINT1", RfcType::Int1, 1, 0);
        let err = ConversionError::type_mismatch(&field, "Integer number");
        assert_eq!(
            err.to_string(),
            "Integer number expected when filling field RFCINT1 of type 10"
        );
        assert_eq!(err.name(), "TypeError");
        assert_eq!(err.row, None);
        assert_eq!(err.with_row(3).row, Some(3));
    }
}
