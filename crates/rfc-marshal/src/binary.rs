//! Binary normalizer: byte buffers and binary-safe text to raw bytes.

use crate::descriptor::FieldDescriptor;
use crate::error::ConversionError;
use crate::host_value::HostValue;

pub const BYTES_EXPECTED: &str = "Buffer or string";

/// Converts a byte-like host value to its exact byte sequence.
///
/// Text is taken one byte per character and is only accepted when every
/// code point is at most `0xFF`; no UTF-8 transcoding happens, so
/// `"\u{41}\u{e9}"` becomes `[0x41, 0xE9]`.
pub fn normalize_binary(
    value: &HostValue,
    field: &FieldDescriptor,
) -> Result<Vec<u8>, ConversionError> {
    match value {
        HostValue::Bytes(b) => Ok(b.clone()),
        HostValue::Str(s) => s
            .chars()
            .enumerate()
            .map(|(i, ch)| u8::try_from(ch).map_err(|_| ConversionError::not_binary_safe(field, ch, i)))
            .collect(),
        _ => Err(ConversionError::type_mismatch(field, BYTES_EXPECTED)),
    }
}
