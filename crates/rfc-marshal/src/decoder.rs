//! Field type decoder.
//!
//! Payload layouts match [`crate::encoder`]. Decoding only fails on malformed
//! payloads: a wrong size for a fixed type, a bad packed-decimal nibble, or
//! invalid UTF-16.

use rfc_marshal_buffers::Reader;

use crate::constants::RfcType;
use crate::descriptor::FieldDescriptor;
use crate::encoder::variable_length_limit;
use crate::error::ConversionError;
use crate::host_value::HostValue;
use crate::numeric::CanonicalDecimal;
use crate::options::{BcdMode, MarshalOptions};

/// Reads field payloads from a byte slice.
pub struct FieldDecoder<'a> {
    pub reader: Reader<'a>,
}

impl<'a> FieldDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
        }
    }

    /// Reads `count` UTF-16 code units and decodes them.
    pub fn read_text(&mut self, field: &FieldDescriptor, count: usize) -> Result<String, ConversionError> {
        let units = (0..count)
            .map(|_| self.reader.u16_le())
            .collect::<Result<Vec<u16>, _>>()
            .map_err(|e| ConversionError::decoding(field, e))?;
        String::from_utf16(&units).map_err(|e| ConversionError::decoding(field, e))
    }

    /// Unpacks `length` bytes of packed decimal with `decimals` fraction digits.
    pub fn read_bcd(&mut self, field: &FieldDescriptor) -> Result<CanonicalDecimal, ConversionError> {
        let packed = self
            .reader
            .buf(field.length as usize)
            .map_err(|e| ConversionError::decoding(field, e))?;
        let mut nibbles = Vec::with_capacity(packed.len() * 2);
        for byte in packed {
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0F);
        }
        let negative = match nibbles.pop() {
            Some(0x0A | 0x0C | 0x0E | 0x0F) => false,
            Some(0x0B | 0x0D) => true,
            Some(sign) => {
                return Err(ConversionError::decoding(
                    field,
                    format!("invalid sign nibble 0x{sign:X}"),
                ))
            }
            None => return Err(ConversionError::decoding(field, "empty packed decimal")),
        };
        if let Some(pos) = nibbles.iter().position(|&d| d > 9) {
            return Err(ConversionError::decoding(
                field,
                format!("invalid digit nibble 0x{:X} at position {pos}", nibbles[pos]),
            ));
        }
        Ok(CanonicalDecimal::from_digits(negative, nibbles, field.decimals))
    }

    pub fn read_int(&mut self, field: &FieldDescriptor) -> Result<i64, ConversionError> {
        let n = match field.rfc_type {
            RfcType::Int1 => self.reader.u8().map(i64::from),
            RfcType::Int2 => self.reader.i16().map(i64::from),
            RfcType::Int => self.reader.i32().map(i64::from),
            _ => self.reader.i64(),
        };
        n.map_err(|e| ConversionError::decoding(field, e))
    }

    pub fn read_float(&mut self, field: &FieldDescriptor) -> Result<f64, ConversionError> {
        self.reader
            .f64()
            .map_err(|e| ConversionError::decoding(field, e))
    }
}

/// Opens a decoder after checking the payload has the field's exact width.
fn fixed<'a>(data: &'a [u8], field: &FieldDescriptor) -> Result<FieldDecoder<'a>, ConversionError> {
    let width = field.byte_width().unwrap_or(0);
    if data.len() != width {
        return Err(ConversionError::decoding(
            field,
            format!("expected {width} bytes, got {}", data.len()),
        ));
    }
    Ok(FieldDecoder::new(data))
}

pub fn decode_char(
    data: &[u8],
    field: &FieldDescriptor,
    options: &MarshalOptions,
) -> Result<HostValue, ConversionError> {
    let text = fixed(data, field)?.read_text(field, field.length as usize)?;
    if field.rfc_type == RfcType::Char && options.rstrip {
        return Ok(HostValue::Str(text.trim_end_matches(' ').to_string()));
    }
    Ok(HostValue::Str(text))
}

pub fn decode_string(
    data: &[u8],
    field: &FieldDescriptor,
    options: &MarshalOptions,
) -> Result<HostValue, ConversionError> {
    if data.len() % 2 != 0 {
        return Err(ConversionError::decoding(
            field,
            format!("odd UTF-16 payload length {}", data.len()),
        ));
    }
    let count = data.len() / 2;
    let max = variable_length_limit(field, options);
    if count > max {
        return Err(ConversionError::decoding(
            field,
            format!("{count} characters exceed maximum length {max}"),
        ));
    }
    FieldDecoder::new(data).read_text(field, count).map(HostValue::Str)
}

/// BCD comes back as an exact decimal string with exactly `decimals`
/// fraction digits, unless [`BcdMode::Number`] is configured.
pub fn decode_bcd(
    data: &[u8],
    field: &FieldDescriptor,
    options: &MarshalOptions,
) -> Result<HostValue, ConversionError> {
    let decimal = fixed(data, field)?.read_bcd(field)?;
    match options.bcd {
        BcdMode::String => Ok(HostValue::Str(decimal.to_string())),
        BcdMode::Number => decimal
            .to_f64()
            .map(HostValue::Float)
            .ok_or_else(|| {
                ConversionError::decoding(field, format!("{decimal} exceeds the double range"))
            }),
    }
}

pub fn decode_float(
    data: &[u8],
    field: &FieldDescriptor,
    _options: &MarshalOptions,
) -> Result<HostValue, ConversionError> {
    fixed(data, field)?.read_float(field).map(HostValue::Float)
}

pub fn decode_int(
    data: &[u8],
    field: &FieldDescriptor,
    _options: &MarshalOptions,
) -> Result<HostValue, ConversionError> {
    fixed(data, field)?.read_int(field).map(HostValue::Integer)
}

pub fn decode_raw(
    data: &[u8],
    field: &FieldDescriptor,
    _options: &MarshalOptions,
) -> Result<HostValue, ConversionError> {
    fixed(data, field)?;
    Ok(HostValue::Bytes(data.to_vec()))
}

pub fn decode_xstring(
    data: &[u8],
    field: &FieldDescriptor,
    options: &MarshalOptions,
) -> Result<HostValue, ConversionError> {
    let max = variable_length_limit(field, options);
    if data.len() > max {
        return Err(ConversionError::decoding(
            field,
            format!("{} bytes exceed maximum length {max}", data.len()),
        ));
    }
    Ok(HostValue::Bytes(data.to_vec()))
}
