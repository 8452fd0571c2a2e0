//! Field type encoder.
//!
//! Character payloads are UTF-16LE code units, exactly `length` characters
//! for fixed types. Numbers are big-endian. Packed decimals hold
//! `2 * length - 1` digit nibbles followed by a sign nibble.

use rfc_marshal_buffers::Writer;

use crate::binary::normalize_binary;
use crate::constants::{RfcType, BCD_MINUS, BCD_PLUS, CHAR_PAD, DIGIT_PAD};
use crate::descriptor::FieldDescriptor;
use crate::error::ConversionError;
use crate::host_value::HostValue;
use crate::numeric::{normalize_numeric, CanonicalDecimal};
use crate::options::MarshalOptions;

pub const CHAR_EXPECTED: &str = "Char";
pub const INTEGER_EXPECTED: &str = "Integer number";

/// Writes field payloads into a [`Writer`].
///
/// Each `write_*` method validates its already-classified input against the
/// descriptor and appends nothing on failure.
pub struct FieldEncoder {
    pub writer: Writer,
}

impl Default for FieldEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    fn write_units(&mut self, units: &[u16]) {
        for &unit in units {
            self.writer.u16_le(unit);
        }
    }

    fn pad_units(&mut self, unit: u16, count: usize) {
        for _ in 0..count {
            self.writer.u16_le(unit);
        }
    }

    /// CHAR: right-padded with spaces.
    pub fn write_char(&mut self, field: &FieldDescriptor, s: &str) -> Result<(), ConversionError> {
        let units: Vec<u16> = s.encode_utf16().collect();
        let width = field.length as usize;
        if units.len() > width {
            return Err(ConversionError::too_long(field, units.len(), width));
        }
        self.write_units(&units);
        self.pad_units(CHAR_PAD, width - units.len());
        Ok(())
    }

    /// NUM: digits only, left-padded with zeros.
    pub fn write_num(&mut self, field: &FieldDescriptor, s: &str) -> Result<(), ConversionError> {
        check_digits(field, s)?;
        let width = field.length as usize;
        if s.len() > width {
            return Err(ConversionError::too_long(field, s.len(), width));
        }
        self.pad_units(DIGIT_PAD, width - s.len());
        self.write_units(&s.encode_utf16().collect::<Vec<_>>());
        Ok(())
    }

    /// DATE (`YYYYMMDD`) and TIME (`HHMMSS`): empty or exactly `length` digits.
    pub fn write_date_time(
        &mut self,
        field: &FieldDescriptor,
        s: &str,
    ) -> Result<(), ConversionError> {
        let width = field.length as usize;
        if s.is_empty() {
            self.pad_units(DIGIT_PAD, width);
            return Ok(());
        }
        check_digits(field, s)?;
        if s.len() > width {
            return Err(ConversionError::too_long(field, s.len(), width));
        }
        if s.len() < width {
            return Err(ConversionError::invalid_string(field, s, s.len()));
        }
        self.write_units(&s.encode_utf16().collect::<Vec<_>>());
        Ok(())
    }

    /// STRING: unpadded, at most `max` characters.
    pub fn write_string(
        &mut self,
        field: &FieldDescriptor,
        s: &str,
        max: usize,
    ) -> Result<(), ConversionError> {
        let units: Vec<u16> = s.encode_utf16().collect();
        if units.len() > max {
            return Err(ConversionError::too_long(field, units.len(), max));
        }
        self.write_units(&units);
        Ok(())
    }

    /// Packs a decimal whose scale already equals the field's decimals.
    pub fn write_bcd(
        &mut self,
        field: &FieldDescriptor,
        value: &CanonicalDecimal,
    ) -> Result<(), ConversionError> {
        let total = (field.length as usize * 2).saturating_sub(1);
        let fraction = value.scale() as usize;
        if field.length == 0 || value.integer_digits() + fraction > total {
            return Err(ConversionError::out_of_range(field, value));
        }
        // Only a lone zero integer digit can be cut here.
        let digits = value.digits();
        let skip = digits.len().saturating_sub(total);
        let mut nibbles = vec![0u8; total - (digits.len() - skip)];
        nibbles.extend_from_slice(&digits[skip..]);
        nibbles.push(if value.is_negative() { BCD_MINUS } else { BCD_PLUS });
        for pair in nibbles.chunks(2) {
            self.writer.u8((pair[0] << 4) | pair[1]);
        }
        Ok(())
    }

    pub fn write_float(&mut self, f: f64) {
        self.writer.f64(f);
    }

    /// Writes `n` with the width of the field's integer type.
    pub fn write_int(&mut self, field: &FieldDescriptor, n: i64) -> Result<(), ConversionError> {
        let out_of_range = |_| ConversionError::out_of_range(field, n);
        match field.rfc_type {
            RfcType::Int1 => self.writer.u8(u8::try_from(n).map_err(out_of_range)?),
            RfcType::Int2 => self.writer.i16(i16::try_from(n).map_err(out_of_range)?),
            RfcType::Int => self.writer.i32(i32::try_from(n).map_err(out_of_range)?),
            _ => self.writer.i64(n),
        }
        Ok(())
    }

    /// RAW: right-padded with zero bytes.
    pub fn write_raw(&mut self, field: &FieldDescriptor, data: &[u8]) -> Result<(), ConversionError> {
        let width = field.length as usize;
        if data.len() > width {
            return Err(ConversionError::too_long(field, data.len(), width));
        }
        self.writer.buf(data);
        self.writer.fill(0, width - data.len());
        Ok(())
    }

    /// XSTRING: unpadded, at most `max` bytes.
    pub fn write_xstring(
        &mut self,
        field: &FieldDescriptor,
        data: &[u8],
        max: usize,
    ) -> Result<(), ConversionError> {
        if data.len() > max {
            return Err(ConversionError::too_long(field, data.len(), max));
        }
        self.writer.buf(data);
        Ok(())
    }

    /// The value a field holds when the caller does not supply one.
    pub fn write_initial(&mut self, field: &FieldDescriptor) {
        let length = field.length as usize;
        match field.rfc_type {
            RfcType::Char => self.pad_units(CHAR_PAD, length),
            RfcType::Num | RfcType::Date | RfcType::Time => self.pad_units(DIGIT_PAD, length),
            RfcType::Bcd if length > 0 => {
                self.writer.fill(0, length - 1);
                self.writer.u8(BCD_PLUS);
            }
            _ => self.writer.fill(0, field.byte_width().unwrap_or(0)),
        }
    }
}

fn check_digits(field: &FieldDescriptor, s: &str) -> Result<(), ConversionError> {
    match s.chars().position(|c| !c.is_ascii_digit()) {
        Some(pos) => Err(ConversionError::invalid_string(field, s, pos)),
        None => Ok(()),
    }
}

fn expect_text<'v>(value: &'v HostValue, field: &FieldDescriptor) -> Result<&'v str, ConversionError> {
    value
        .as_str()
        .ok_or_else(|| ConversionError::type_mismatch(field, CHAR_EXPECTED))
}

/// Maximum length of a STRING/XSTRING field.
pub fn variable_length_limit(field: &FieldDescriptor, options: &MarshalOptions) -> usize {
    match field.length {
        0 => options.max_variable_length,
        n => n as usize,
    }
}

fn run(
    field: &FieldDescriptor,
    write: impl FnOnce(&mut FieldEncoder) -> Result<(), ConversionError>,
) -> Result<Vec<u8>, ConversionError> {
    let mut encoder = FieldEncoder {
        writer: Writer::with_capacity(field.byte_width().unwrap_or(0)),
    };
    write(&mut encoder)?;
    Ok(encoder.writer.flush())
}

pub fn encode_initial(field: &FieldDescriptor) -> Vec<u8> {
    let mut encoder = FieldEncoder::new();
    encoder.write_initial(field);
    encoder.writer.flush()
}

pub fn encode_char(
    value: &HostValue,
    field: &FieldDescriptor,
    _options: &MarshalOptions,
) -> Result<Vec<u8>, ConversionError> {
    let s = expect_text(value, field)?;
    run(field, |e| e.write_char(field, s))
}

pub fn encode_num(
    value: &HostValue,
    field: &FieldDescriptor,
    _options: &MarshalOptions,
) -> Result<Vec<u8>, ConversionError> {
    let s = expect_text(value, field)?;
    run(field, |e| e.write_num(field, s))
}

pub fn encode_date_time(
    value: &HostValue,
    field: &FieldDescriptor,
    _options: &MarshalOptions,
) -> Result<Vec<u8>, ConversionError> {
    let s = expect_text(value, field)?;
    run(field, |e| e.write_date_time(field, s))
}

pub fn encode_string(
    value: &HostValue,
    field: &FieldDescriptor,
    options: &MarshalOptions,
) -> Result<Vec<u8>, ConversionError> {
    let s = expect_text(value, field)?;
    run(field, |e| e.write_string(field, s, variable_length_limit(field, options)))
}

pub fn encode_bcd(
    value: &HostValue,
    field: &FieldDescriptor,
    options: &MarshalOptions,
) -> Result<Vec<u8>, ConversionError> {
    let decimal = normalize_numeric(value, field)?;
    let scaled = decimal
        .rescale(field.decimals, !options.strict_scale)
        .ok_or_else(|| ConversionError::too_many_decimals(field, &decimal))?;
    run(field, |e| e.write_bcd(field, &scaled))
}

pub fn encode_float(
    value: &HostValue,
    field: &FieldDescriptor,
    _options: &MarshalOptions,
) -> Result<Vec<u8>, ConversionError> {
    let f = match value {
        HostValue::Float(f) if f.is_finite() => *f,
        HostValue::Str(text) | HostValue::Decimal(text) => normalize_numeric(value, field)?
            .to_f64()
            .ok_or_else(|| ConversionError::float_overflow(field, text))?,
        _ => normalize_numeric(value, field)?
            .to_f64()
            .ok_or_else(|| ConversionError::float_overflow(field, &format!("{value:?}")))?,
    };
    run(field, |e| {
        e.write_float(f);
        Ok(())
    })
}

/// Integer fields take native integers, or floats with no fractional part.
/// Numeric strings and decimal objects are rejected even when integral.
pub fn encode_int(
    value: &HostValue,
    field: &FieldDescriptor,
    _options: &MarshalOptions,
) -> Result<Vec<u8>, ConversionError> {
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    let n = match value {
        HostValue::Integer(n) => *n,
        HostValue::Float(f) if f.fract() == 0.0 && *f >= -I64_BOUND && *f < I64_BOUND => *f as i64,
        HostValue::Float(f) if f.fract() == 0.0 => {
            return Err(ConversionError::out_of_range(field, f))
        }
        _ => return Err(ConversionError::type_mismatch(field, INTEGER_EXPECTED)),
    };
    run(field, |e| e.write_int(field, n))
}

pub fn encode_raw(
    value: &HostValue,
    field: &FieldDescriptor,
    _options: &MarshalOptions,
) -> Result<Vec<u8>, ConversionError> {
    let data = normalize_binary(value, field)?;
    run(field, |e| e.write_raw(field, &data))
}

pub fn encode_xstring(
    value: &HostValue,
    field: &FieldDescriptor,
    options: &MarshalOptions,
) -> Result<Vec<u8>, ConversionError> {
    let data = normalize_binary(value, field)?;
    run(field, |e| e.write_xstring(field, &data, variable_length_limit(field, options)))
}
