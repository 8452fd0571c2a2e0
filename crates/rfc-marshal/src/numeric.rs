//! Numeric normalizer: host numbers, numeric strings and decimal objects to an
//! exact digit-sequence decimal.
//!
//! Nothing in here goes through binary floating point except
//! [`CanonicalDecimal::from_f64`], which starts from a float anyway and uses
//! its shortest round-trip rendering.

use std::fmt;

use crate::descriptor::FieldDescriptor;
use crate::error::ConversionError;
use crate::host_value::HostValue;

/// What a numeric field asks for in its type-mismatch message.
pub const NUMBER_EXPECTED: &str = "Number, number string or Decimal";

/// Exponents beyond this are rejected rather than expanded into digits.
const MAX_EXPONENT: i64 = 4096;

/// Exact decimal: `(-1)^negative * digits * 10^-scale`.
///
/// `digits` always holds at least `scale + 1` entries so the integer part has
/// at least one digit, and the integer part has no redundant leading zeros.
/// Zero is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalDecimal {
    negative: bool,
    digits: Vec<u8>,
    scale: u32,
}

impl CanonicalDecimal {
    /// Builds a decimal from a coefficient given most significant digit first.
    pub fn from_digits(negative: bool, mut digits: Vec<u8>, scale: u32) -> Self {
        let scale_len = scale as usize;
        if digits.len() < scale_len + 1 {
            let pad = scale_len + 1 - digits.len();
            digits.splice(0..0, std::iter::repeat(0).take(pad));
        }
        let int_len = digits.len() - scale_len;
        let lead = digits[..int_len - 1].iter().take_while(|&&d| d == 0).count();
        digits.drain(..lead);
        let mut decimal = Self {
            negative,
            digits,
            scale,
        };
        decimal.negative &= !decimal.is_zero();
        decimal
    }

    /// Parses a plain numeric string: optional sign, digits, at most one
    /// decimal point. On failure returns the character position of the first
    /// offending character (or the length, if a digit is missing at the end).
    pub fn parse(s: &str) -> Result<Self, usize> {
        Self::parse_with(s, false)
    }

    /// Like [`parse`](Self::parse) but also accepts an exponent suffix
    /// (`1.5e-3`), as decimal objects render very large or small values.
    pub fn parse_scientific(s: &str) -> Result<Self, usize> {
        Self::parse_with(s, true)
    }

    fn parse_with(s: &str, allow_exponent: bool) -> Result<Self, usize> {
        let chars: Vec<char> = s.chars().collect();
        let mut negative = false;
        let mut int_digits = Vec::new();
        let mut frac_digits = Vec::new();
        let mut seen_point = false;
        let mut exponent = 0i64;
        let mut i = 0;

        if let Some(&c) = chars.first() {
            if c == '+' || c == '-' {
                negative = c == '-';
                i = 1;
            }
        }
        while i < chars.len() {
            match chars[i] {
                c @ '0'..='9' => {
                    let d = c as u8 - b'0';
                    if seen_point {
                        frac_digits.push(d);
                    } else {
                        int_digits.push(d);
                    }
                }
                '.' if !seen_point => seen_point = true,
                'e' | 'E' if allow_exponent && !(int_digits.is_empty() && frac_digits.is_empty()) => {
                    exponent = parse_exponent(&chars, i + 1)?;
                    i = chars.len();
                    break;
                }
                _ => return Err(i),
            }
            i += 1;
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(i);
        }

        let mut scale = frac_digits.len() as i64 - exponent;
        let mut digits = int_digits;
        digits.extend(frac_digits);
        if scale < 0 {
            digits.extend(std::iter::repeat(0).take((-scale) as usize));
            scale = 0;
        }
        Ok(Self::from_digits(negative, digits, scale as u32))
    }

    pub fn from_i64(n: i64) -> Self {
        let digits = n.unsigned_abs().to_string().bytes().map(|b| b - b'0').collect();
        Self::from_digits(n < 0, digits, 0)
    }

    /// Shortest decimal that reads back as `f`; `None` for NaN and infinities.
    pub fn from_f64(f: f64) -> Option<Self> {
        if !f.is_finite() {
            return None;
        }
        // `Display` for f64 never uses exponent notation.
        Self::parse(&f.to_string()).ok()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.digits.iter().all(|&d| d == 0)
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Coefficient digits, most significant first.
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// Number of significant digits before the decimal point.
    pub fn integer_digits(&self) -> usize {
        let int_len = self.digits.len() - self.scale as usize;
        if int_len == 1 && self.digits[0] == 0 {
            0
        } else {
            int_len
        }
    }

    /// Pads or cuts the fraction to exactly `target` digits.
    ///
    /// Cutting only drops zeros unless `truncate` is set, in which case the
    /// value is truncated toward zero. Returns `None` when non-zero digits
    /// would be lost without `truncate`.
    pub fn rescale(&self, target: u32, truncate: bool) -> Option<Self> {
        let mut digits = self.digits.clone();
        if target >= self.scale {
            digits.extend(std::iter::repeat(0).take((target - self.scale) as usize));
        } else {
            let cut = digits.len() - (self.scale - target) as usize;
            if !truncate && digits[cut..].iter().any(|&d| d != 0) {
                return None;
            }
            digits.truncate(cut);
        }
        Some(Self::from_digits(self.negative, digits, target))
    }

    /// Nearest double, via correctly-rounded string parsing; `None` when the
    /// value lies outside the finite double range.
    pub fn to_f64(&self) -> Option<f64> {
        self.to_string()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
    }
}

fn parse_exponent(chars: &[char], start: usize) -> Result<i64, usize> {
    let mut i = start;
    let mut negative = false;
    if let Some(&c) = chars.get(i) {
        if c == '+' || c == '-' {
            negative = c == '-';
            i += 1;
        }
    }
    if i == chars.len() {
        return Err(i);
    }
    let mut value = 0i64;
    while i < chars.len() {
        let d = chars[i].to_digit(10).ok_or(i)? as i64;
        value = value * 10 + d;
        if value > MAX_EXPONENT {
            return Err(start);
        }
        i += 1;
    }
    Ok(if negative { -value } else { value })
}

impl fmt::Display for CanonicalDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let int_len = self.digits.len() - self.scale as usize;
        for d in &self.digits[..int_len] {
            write!(f, "{d}")?;
        }
        if self.scale > 0 {
            f.write_str(".")?;
            for d in &self.digits[int_len..] {
                write!(f, "{d}")?;
            }
        }
        Ok(())
    }
}

/// Classifies a host value and converts it to a [`CanonicalDecimal`].
///
/// Native numbers, numeric strings and decimal objects are accepted; any
/// other kind is a type mismatch. Numeric strings are validated strictly and
/// report the position of the first invalid character.
pub fn normalize_numeric(
    value: &HostValue,
    field: &FieldDescriptor,
) -> Result<CanonicalDecimal, ConversionError> {
    match value {
        HostValue::Integer(n) => Ok(CanonicalDecimal::from_i64(*n)),
        HostValue::Float(f) => {
            CanonicalDecimal::from_f64(*f).ok_or_else(|| ConversionError::non_finite(field, *f))
        }
        HostValue::Str(s) => {
            CanonicalDecimal::parse(s).map_err(|pos| ConversionError::invalid_string(field, s, pos))
        }
        HostValue::Decimal(s) => CanonicalDecimal::parse_scientific(s)
            .map_err(|pos| ConversionError::invalid_string(field, s, pos)),
        _ => Err(ConversionError::type_mismatch(field, NUMBER_EXPECTED)),
    }
}
