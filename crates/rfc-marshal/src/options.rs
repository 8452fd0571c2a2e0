//! Marshaller configuration.

use serde::{Deserialize, Serialize};

/// Host shape produced when decoding BCD fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BcdMode {
    /// Exact decimal string, e.g. `"1234.56"`.
    #[default]
    String,
    /// Native float; loses precision beyond ~15 significant digits.
    Number,
}

/// Options for the marshaller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshalOptions {
    /// Strip trailing spaces when decoding CHAR fields.
    pub rstrip: bool,
    pub bcd: BcdMode,
    /// Record the table row index in [`ConversionError::row`](crate::ConversionError).
    pub include_row_index: bool,
    /// Fail on fractional digits beyond a BCD field's declared decimals
    /// instead of cutting them toward zero. Zero digits are always dropped.
    pub strict_scale: bool,
    /// Length ceiling for STRING/XSTRING fields whose description declares
    /// no maximum.
    pub max_variable_length: usize,
}

impl Default for MarshalOptions {
    fn default() -> Self {
        Self {
            rstrip: true,
            bcd: BcdMode::String,
            include_row_index: false,
            strict_scale: false,
            max_variable_length: 0x7FFF_FFFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let opts: MarshalOptions =
            serde_json::from_str(r#"{"bcd": "number", "include_row_index": true}"#).unwrap();
        assert_eq!(opts.bcd, BcdMode::Number);
        assert!(opts.include_row_index);
        assert!(opts.rstrip);
        assert!(!opts.strict_scale);
        assert_eq!(opts.max_variable_length, 0x7FFF_FFFF);
    }
}
