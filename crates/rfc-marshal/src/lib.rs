//! Field-level marshaling between dynamic host values and typed RFC function
//! interfaces.
//!
//! A caller supplies parameter values as an ordered map of [`HostValue`]s
//! together with the [`FieldDescriptor`]s of the remote function. The
//! [`Marshaller`] classifies each value, validates it against the field type
//! and produces an exact byte payload ([`Encoded`]). Decoding goes the other
//! way and never routes packed decimals through floating point.
//!
//! ```
//! use indexmap::indexmap;
//! use rfc_marshal::{FieldDescriptor, HostValue, Marshaller};
//!
//! let params = vec![FieldDescriptor::bcd("IV_AMOUNT", 7, 2)];
//! let m = Marshaller::new();
//! let encoded = m
//!     .encode_parameters(&params, &indexmap! {
//!         "IV_AMOUNT".to_string() => HostValue::from("1234.5"),
//!     })
//!     .unwrap();
//! let decoded = m.decode_parameters(&params, &encoded).unwrap();
//! assert_eq!(decoded["IV_AMOUNT"], HostValue::from("1234.50"));
//! ```

mod binary;
mod constants;
mod descriptor;
mod error;
mod host_value;
mod numeric;
mod options;

pub mod codec;
pub mod decoder;
pub mod dispatcher;
pub mod encoder;

pub use binary::normalize_binary;
pub use codec::{codec, Encoded, EncodedMap, FieldCodec, TypeFamily};
pub use constants::{RfcRc, RfcType};
pub use descriptor::{FieldDescriptor, FunctionDescription};
pub use dispatcher::Marshaller;
pub use error::{ConversionError, ConversionErrorKind};
pub use host_value::{HostMap, HostValue, ValueKind};
pub use numeric::{normalize_numeric, CanonicalDecimal};
pub use options::{BcdMode, MarshalOptions};
