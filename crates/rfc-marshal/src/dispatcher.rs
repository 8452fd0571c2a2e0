//! Conversion dispatcher: walks parameter maps, recursing into structures and
//! tables, and hands scalar fields to their codec.

use log::{debug, trace};

use crate::codec::{codec, Encoded, EncodedMap};
use crate::constants::RfcType;
use crate::descriptor::{FieldDescriptor, FunctionDescription};
use crate::encoder::encode_initial;
use crate::error::ConversionError;
use crate::host_value::{HostMap, HostValue};
use crate::options::MarshalOptions;

pub const STRUCTURE_EXPECTED: &str = "Structure";
pub const ARRAY_EXPECTED: &str = "Array";

/// Converts host parameter maps to field payloads and back.
///
/// Holds only immutable options, so one instance can be shared across
/// threads. The first failing field aborts the whole call.
#[derive(Debug, Clone, Default)]
pub struct Marshaller {
    options: MarshalOptions,
}

impl Marshaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MarshalOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MarshalOptions {
        &self.options
    }

    /// Encodes `values` in caller order. Every name must be one of
    /// `parameters`; parameters the caller leaves out are not emitted.
    pub fn encode_parameters(
        &self,
        parameters: &[FieldDescriptor],
        values: &HostMap,
    ) -> Result<EncodedMap, ConversionError> {
        let mut out = EncodedMap::with_capacity(values.len());
        for (name, value) in values {
            let field = parameters
                .iter()
                .find(|p| &p.name == name)
                .ok_or_else(|| ConversionError::unknown_field(name))
                .map_err(failed)?;
            let encoded = self.encode_field(field, value).map_err(failed)?;
            out.insert(name.clone(), encoded);
        }
        Ok(out)
    }

    pub fn encode_function(
        &self,
        function: &FunctionDescription,
        values: &HostMap,
    ) -> Result<EncodedMap, ConversionError> {
        trace!("encode {} ({} values)", function.name, values.len());
        self.encode_parameters(&function.parameters, values)
    }

    /// Encodes one field, recursing into structures and tables.
    pub fn encode_field(
        &self,
        field: &FieldDescriptor,
        value: &HostValue,
    ) -> Result<Encoded, ConversionError> {
        trace!("validating {} ({})", field.name, field.rfc_type);
        let Some(codec) = codec(field.rfc_type) else {
            return if field.rfc_type == RfcType::Table {
                self.encode_table(field, value).map(Encoded::Table)
            } else {
                self.encode_structure(field, value).map(Encoded::Structure)
            };
        };
        let bytes = codec.encode(value, field, &self.options)?;
        trace!("encoded {} into {} bytes", field.name, bytes.len());
        Ok(Encoded::Field(bytes))
    }

    fn encode_structure(
        &self,
        field: &FieldDescriptor,
        value: &HostValue,
    ) -> Result<EncodedMap, ConversionError> {
        match value {
            HostValue::Object(row) => self.encode_row(field, row),
            HostValue::Null => Ok(initial_row(field)),
            _ => Err(ConversionError::type_mismatch(field, STRUCTURE_EXPECTED)),
        }
    }

    /// Validates supplied fields in caller order, then lays the row out in
    /// line-type order with initial values for the fields left out.
    fn encode_row(
        &self,
        field: &FieldDescriptor,
        row: &HostMap,
    ) -> Result<EncodedMap, ConversionError> {
        let mut supplied = EncodedMap::with_capacity(row.len());
        for (name, value) in row {
            let line = field
                .field(name)
                .ok_or_else(|| ConversionError::unknown_field(name))?;
            supplied.insert(name.clone(), self.encode_field(line, value)?);
        }
        Ok(field
            .fields
            .iter()
            .map(|line| {
                let encoded = supplied
                    .swap_remove(line.name.as_str())
                    .unwrap_or_else(|| initial(line));
                (line.name.clone(), encoded)
            })
            .collect())
    }

    fn encode_table(
        &self,
        field: &FieldDescriptor,
        value: &HostValue,
    ) -> Result<Vec<EncodedMap>, ConversionError> {
        match value {
            HostValue::Array(rows) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    self.encode_structure(field, row)
                        .map_err(|e| self.at_row(e, i))
                })
                .collect(),
            HostValue::Null => Ok(Vec::new()),
            _ => Err(ConversionError::type_mismatch(field, ARRAY_EXPECTED)),
        }
    }

    /// Decodes a payload map. Every name must be one of `parameters`.
    pub fn decode_parameters(
        &self,
        parameters: &[FieldDescriptor],
        payload: &EncodedMap,
    ) -> Result<HostMap, ConversionError> {
        let mut out = HostMap::with_capacity(payload.len());
        for (name, encoded) in payload {
            let field = parameters
                .iter()
                .find(|p| &p.name == name)
                .ok_or_else(|| ConversionError::unknown_field(name))
                .map_err(failed)?;
            let value = self.decode_field(field, encoded).map_err(failed)?;
            out.insert(name.clone(), value);
        }
        Ok(out)
    }

    pub fn decode_function(
        &self,
        function: &FunctionDescription,
        payload: &EncodedMap,
    ) -> Result<HostMap, ConversionError> {
        trace!("decode {} ({} values)", function.name, payload.len());
        self.decode_parameters(&function.parameters, payload)
    }

    pub fn decode_field(
        &self,
        field: &FieldDescriptor,
        encoded: &Encoded,
    ) -> Result<HostValue, ConversionError> {
        trace!("decoding {} ({})", field.name, field.rfc_type);
        match (field.rfc_type, encoded) {
            (RfcType::Structure, Encoded::Structure(row)) => {
                self.decode_row(field, row).map(HostValue::Object)
            }
            (RfcType::Table, Encoded::Table(rows)) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    self.decode_row(field, row)
                        .map(HostValue::Object)
                        .map_err(|e| self.at_row(e, i))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(HostValue::Array),
            (rfc_type, Encoded::Field(bytes)) => match codec(rfc_type) {
                Some(codec) => codec.decode(bytes, field, &self.options),
                None => Err(ConversionError::decoding(field, "unexpected field payload")),
            },
            (_, other) => Err(ConversionError::decoding(
                field,
                format!("unexpected {} payload", other.shape()),
            )),
        }
    }

    /// Decodes a row in line-type order; every line field must be present.
    fn decode_row(
        &self,
        field: &FieldDescriptor,
        row: &EncodedMap,
    ) -> Result<HostMap, ConversionError> {
        if let Some(extra) = row.keys().find(|name| field.field(name).is_none()) {
            return Err(ConversionError::unknown_field(extra));
        }
        field
            .fields
            .iter()
            .map(|line| {
                let encoded = row
                    .get(line.name.as_str())
                    .ok_or_else(|| ConversionError::decoding(line, "missing from payload"))?;
                Ok((line.name.clone(), self.decode_field(line, encoded)?))
            })
            .collect()
    }

    /// Records the innermost table row an error came from, if configured.
    fn at_row(&self, error: ConversionError, row: usize) -> ConversionError {
        if self.options.include_row_index && error.row.is_none() {
            error.with_row(row)
        } else {
            error
        }
    }
}

fn failed(error: ConversionError) -> ConversionError {
    debug!(
        "conversion failed for {} ({}, code {}): {}",
        error.field,
        error.key(),
        error.code(),
        error.message
    );
    error
}

fn initial(field: &FieldDescriptor) -> Encoded {
    match field.rfc_type {
        RfcType::Structure => Encoded::Structure(initial_row(field)),
        RfcType::Table => Encoded::Table(Vec::new()),
        _ => Encoded::Field(encode_initial(field)),
    }
}

fn initial_row(field: &FieldDescriptor) -> EncodedMap {
    field
        .fields
        .iter()
        .map(|line| (line.name.clone(), initial(line)))
        .collect()
}
