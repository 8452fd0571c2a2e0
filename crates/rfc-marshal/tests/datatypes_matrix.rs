use std::fs;
use std::path::Path;

use indexmap::indexmap;
use rfc_marshal::{
    BcdMode, ConversionError, ConversionErrorKind, FunctionDescription, HostMap, HostValue,
    MarshalOptions, Marshaller, RfcType,
};

fn load(name: &str) -> FunctionDescription {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let data = fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {:?}: {e}", path));
    toml::from_str(&data).unwrap_or_else(|e| panic!("failed to parse {:?}: {e}", path))
}

fn map(entries: Vec<(&str, HostValue)>) -> HostMap {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Encodes `IS_INPUT` and decodes the same payload as `ES_OUTPUT`, the way
/// the datatypes test function echoes its input.
fn echo_datatypes(m: &Marshaller, input: HostMap) -> Result<HostMap, ConversionError> {
    let desc = load("rbp_fe_datatypes.toml");
    let encoded = m.encode_function(&desc, &indexmap! {
        "IS_INPUT".to_string() => HostValue::Object(input),
    })?;
    let payload = indexmap! {
        "ES_OUTPUT".to_string() => encoded["IS_INPUT"].clone(),
    };
    let decoded = m.decode_function(&desc, &payload)?;
    Ok(decoded["ES_OUTPUT"].as_object().unwrap().clone())
}

fn invoke_structure(m: &Marshaller, row: HostMap) -> Result<(), ConversionError> {
    let desc = load("stfc_structure.toml");
    m.encode_function(&desc, &indexmap! {
        "IMPORTSTRUCT".to_string() => HostValue::Object(row.clone()),
        "RFCTABLE".to_string() => HostValue::Array(vec![HostValue::Object(row)]),
    })
    .map(|_| ())
}

#[test]
fn fixtures_load_with_line_types() {
    let desc = load("stfc_structure.toml");
    assert_eq!(desc.name, "STFC_STRUCTURE");
    let table = desc.parameter("RFCTABLE").unwrap();
    assert_eq!(table.rfc_type, RfcType::Table);
    assert_eq!(table.fields.len(), 12);
    assert_eq!(table.field("RFCHEX3").unwrap().rfc_type, RfcType::Byte);

    let desc = load("rbp_fe_datatypes.toml");
    let input = desc.parameter("IS_INPUT").unwrap();
    assert_eq!(input.field("ZQUAN_SIGN").unwrap().decimals, 3);
    assert_eq!(input.field("ZRAWSTRING").unwrap().length, 0);
}

#[test]
fn char_type_check() {
    let err = invoke_structure(
        &Marshaller::new(),
        map(vec![("RFCCHAR4", HostValue::Integer(65))]),
    )
    .unwrap_err();
    assert_eq!(err.message, "Char expected when filling field RFCCHAR4 of type 0");
    assert_eq!(err.name(), "TypeError");
}

#[test]
fn bcd_and_float_not_a_number_string() {
    let err = invoke_structure(&Marshaller::new(), map(vec![("RFCFLOAT", "A".into())])).unwrap_err();
    assert_eq!(err.code(), 22);
    assert_eq!(err.key(), "RFC_CONVERSION_FAILURE");
    assert_eq!(
        err.message,
        "Cannot convert string value A at position 0 for the field RFCFLOAT to type RFCTYPE_FLOAT"
    );
}

#[test]
fn bcd_and_float_input_numbers() {
    let input = map(vec![
        ("ZFLTP", HostValue::Float(0.123456789)),
        ("ZDEC", HostValue::Float(12345.67)),
        ("ZCURR", HostValue::Float(1234.56)),
        ("ZQUAN", HostValue::Float(12.3456)),
        ("ZQUAN_SIGN", HostValue::Float(-12.345)),
    ]);
    let out = echo_datatypes(&Marshaller::new(), input.clone()).unwrap();
    for (name, value) in &input {
        let f = value.as_f64().unwrap();
        if name == "ZFLTP" {
            assert_eq!(out[name], HostValue::Float(f));
        } else {
            assert_eq!(out[name], HostValue::Str(f.to_string()), "field {name}");
        }
    }
}

#[test]
fn bcd_and_float_input_strings() {
    let input = map(vec![
        ("ZFLTP", "0.123456789".into()),
        ("ZDEC", "12345.67".into()),
        ("ZCURR", "1234.56".into()),
        ("ZQUAN", "12.3456".into()),
        ("ZQUAN_SIGN", "-12.345".into()),
    ]);
    let out = echo_datatypes(&Marshaller::new(), input.clone()).unwrap();
    for (name, value) in &input {
        let text = value.as_str().unwrap();
        if name == "ZFLTP" {
            assert_eq!(out[name].as_f64().unwrap().to_string(), text);
        } else {
            assert_eq!(out[name], HostValue::from(text), "field {name}");
        }
    }
}

#[test]
fn bcd_and_float_input_decimals() {
    let input = map(vec![
        ("ZFLTP", HostValue::decimal("0.123456789")),
        ("ZDEC", HostValue::decimal("12345.67")),
        ("ZCURR", HostValue::decimal("1234.56")),
        ("ZQUAN", HostValue::decimal("12.3456")),
        ("ZQUAN_SIGN", HostValue::decimal("-12.345")),
    ]);
    let out = echo_datatypes(&Marshaller::new(), input).unwrap();
    assert_eq!(out["ZFLTP"], HostValue::Float(0.123456789));
    assert_eq!(out["ZDEC"], HostValue::from("12345.67"));
    assert_eq!(out["ZCURR"], HostValue::from("1234.56"));
    assert_eq!(out["ZQUAN"], HostValue::from("12.3456"));
    assert_eq!(out["ZQUAN_SIGN"], HostValue::from("-12.345"));
}

#[test]
fn decimals_beyond_double_precision_survive() {
    let input = map(vec![("ZDEC", HostValue::decimal("12345678901234567890123.45"))]);
    let out = echo_datatypes(&Marshaller::new(), input).unwrap();
    assert_eq!(out["ZDEC"], HostValue::from("12345678901234567890123.45"));
}

#[test]
fn raw_and_xstring_inputs() {
    let inputs = [
        HostValue::from("\x41\x42\x43\x44\x45\x46\x47\x48\x49\x50\x51\x52\x53\x54\x55\x56\x57"),
        HostValue::from("abcdefghijklmnopq"),
        HostValue::from(b"01234567890123456".to_vec()),
    ];
    for value in inputs {
        let expected = match &value {
            HostValue::Str(s) => s.as_bytes().to_vec(),
            HostValue::Bytes(b) => b.clone(),
            other => panic!("unexpected input {other:?}"),
        };
        let out = echo_datatypes(
            &Marshaller::new(),
            map(vec![("ZRAW", value.clone()), ("ZRAWSTRING", value)]),
        )
        .unwrap();
        assert_eq!(out["ZRAW"], HostValue::Bytes(expected.clone()));
        assert_eq!(out["ZRAWSTRING"], HostValue::Bytes(expected));
    }
}

#[test]
fn raw_rejects_wide_text_and_overflow() {
    let m = Marshaller::new();
    let err = echo_datatypes(&m, map(vec![("ZRAW", "€".into())])).unwrap_err();
    assert_eq!(err.kind, ConversionErrorKind::EncodingError);
    assert_eq!(err.code(), 21);
    let err = echo_datatypes(&m, map(vec![("ZRAW", HostValue::Bytes(vec![0; 18]))])).unwrap_err();
    assert_eq!(err.kind, ConversionErrorKind::LengthExceeded);
    assert_eq!(err.key(), "RFC_BUFFER_TOO_SMALL");
}

#[test]
fn int_type_check_detects_strings() {
    let err = invoke_structure(&Marshaller::new(), map(vec![("RFCINT1", "1".into())])).unwrap_err();
    assert_eq!(err.name(), "TypeError");
    assert_eq!(err.message, "Integer number expected when filling field RFCINT1 of type 10");
}

#[test]
fn int_type_check_detects_floats() {
    let err = invoke_structure(
        &Marshaller::new(),
        map(vec![
            ("RFCINT1", HostValue::Integer(1)),
            ("RFCINT2", HostValue::Integer(2)),
            ("RFCINT4", HostValue::Float(3.1)),
        ]),
    )
    .unwrap_err();
    assert_eq!(err.name(), "TypeError");
    assert_eq!(err.message, "Integer number expected when filling field RFCINT4 of type 8");
}

#[test]
fn structure_echo_round_trip() {
    let desc = load("stfc_structure.toml");
    let m = Marshaller::new();
    let row = map(vec![
        ("RFCFLOAT", HostValue::Float(1.5)),
        ("RFCCHAR1", "A".into()),
        ("RFCINT2", HostValue::Integer(-1234)),
        ("RFCINT1", HostValue::Integer(200)),
        ("RFCCHAR4", "ABCD".into()),
        ("RFCINT4", HostValue::Integer(123456)),
        ("RFCHEX3", HostValue::Bytes(vec![1, 2, 3])),
        ("RFCCHAR2", "XY".into()),
        ("RFCTIME", "121212".into()),
        ("RFCDATE", "20240229".into()),
        ("RFCDATA1", "data".into()),
        ("RFCDATA2", "".into()),
    ]);
    let encoded = m
        .encode_function(&desc, &indexmap! {
            "IMPORTSTRUCT".to_string() => HostValue::Object(row.clone()),
        })
        .unwrap();
    let decoded = m
        .decode_function(&desc, &indexmap! {
            "ECHOSTRUCT".to_string() => encoded["IMPORTSTRUCT"].clone(),
        })
        .unwrap();
    assert_eq!(decoded["ECHOSTRUCT"], HostValue::Object(row));
}

#[test]
fn table_errors_carry_row_index_when_configured() {
    let desc = load("stfc_structure.toml");
    let rows = HostValue::Array(vec![
        HostValue::Object(map(vec![("RFCINT2", HostValue::Integer(1))])),
        HostValue::Object(map(vec![("RFCINT2", HostValue::Integer(40000))])),
    ]);
    let values = indexmap! { "RFCTABLE".to_string() => rows };

    let err = Marshaller::new().encode_function(&desc, &values).unwrap_err();
    assert_eq!(err.row(), None);

    let m = Marshaller::with_options(MarshalOptions {
        include_row_index: true,
        ..MarshalOptions::default()
    });
    let indexed = m.encode_function(&desc, &values).unwrap_err();
    assert_eq!(indexed.row(), Some(1));
    assert_eq!(indexed.field(), "RFCINT2");
    assert_eq!(indexed.kind, ConversionErrorKind::LengthExceeded);
    assert_eq!(indexed.message, err.message);
}

#[test]
fn unknown_parameter_is_rejected() {
    let desc = load("rbp_fe_datatypes.toml");
    let err = Marshaller::new()
        .encode_function(&desc, &indexmap! {
            "IS_UNKNOWN".to_string() => HostValue::Null,
        })
        .unwrap_err();
    assert_eq!(err.kind, ConversionErrorKind::UnknownField);
    assert_eq!(err.key(), "RFC_NOT_FOUND");
}

#[test]
fn omitted_fields_decode_as_initial_values() {
    let out = echo_datatypes(&Marshaller::new(), map(vec![("ZDEC", HostValue::Null)])).unwrap();
    assert_eq!(out["ZDEC"], HostValue::from("0.00"));
    assert_eq!(out["ZQUAN"], HostValue::from("0.0000"));
    assert_eq!(out["ZFLTP"], HostValue::Float(0.0));
    assert_eq!(out["ZRAW"], HostValue::Bytes(vec![0; 17]));
    assert_eq!(out["ZRAWSTRING"], HostValue::Bytes(vec![]));
    assert_eq!(out["ZSTRING"], HostValue::from(""));
    assert_eq!(out["ZNUMC"], HostValue::from("0000000000"));
}

#[test]
fn string_and_numc_shapes() {
    let out = echo_datatypes(
        &Marshaller::new(),
        map(vec![("ZSTRING", "trailing  ".into()), ("ZNUMC", "42".into())]),
    )
    .unwrap();
    assert_eq!(out["ZSTRING"], HostValue::from("trailing  "));
    assert_eq!(out["ZNUMC"], HostValue::from("0000000042"));
}

#[test]
fn bcd_excess_scale_is_cut_unless_strict() {
    let out = echo_datatypes(
        &Marshaller::new(),
        map(vec![
            ("ZCURR", "1.239".into()),
            ("ZDEC", HostValue::Float(0.1 + 0.2)),
            ("ZQUAN_SIGN", HostValue::decimal("-12.3459")),
        ]),
    )
    .unwrap();
    assert_eq!(out["ZCURR"], HostValue::from("1.23"));
    assert_eq!(out["ZDEC"], HostValue::from("0.30"));
    assert_eq!(out["ZQUAN_SIGN"], HostValue::from("-12.345"));

    let strict = Marshaller::with_options(MarshalOptions {
        strict_scale: true,
        ..MarshalOptions::default()
    });
    let err = echo_datatypes(&strict, map(vec![("ZCURR", "1.234".into())])).unwrap_err();
    assert_eq!(err.kind, ConversionErrorKind::LengthExceeded);
    assert_eq!(err.code(), 23);
    let out = echo_datatypes(&strict, map(vec![("ZCURR", "1.230".into())])).unwrap();
    assert_eq!(out["ZCURR"], HostValue::from("1.23"));
}

#[test]
fn float_text_beyond_double_range_fails() {
    let huge = format!("1{}", "0".repeat(400));
    let m = Marshaller::new();
    let err = echo_datatypes(&m, map(vec![("ZFLTP", HostValue::from(huge.as_str()))])).unwrap_err();
    assert_eq!(err.key(), "RFC_CONVERSION_FAILURE");
    assert_eq!(err.field(), "ZFLTP");
    let err = echo_datatypes(&m, map(vec![("ZFLTP", HostValue::decimal("1e400"))])).unwrap_err();
    assert_eq!(err.code(), 22);
    assert_eq!(
        err.message,
        "Cannot convert number value 1e400 for the field ZFLTP to type RFCTYPE_FLOAT"
    );
}

#[test]
fn bcd_number_mode() {
    let m = Marshaller::with_options(MarshalOptions {
        bcd: BcdMode::Number,
        ..MarshalOptions::default()
    });
    let out = echo_datatypes(&m, map(vec![("ZCURR", "1234.56".into())])).unwrap();
    assert_eq!(out["ZCURR"], HostValue::Float(1234.56));
}

#[test]
fn decoded_values_convert_to_json() {
    let out = echo_datatypes(&Marshaller::new(), map(vec![("ZCURR", HostValue::Integer(7))])).unwrap();
    let json = serde_json::Value::from(out["ZCURR"].clone());
    assert_eq!(json, serde_json::json!("7.00"));
}
