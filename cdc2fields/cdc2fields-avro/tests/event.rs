use apache_avro::{Schema, to_avro_datum, types::Value};
use cdc2fields_avro::{
    CHANGE_EVENT_HEADER, CHANGED_FIELDS, ChangeEventDecoder, DIFF_FIELDS, EventError, NULLED_FIELDS,
    RawEvent,
};
use cdc2fields_core::ResolveError;

/// Contact-like topic schema: the header record plus three data fields,
/// one of them a nullable compound address.
fn topic_schema() -> Schema {
    Schema::parse_str(
        r#"{
            "type": "record",
            "name": "ContactChangeEvent",
            "fields": [
                {"name": "ChangeEventHeader", "type": {
                    "type": "record",
                    "name": "ChangeEventHeader",
                    "fields": [
                        {"name": "entityName", "type": "string"},
                        {"name": "nulledFields", "type": {"type": "array", "items": "string"}},
                        {"name": "diffFields", "type": {"type": "array", "items": "string"}},
                        {"name": "changedFields", "type": {"type": "array", "items": "string"}}
                    ]
                }},
                {"name": "Name", "type": ["null", "string"], "default": null},
                {"name": "MailingAddress", "type": ["null", {
                    "type": "record",
                    "name": "Address",
                    "fields": [
                        {"name": "Street", "type": ["null", "string"], "default": null},
                        {"name": "City", "type": ["null", "string"], "default": null}
                    ]
                }], "default": null},
                {"name": "Phone", "type": ["null", "string"], "default": null}
            ]
        }"#,
    )
    .unwrap()
}

fn token_list(tokens: &[&str]) -> Value {
    Value::Array(
        tokens
            .iter()
            .map(|t| Value::String((*t).to_string()))
            .collect(),
    )
}

fn encode_payload(schema: &Schema, nulled: &[&str], diff: &[&str], changed: &[&str]) -> Vec<u8> {
    let header = Value::Record(vec![
        ("entityName".to_string(), Value::String("Contact".to_string())),
        (NULLED_FIELDS.to_string(), token_list(nulled)),
        (DIFF_FIELDS.to_string(), token_list(diff)),
        (CHANGED_FIELDS.to_string(), token_list(changed)),
    ]);
    let payload = Value::Record(vec![
        (CHANGE_EVENT_HEADER.to_string(), header),
        (
            "Name".to_string(),
            Value::Union(1, Box::new(Value::String("Jane".to_string()))),
        ),
        (
            "MailingAddress".to_string(),
            Value::Union(0, Box::new(Value::Null)),
        ),
        ("Phone".to_string(), Value::Union(0, Box::new(Value::Null))),
    ]);
    to_avro_datum(schema, payload).unwrap()
}

fn header_list<'a>(payload: &'a Value, list: &str) -> &'a [Value] {
    let Value::Record(fields) = payload else {
        panic!("payload is not a record: {payload:?}");
    };
    let (_, header) = fields
        .iter()
        .find(|(name, _)| name == CHANGE_EVENT_HEADER)
        .unwrap();
    let Value::Record(entries) = header else {
        panic!("header is not a record: {header:?}");
    };
    let (_, value) = entries.iter().find(|(name, _)| name == list).unwrap();
    let Value::Array(items) = value else {
        panic!("'{list}' is not an array: {value:?}");
    };
    items
}

fn list_as_strings(payload: &Value, list: &str) -> Vec<String> {
    header_list(payload, list)
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => panic!("expected string, got {other:?}"),
        })
        .collect()
}

#[test]
fn decodes_replay_id_and_rewrites_header_lists() {
    let schema = topic_schema();
    // Bits 1 and 3: Name and Phone. Compound: MailingAddress.Street.
    let payload = encode_payload(&schema, &[], &["2-0x40"], &["0x50"]);
    let decoder = ChangeEventDecoder::new(schema).unwrap();

    let event = RawEvent::new(vec![0, 0, 0, 0, 0, 0, 1, 5], payload);
    let decoded = decoder.decode(&event).unwrap();

    assert_eq!(decoded.replay_id, 261);
    assert!(list_as_strings(&decoded.payload, NULLED_FIELDS).is_empty());
    assert_eq!(
        list_as_strings(&decoded.payload, DIFF_FIELDS),
        vec!["MailingAddress.Street"]
    );
    assert_eq!(
        list_as_strings(&decoded.payload, CHANGED_FIELDS),
        vec!["Name", "Phone"]
    );
}

#[test]
fn non_header_fields_survive_decoding_untouched() {
    let schema = topic_schema();
    let payload = encode_payload(&schema, &[], &[], &[]);
    let decoder = ChangeEventDecoder::new(schema).unwrap();

    let decoded = decoder
        .decode(&RawEvent::new(vec![0; 8], payload))
        .unwrap();
    let Value::Record(fields) = &decoded.payload else {
        panic!("payload is not a record");
    };
    let (_, name) = fields.iter().find(|(n, _)| n == "Name").unwrap();
    match name {
        Value::Union(_, inner) => assert_eq!(**inner, Value::String("Jane".to_string())),
        other => panic!("expected union, got {other:?}"),
    }
}

#[test]
fn field_table_is_built_once_per_schema() {
    let decoder = ChangeEventDecoder::new(topic_schema()).unwrap();
    let names: Vec<&str> = decoder.fields().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![CHANGE_EVENT_HEADER, "Name", "MailingAddress", "Phone"]
    );
    assert!(decoder.fields()[2].children.is_some());
}

#[test]
fn replay_id_must_be_eight_bytes() {
    let schema = topic_schema();
    let payload = encode_payload(&schema, &[], &[], &[]);
    let decoder = ChangeEventDecoder::new(schema).unwrap();

    let err = decoder
        .decode(&RawEvent::new(vec![0, 0, 1, 5], payload))
        .unwrap_err();
    assert!(matches!(err, EventError::ReplayId { len: 4 }));
}

#[test]
fn undecodable_payload_is_a_payload_error() {
    let decoder = ChangeEventDecoder::new(topic_schema()).unwrap();
    let err = decoder
        .decode(&RawEvent::new(vec![0; 8], vec![0xFF, 0xFF, 0xFF]))
        .unwrap_err();
    assert!(matches!(err, EventError::PayloadDecode { .. }));
}

#[test]
fn malformed_token_aborts_the_event() {
    let schema = topic_schema();
    let payload = encode_payload(&schema, &[], &[], &["zzz"]);
    let decoder = ChangeEventDecoder::new(schema).unwrap();

    let err = decoder
        .decode(&RawEvent::new(vec![0; 8], payload))
        .unwrap_err();
    assert!(matches!(
        err,
        EventError::Resolve(ResolveError::MalformedToken { .. })
    ));
}

#[test]
fn stale_schema_bit_is_an_out_of_range_error() {
    let schema = topic_schema();
    // "0x02" expands to 00000010: bit 6, past the four declared fields.
    let payload = encode_payload(&schema, &["0x02"], &[], &[]);
    let decoder = ChangeEventDecoder::new(schema).unwrap();

    let err = decoder
        .decode(&RawEvent::new(vec![0; 8], payload))
        .unwrap_err();
    assert!(matches!(
        err,
        EventError::Resolve(ResolveError::FieldIndexOutOfRange { index: 6, len: 4 })
    ));
}
