//! Topic-local change event decoding: replay id, payload decode, header
//! bitmap rewrite.

use apache_avro::{Schema, from_avro_datum, types::Value};
use cdc2fields_core::{FieldTable, resolve};

use crate::{error::EventError, schema::field_table_from_schema};

/// Record field holding the change metadata bitmaps.
pub const CHANGE_EVENT_HEADER: &str = "ChangeEventHeader";
/// Header list naming fields set to null by the change.
pub const NULLED_FIELDS: &str = "nulledFields";
/// Header list naming fields whose value is delivered as a diff.
pub const DIFF_FIELDS: &str = "diffFields";
/// Header list naming fields modified by the change.
pub const CHANGED_FIELDS: &str = "changedFields";

const HEADER_LISTS: [&str; 3] = [NULLED_FIELDS, DIFF_FIELDS, CHANGED_FIELDS];

/// One raw event as delivered by the streaming collaborator.
#[derive(Debug, Clone)]
pub struct RawEvent {
    /// Big-endian 64-bit stream position marker.
    pub replay_id: Vec<u8>,
    /// Avro-encoded payload (single datum, no container framing).
    pub payload: Vec<u8>,
}

impl RawEvent {
    pub fn new(replay_id: impl Into<Vec<u8>>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            replay_id: replay_id.into(),
            payload: payload.into(),
        }
    }
}

/// A decoded change event with resolved header field lists.
#[derive(Debug)]
pub struct DecodedEvent {
    pub replay_id: u64,
    pub payload: Value,
}

/// Topic-local change event decoder.
///
/// Built once per topic schema and reused for every event on that topic.
/// Holds no per-event state, so a shared reference can decode events
/// concurrently.
pub struct ChangeEventDecoder {
    schema: Schema,
    fields: FieldTable,
}

impl ChangeEventDecoder {
    pub fn new(schema: Schema) -> Result<Self, EventError> {
        let fields = field_table_from_schema(&schema)?;
        Ok(Self { schema, fields })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    /// Decode one raw event.
    ///
    /// The returned payload is the decoded value tree with the three
    /// header bitmap lists replaced by resolved field paths. A failure in
    /// any list aborts the whole event; the header is never partially
    /// rewritten.
    pub fn decode(&self, event: &RawEvent) -> Result<DecodedEvent, EventError> {
        let replay_id = decode_replay_id(&event.replay_id)?;
        let mut reader = event.payload.as_slice();
        let mut payload = from_avro_datum(&self.schema, &mut reader, None)
            .map_err(|source| EventError::PayloadDecode { source })?;
        self.rewrite_header(&mut payload)?;
        Ok(DecodedEvent { replay_id, payload })
    }

    fn rewrite_header(&self, payload: &mut Value) -> Result<(), EventError> {
        let header = change_event_header(payload)?;

        // Resolve all three lists before touching any of them.
        let mut resolved = Vec::with_capacity(HEADER_LISTS.len());
        for list in HEADER_LISTS {
            let tokens = bitmap_tokens(header, list)?;
            resolved.push(resolve(&self.fields, &tokens)?);
        }
        for (list, names) in HEADER_LISTS.into_iter().zip(resolved) {
            let slot = header_list_mut(header, list)?;
            *slot = Value::Array(names.into_iter().map(Value::String).collect());
        }
        Ok(())
    }
}

fn decode_replay_id(bytes: &[u8]) -> Result<u64, EventError> {
    let bytes: [u8; 8] = bytes
        .try_into()
        .map_err(|_| EventError::ReplayId { len: bytes.len() })?;
    Ok(u64::from_be_bytes(bytes))
}

/// Locate the `ChangeEventHeader` record inside the decoded payload,
/// unwrapping one union layer if the schema declares the header nullable.
fn change_event_header(payload: &mut Value) -> Result<&mut Vec<(String, Value)>, EventError> {
    let Value::Record(fields) = payload else {
        return Err(EventError::HeaderShape {
            detail: "payload is not a record".to_string(),
        });
    };
    let (_, header) = fields
        .iter_mut()
        .find(|(name, _)| name.as_str() == CHANGE_EVENT_HEADER)
        .ok_or_else(|| EventError::HeaderShape {
            detail: format!("payload has no '{CHANGE_EVENT_HEADER}' field"),
        })?;
    let header = match header {
        Value::Union(_, inner) => inner.as_mut(),
        other => other,
    };
    match header {
        Value::Record(entries) => Ok(entries),
        _ => Err(EventError::HeaderShape {
            detail: format!("'{CHANGE_EVENT_HEADER}' is not a record"),
        }),
    }
}

fn bitmap_tokens(header: &[(String, Value)], list: &str) -> Result<Vec<String>, EventError> {
    let (_, value) = header
        .iter()
        .find(|(name, _)| name.as_str() == list)
        .ok_or_else(|| EventError::HeaderShape {
            detail: format!("header has no '{list}' list"),
        })?;
    let Value::Array(items) = unwrap_union(value) else {
        return Err(EventError::HeaderShape {
            detail: format!("'{list}' is not an array"),
        });
    };
    items
        .iter()
        .map(|item| match unwrap_union(item) {
            Value::String(token) => Ok(token.clone()),
            _ => Err(EventError::HeaderShape {
                detail: format!("'{list}' contains a non-string entry"),
            }),
        })
        .collect()
}

fn header_list_mut<'a>(
    header: &'a mut Vec<(String, Value)>,
    list: &str,
) -> Result<&'a mut Value, EventError> {
    header
        .iter_mut()
        .find(|(name, _)| name.as_str() == list)
        .map(|(_, value)| value)
        .ok_or_else(|| EventError::HeaderShape {
            detail: format!("header has no '{list}' list"),
        })
}

fn unwrap_union(value: &Value) -> &Value {
    match value {
        Value::Union(_, inner) => inner,
        other => other,
    }
}
