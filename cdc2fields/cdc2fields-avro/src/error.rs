//! Error types for Avro schema binding and event decoding.

use cdc2fields_core::ResolveError;

/// Error returned by [`ChangeEventDecoder`](crate::ChangeEventDecoder) and
/// [`field_table_from_schema`](crate::field_table_from_schema).
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The topic schema is not usable as a change event record.
    #[error("invalid topic schema: {detail}")]
    SchemaInvalid { detail: String },

    /// A compound field's union contains a member that is neither null
    /// nor a record, so its bit-index space cannot be derived.
    #[error("unsupported union shape on field '{field}': {detail}")]
    UnsupportedUnion { field: String, detail: String },

    /// The replay id is not an 8-byte big-endian integer.
    #[error("replay id must be 8 bytes, got {len}")]
    ReplayId { len: usize },

    /// The event payload could not be decoded against the topic schema.
    #[error("failed to decode event payload")]
    PayloadDecode {
        #[source]
        source: apache_avro::Error,
    },

    /// The decoded payload is missing the change event header or one of
    /// its bitmap lists, or a list has an unexpected shape.
    #[error("malformed change event header: {detail}")]
    HeaderShape { detail: String },

    /// A header bitmap list could not be resolved to field paths.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
