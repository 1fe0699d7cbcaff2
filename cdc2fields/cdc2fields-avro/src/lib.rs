//! Avro binding for the cdc2fields pipeline.
//!
//! This crate builds a [`FieldTable`](cdc2fields_core::FieldTable) from an
//! `apache_avro::Schema`, decodes change event payloads, and rewrites the
//! `ChangeEventHeader` bitmap lists into resolved field paths via
//! [`ChangeEventDecoder`].

mod error;
mod event;
mod schema;

pub use error::EventError;
pub use event::{
    CHANGE_EVENT_HEADER, CHANGED_FIELDS, ChangeEventDecoder, DIFF_FIELDS, DecodedEvent,
    NULLED_FIELDS, RawEvent,
};
pub use schema::field_table_from_schema;
