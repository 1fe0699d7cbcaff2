//! Schema-agnostic core for resolving change-data-capture field bitmaps.
//!
//! This crate provides the ordered field view ([`FieldTable`]), bitmap token
//! parsing ([`BitmapToken`]), and the [`resolve`] function that turns raw
//! bitmap tokens from a change event header into field-path strings.

mod bitmap;
mod error;
mod fields;
mod resolve;
mod token;

pub use bitmap::decode_bitmap;
pub use error::ResolveError;
pub use fields::{ChildSlot, FieldEntry, FieldTable};
pub use resolve::resolve;
pub use token::BitmapToken;
