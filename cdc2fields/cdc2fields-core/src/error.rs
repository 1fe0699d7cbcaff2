//! Error types for bitmap resolution.

/// Error returned by bitmap token parsing and resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A token is neither a `0x`-prefixed bitmap nor an `index-0x...`
    /// compound entry.
    #[error("malformed bitmap token '{token}': {detail}")]
    MalformedToken { token: String, detail: String },

    /// A set bit has no corresponding entry in the target field list
    /// (schema/bitmap mismatch, e.g. a stale cached schema).
    #[error("bit {index} is set but the target field list has {len} entries")]
    FieldIndexOutOfRange { index: usize, len: usize },

    /// A compound token's parent index does not name a nullable nested
    /// record field.
    #[error("invalid parent field at index {index}: {detail}")]
    InvalidParentField { index: usize, detail: String },
}
