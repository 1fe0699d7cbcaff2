//! Bitmap token parsing.

use crate::{bitmap::HEX_PREFIX, error::ResolveError};

/// A parsed bitmap token from a change event header list.
///
/// Tokens are tagged at parse time, so the ambiguity between the two wire
/// shapes is resolved once here and every token is dispatched on its own
/// tag during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitmapToken {
    /// Bitmap over the top-level field list, e.g. `0xA0`.
    TopLevel(String),
    /// Bitmap over the child slots of the field at `parent`, e.g. `1-0x80`.
    Compound { parent: usize, hex: String },
}

impl BitmapToken {
    /// Parse one raw token string.
    pub fn parse(token: &str) -> Result<Self, ResolveError> {
        if token.starts_with(HEX_PREFIX) {
            return Ok(Self::TopLevel(token.to_string()));
        }
        if let Some((index_text, hex)) = token.split_once('-') {
            let parent = index_text
                .parse::<usize>()
                .map_err(|_| malformed(token, format!("bad parent index '{index_text}'")))?;
            if !hex.starts_with(HEX_PREFIX) {
                return Err(malformed(token, "compound bitmap is missing the 0x prefix"));
            }
            return Ok(Self::Compound {
                parent,
                hex: hex.to_string(),
            });
        }
        Err(malformed(
            token,
            "expected a 0x-prefixed bitmap or an index-0x... compound entry",
        ))
    }
}

fn malformed(token: &str, detail: impl Into<String>) -> ResolveError {
    ResolveError::MalformedToken {
        token: token.to_string(),
        detail: detail.into(),
    }
}
