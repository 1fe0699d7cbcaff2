//! Bitmap-to-field-path resolution.

use crate::{
    bitmap::decode_bitmap,
    error::ResolveError,
    fields::{ChildSlot, FieldTable},
    token::BitmapToken,
};

/// Resolve a list of raw bitmap tokens into field-path strings.
///
/// Top-level tokens yield bare field names; compound tokens yield
/// `"<parent>.<child>"` paths. Output follows token order, with ascending
/// bit order within each token. An empty token list is the common case
/// for unchanged events and returns immediately.
///
/// Resolution is a pure function of `(fields, tokens)`; on error nothing
/// is emitted and the caller's data is untouched.
pub fn resolve<S: AsRef<str>>(
    fields: &FieldTable,
    tokens: &[S],
) -> Result<Vec<String>, ResolveError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for raw in tokens {
        match BitmapToken::parse(raw.as_ref())? {
            BitmapToken::TopLevel(hex) => resolve_top_level(fields, &hex, &mut names)?,
            BitmapToken::Compound { parent, hex } => {
                resolve_compound(fields, parent, &hex, &mut names)?;
            }
        }
    }
    Ok(names)
}

fn resolve_top_level(
    fields: &FieldTable,
    hex: &str,
    out: &mut Vec<String>,
) -> Result<(), ResolveError> {
    for index in decode_bitmap(hex)? {
        let entry = fields
            .as_slice()
            .get(index)
            .ok_or(ResolveError::FieldIndexOutOfRange {
                index,
                len: fields.as_slice().len(),
            })?;
        out.push(entry.name.clone());
    }
    Ok(())
}

fn resolve_compound(
    fields: &FieldTable,
    parent: usize,
    hex: &str,
    out: &mut Vec<String>,
) -> Result<(), ResolveError> {
    let entry = fields
        .as_slice()
        .get(parent)
        .ok_or_else(|| ResolveError::InvalidParentField {
            index: parent,
            detail: format!(
                "index is out of range for {} top-level fields",
                fields.as_slice().len()
            ),
        })?;
    let children = entry
        .children
        .as_deref()
        .ok_or_else(|| ResolveError::InvalidParentField {
            index: parent,
            detail: format!("field '{}' is not a nullable nested record", entry.name),
        })?;
    for index in decode_bitmap(hex)? {
        match children.get(index) {
            Some(ChildSlot::Field(child)) => out.push(format!("{}.{child}", entry.name)),
            // The null member's placeholder keeps positions aligned but
            // has no field to name, so a set bit there is a mismatch.
            Some(ChildSlot::Null) | None => {
                return Err(ResolveError::FieldIndexOutOfRange {
                    index,
                    len: children.len(),
                });
            }
        }
    }
    Ok(())
}
