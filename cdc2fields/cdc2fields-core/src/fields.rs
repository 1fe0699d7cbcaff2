//! Ordered, read-only view over a record schema's top-level fields.

use std::ops::Deref;

/// Slot in a compound field's child bit-index space.
///
/// Union member positions are preserved: the null member of a nullable
/// union contributes a [`ChildSlot::Null`] placeholder so that record
/// members before and after it keep their bit indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildSlot {
    Null,
    Field(String),
}

/// One top-level field of a record schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    /// `Some` iff the field is compound (its union type contains at least
    /// one nested record). The slots are the bit-index domain used by
    /// compound bitmap tokens naming this field as parent.
    pub children: Option<Vec<ChildSlot>>,
}

impl FieldEntry {
    /// A plain field with no compound child index space.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: None,
        }
    }

    /// A compound field with the given child slots.
    pub fn compound(name: impl Into<String>, children: Vec<ChildSlot>) -> Self {
        Self {
            name: name.into(),
            children: Some(children),
        }
    }
}

/// Ordered field index built once per topic schema.
///
/// Index position is semantically significant: bit *i* in a top-level
/// bitmap names the field at index *i*, so the entries must keep the
/// schema's declaration order. The table is never mutated after
/// construction and is safe to share across concurrently decoded events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldTable(pub Vec<FieldEntry>);

impl FieldTable {
    pub fn new(entries: Vec<FieldEntry>) -> Self {
        Self(entries)
    }

    pub fn as_slice(&self) -> &[FieldEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
        self.0.iter()
    }
}

impl From<Vec<FieldEntry>> for FieldTable {
    fn from(value: Vec<FieldEntry>) -> Self {
        Self(value)
    }
}

impl From<FieldTable> for Vec<FieldEntry> {
    fn from(value: FieldTable) -> Self {
        value.0
    }
}

impl AsRef<[FieldEntry]> for FieldTable {
    fn as_ref(&self) -> &[FieldEntry] {
        self.as_slice()
    }
}

impl Deref for FieldTable {
    type Target = [FieldEntry];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}
