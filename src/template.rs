// ABOUTME: Templates: ordered, deduplicated lists of field mappings.
// ABOUTME: Duplicate members and duplicate wire keys are rejected when a field is added.

use crate::error::{Error, Result};
use crate::field::Field;
use crate::record::Record;
use crate::serializer::Serializer;

/// A reusable wire schema: fields in insertion order.
///
/// No two fields share a member name or a wire key. Bind a template to a
/// record type with [`Template::bind`] or [`Serializer::bind`].
#[derive(Debug, Clone, Default)]
pub struct Template {
    fields: Vec<Field>,
}

impl Template {
    /// An empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a template from a fixed list, stopping at the first duplicate.
    pub fn from_fields<I: IntoIterator<Item = Field>>(fields: I) -> Result<Self> {
        let mut template = Self::new();
        for field in fields {
            template.add(field)?;
        }
        Ok(template)
    }

    /// Append `field`.
    ///
    /// Fails with `DuplicateField` if its member is already mapped and with
    /// `DuplicateWireName` if its wire key is already used; the template is
    /// unchanged in both cases.
    pub fn add(&mut self, field: Field) -> Result<()> {
        if self.get(field.member()).is_some() {
            return Err(Error::DuplicateField {
                member: field.member().to_owned(),
            });
        }
        if self.contains_wire(field.wire()) {
            return Err(Error::DuplicateWireName {
                member: field.member().to_owned(),
                wire: field.wire().to_owned(),
            });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, field: Field) -> Result<Self> {
        self.add(field)?;
        Ok(self)
    }

    /// Bind this template to `R`.
    pub fn bind<R: Record>(&self) -> Result<Serializer> {
        Serializer::bind::<R>(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// The field mapping `member`, if any.
    #[must_use]
    pub fn get(&self, member: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.member() == member)
    }

    /// Whether some field writes the wire key `wire`.
    #[must_use]
    pub fn contains_wire(&self, wire: &str) -> bool {
        self.fields.iter().any(|f| f.wire() == wire)
    }
}

impl<'a> IntoIterator for &'a Template {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
