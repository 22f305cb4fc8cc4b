//! The fields of one editing session

use madang_core::Record;

use crate::field::{FieldKind, FormField};
use crate::validation::{FormError, ValidationError};

/// Fields in column order. Lookups by column name ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<FormField>,
}

impl FieldSet {
    pub(crate) fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, column: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.column().eq_ignore_ascii_case(column))
    }

    pub fn field_mut(&mut self, column: &str) -> Result<&mut FormField, FormError> {
        self.fields
            .iter_mut()
            .find(|f| f.column().eq_ignore_ascii_case(column))
            .ok_or_else(|| FormError::UnknownField(column.to_string()))
    }

    /// The read-only id field, if the form has one
    pub fn id_field(&self) -> Option<&FormField> {
        self.fields.iter().find(|f| f.is_id())
    }

    /// Type `text` into a field one keystroke at a time.
    ///
    /// Returns how many keystrokes were accepted.
    pub fn type_str(&mut self, column: &str, text: &str) -> Result<usize, FormError> {
        let field = self.field_mut(column)?;
        if field.is_read_only() {
            return Err(FormError::ReadOnly(field.column().to_string()));
        }
        if !matches!(field.kind(), FieldKind::Numeric | FieldKind::Text) {
            return Err(FormError::NotTextual(field.column().to_string()));
        }
        Ok(text.chars().filter(|&ch| field.type_char(ch)).count())
    }

    /// Read every field back into a record, in column order.
    ///
    /// Stops at the first invalid field.
    pub fn collect(&self) -> Result<Record, ValidationError> {
        let mut record = Record::new();
        for field in &self.fields {
            let value = field.value().inspect_err(|e| {
                tracing::debug!(field = %e.field, reason = %e.reason, "form validation failed");
            })?;
            record.insert(field.column(), value);
        }
        Ok(record)
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a FormField;
    type IntoIter = std::slice::Iter<'a, FormField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
