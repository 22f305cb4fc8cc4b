//! Builds field sets from column descriptors

use chrono::{Local, NaiveDateTime};
use madang_core::{ColumnDescriptor, Record, Value};

use crate::field::FormField;
use crate::field_set::FieldSet;

/// Creates one field per column, widget chosen by declared type.
///
/// The id column (matched ignoring case) is read-only.
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    default_date: Option<NaiveDateTime>,
}

impl FormBuilder {
    /// Date pickers without a value start at the current local time
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed starting date for date pickers
    pub fn with_default_date(mut self, date: NaiveDateTime) -> Self {
        self.default_date = Some(date);
        self
    }

    /// Fields for `columns`, pre-filled from `existing` where it has a value.
    ///
    /// Pass an empty `id_column` for a form without an id field.
    pub fn build_fields(
        &self,
        columns: &[ColumnDescriptor],
        existing: Option<&Record>,
        id_column: &str,
    ) -> FieldSet {
        let default_date = self
            .default_date
            .unwrap_or_else(|| Local::now().naive_local());

        let fields = columns
            .iter()
            .map(|column| {
                let is_id = !id_column.is_empty() && column.is_named(id_column);
                let mut field =
                    FormField::new(&column.name, column.declared_type, is_id, default_date);
                if let Some((_, value)) = existing.and_then(|r| r.get_ignore_case(&column.name)) {
                    field.fill(value);
                }
                field
            })
            .collect();

        FieldSet::new(fields)
    }

    /// Fields for a new row, the id pre-populated with `next_id`
    pub fn build_insert_fields(
        &self,
        columns: &[ColumnDescriptor],
        id_column: &str,
        next_id: i64,
    ) -> FieldSet {
        let existing = Record::new().with(id_column, Value::Int64(next_id));
        self.build_fields(columns, Some(&existing), id_column)
    }
}
