//! Table browsing session
//!
//! Drives the table selector, the grid, and the add/edit dialogs on top of a
//! [`TableGateway`]. Every outcome the user should see goes through the
//! notifier; nothing is retried.

use madang_core::{ColumnDescriptor, DeclaredType, Record, Value};
use madang_forms::{FieldSet, FormBuilder};
use madang_services::{ErrorKind, GatewayError, TableGateway};

use crate::notify::{Notification, Notifier};

/// The table currently shown in the grid
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub table: String,
    pub id_column: String,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Record>,
}

impl TableView {
    pub fn id_of(&self, row_index: usize) -> Option<&Value> {
        self.rows
            .get(row_index)
            .and_then(|row| row.get_ignore_case(&self.id_column))
            .map(|(_, value)| value)
    }

    fn has_integer_id(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.is_named(&self.id_column) && c.declared_type == DeclaredType::Integer)
    }
}

pub struct TableBrowser<N: Notifier> {
    gateway: TableGateway,
    notifier: N,
    forms: FormBuilder,
    current: Option<TableView>,
}

impl<N: Notifier> TableBrowser<N> {
    pub fn new(gateway: TableGateway, notifier: N) -> Self {
        Self {
            gateway,
            notifier,
            forms: FormBuilder::new(),
            current: None,
        }
    }

    pub fn with_form_builder(mut self, forms: FormBuilder) -> Self {
        self.forms = forms;
        self
    }

    pub fn gateway_mut(&mut self) -> &mut TableGateway {
        &mut self.gateway
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn current(&self) -> Option<&TableView> {
        self.current.as_ref()
    }

    /// Tables for the selector; empty (after notifying) when unavailable
    pub fn tables(&mut self) -> Vec<String> {
        match self.gateway.list_tables() {
            Ok(tables) => tables,
            Err(e) => {
                self.report("Loading tables", &e);
                Vec::new()
            }
        }
    }

    /// Show a table in the grid, or the placeholder state for `None`.
    ///
    /// Returns whether a grid is loaded.
    #[tracing::instrument(skip(self))]
    pub fn select_table(&mut self, table: Option<&str>) -> bool {
        let Some(table) = table else {
            self.current = None;
            return false;
        };

        match self.load(table) {
            Ok(view) => {
                tracing::debug!(table = %view.table, rows = view.rows.len(), "table loaded");
                self.current = Some(view);
                true
            }
            Err(e) => {
                self.current = None;
                self.report(&format!("Loading table '{}'", table), &e);
                false
            }
        }
    }

    /// Reload the current table's rows
    pub fn reload(&mut self) -> bool {
        match self.current.as_ref().map(|view| view.table.clone()) {
            Some(table) => self.select_table(Some(&table)),
            None => false,
        }
    }

    /// Form for a new row of the current table.
    ///
    /// Integer ids are pre-filled with the next free value and read-only;
    /// other ids are typed by the user.
    pub fn begin_add(&mut self) -> Option<FieldSet> {
        let Some(view) = self.current.as_ref() else {
            self.notify_no_table();
            return None;
        };
        if !view.has_integer_id() {
            return Some(self.forms.build_fields(&view.columns, None, ""));
        }

        match self.gateway.max_id(&view.table, &view.id_column) {
            Ok(max) => match max.checked_add(1) {
                Some(next_id) => Some(
                    self.forms
                        .build_insert_fields(&view.columns, &view.id_column, next_id),
                ),
                None => {
                    tracing::warn!(table = %view.table, max_id = max, "no id left for a new row");
                    self.notifier.notify(Notification::warning(
                        "Cannot add row",
                        format!("'{}' has no id left after {}.", view.table, max),
                    ));
                    None
                }
            },
            Err(e) => {
                self.report("Preparing a new row", &e);
                None
            }
        }
    }

    /// Validate and insert a new row. `false` keeps the dialog open.
    #[tracing::instrument(skip(self, form))]
    pub fn submit_add(&mut self, form: &FieldSet) -> bool {
        let Some(table) = self.current.as_ref().map(|view| view.table.clone()) else {
            self.notify_no_table();
            return false;
        };
        let Some(record) = self.collect(form) else {
            return false;
        };
        if !self.references_exist(&table, &record) {
            return false;
        }

        match self.gateway.insert(&table, &record) {
            Ok(true) => {
                self.notifier
                    .notify(Notification::info("Row added", format!("Added a row to {}.", table)));
                self.reload();
                true
            }
            Ok(false) => {
                self.notifier
                    .notify(Notification::warning("Nothing added", format!("No row was added to {}.", table)));
                false
            }
            Err(e) => {
                self.report("Adding a row", &e);
                false
            }
        }
    }

    /// Form pre-filled with a grid row
    pub fn begin_edit(&mut self, row_index: usize) -> Option<FieldSet> {
        let Some(view) = self.current.as_ref() else {
            self.notify_no_table();
            return None;
        };
        match view.rows.get(row_index) {
            Some(row) => Some(self.forms.build_fields(&view.columns, Some(row), &view.id_column)),
            None => {
                let message = format!("Row {} does not exist.", row_index + 1);
                self.notifier.notify(Notification::warning("No such row", message));
                None
            }
        }
    }

    /// Validate and write back an edited row. `false` keeps the dialog open.
    #[tracing::instrument(skip(self, form))]
    pub fn submit_edit(&mut self, form: &FieldSet) -> bool {
        let Some((table, id_column)) = self
            .current
            .as_ref()
            .map(|view| (view.table.clone(), view.id_column.clone()))
        else {
            self.notify_no_table();
            return false;
        };
        let Some(record) = self.collect(form) else {
            return false;
        };
        if !self.references_exist(&table, &record) {
            return false;
        }

        match self.gateway.update(&table, &id_column, &record) {
            Ok(true) => {
                self.notifier
                    .notify(Notification::info("Row updated", format!("Updated a row of {}.", table)));
                self.reload();
                true
            }
            Ok(false) => {
                self.notifier.notify(Notification::warning(
                    "Nothing updated",
                    format!("No row of {} matched the edited id.", table),
                ));
                false
            }
            Err(e) => {
                self.report("Updating a row", &e);
                false
            }
        }
    }

    /// Write back rows edited in the grid; returns how many were updated
    #[tracing::instrument(skip(self, records), fields(count = records.len()))]
    pub fn save_modified_rows(&mut self, records: &[Record]) -> usize {
        let Some((table, id_column)) = self
            .current
            .as_ref()
            .map(|view| (view.table.clone(), view.id_column.clone()))
        else {
            self.notify_no_table();
            return 0;
        };

        let mut updated = 0;
        for record in records {
            match self.gateway.update(&table, &id_column, record) {
                Ok(true) => updated += 1,
                Ok(false) => tracing::warn!(table = %table, "modified row matched nothing"),
                Err(e) => self.report("Saving a modified row", &e),
            }
        }

        self.notifier.notify(Notification::info(
            "Changes saved",
            format!("{} row(s) updated.", updated),
        ));
        if updated > 0 {
            self.reload();
        }
        updated
    }

    /// Delete a grid row by its id
    #[tracing::instrument(skip(self))]
    pub fn delete_row(&mut self, row_index: usize) -> bool {
        let Some(view) = self.current.as_ref() else {
            self.notify_no_table();
            return false;
        };
        let Some(id) = view.id_of(row_index).cloned() else {
            let message = format!("Row {} does not exist.", row_index + 1);
            self.notifier.notify(Notification::warning("No such row", message));
            return false;
        };
        let (table, id_column) = (view.table.clone(), view.id_column.clone());

        match self.gateway.delete(&table, &id_column, &id) {
            Ok(true) => {
                self.notifier
                    .notify(Notification::info("Row deleted", format!("Deleted {} = {}.", id_column, id)));
                self.reload();
                true
            }
            Ok(false) => {
                self.notifier.notify(Notification::warning(
                    "Nothing deleted",
                    format!("No row of {} has {} = {}.", table, id_column, id),
                ));
                self.reload();
                false
            }
            Err(e) => {
                self.report("Deleting a row", &e);
                false
            }
        }
    }

    fn load(&mut self, table: &str) -> Result<TableView, GatewayError> {
        let table = self.gateway.resolve_table(table)?;
        let columns = self.gateway.column_types(&table)?;
        let id_column = self.gateway.primary_key(&table)?;
        let result = self.gateway.fetch_all(&table)?;

        Ok(TableView {
            table,
            id_column,
            columns,
            rows: result.records(),
        })
    }

    fn notify_no_table(&mut self) {
        self.notifier
            .notify(Notification::warning("No table selected", "Select a table first."));
    }

    fn collect(&mut self, form: &FieldSet) -> Option<Record> {
        match form.collect() {
            Ok(record) => Some(record),
            Err(e) => {
                self.notifier.notify(Notification::warning(
                    "Invalid input",
                    format!("Check the '{}' field: {}.", e.field, e.reason),
                ));
                None
            }
        }
    }

    /// Every non-null reference in `record` must point at an existing row
    fn references_exist(&mut self, table: &str, record: &Record) -> bool {
        let keys = match self.gateway.foreign_keys(table) {
            Ok(keys) => keys,
            Err(e) => {
                self.report("Checking references", &e);
                return false;
            }
        };

        for key in keys {
            let Some((column, value)) = record.get_ignore_case(&key.column) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            match self
                .gateway
                .row_exists(&key.referenced_table, &key.referenced_column, value)
            {
                Ok(true) => {}
                Ok(false) => {
                    self.notifier.notify(Notification::warning(
                        "Invalid input",
                        format!(
                            "Check the '{}' field: no {} row has {} = {}.",
                            column, key.referenced_table, key.referenced_column, value
                        ),
                    ));
                    return false;
                }
                Err(e) => {
                    self.report("Checking references", &e);
                    return false;
                }
            }
        }
        true
    }

    fn report(&mut self, action: &str, error: &GatewayError) {
        tracing::error!(action = %action, error = %error, "gateway operation failed");
        let notification = match error.kind() {
            ErrorKind::Connection => Notification::error(
                "Database connection failed",
                format!("{}: {}", action, error),
            ),
            ErrorKind::Statement => {
                Notification::error("Database error", format!("{}: {}", action, error))
            }
            ErrorKind::Schema => {
                Notification::error("Unknown table or column", format!("{}: {}", action, error))
            }
            ErrorKind::Validation => {
                Notification::warning("Invalid input", format!("{}: {}", action, error))
            }
        };
        self.notifier.notify(notification);
    }
}
