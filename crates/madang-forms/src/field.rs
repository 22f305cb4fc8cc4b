//! A single typed input field

use chrono::NaiveDateTime;
use madang_core::{DeclaredType, Value};

use crate::numeric_input::{self, BACKSPACE};
use crate::validation::{ValidationError, ValidationReason};

/// Widget used for a column, chosen by its declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Checkbox,
    DatePicker,
    /// Text field that only accepts digits and one decimal separator
    Numeric,
    Text,
}

impl FieldKind {
    pub fn for_type(declared_type: DeclaredType) -> Self {
        match declared_type {
            DeclaredType::Boolean => FieldKind::Checkbox,
            DeclaredType::DateTime => FieldKind::DatePicker,
            DeclaredType::Integer | DeclaredType::Decimal => FieldKind::Numeric,
            DeclaredType::Text => FieldKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Input {
    Checked(bool),
    Date(NaiveDateTime),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    column: String,
    declared_type: DeclaredType,
    kind: FieldKind,
    is_id: bool,
    read_only: bool,
    input: Input,
}

impl FormField {
    /// An empty field; date pickers start at `default_date`
    pub(crate) fn new(
        column: impl Into<String>,
        declared_type: DeclaredType,
        is_id: bool,
        default_date: NaiveDateTime,
    ) -> Self {
        let kind = FieldKind::for_type(declared_type);
        let input = match kind {
            FieldKind::Checkbox => Input::Checked(false),
            FieldKind::DatePicker => Input::Date(default_date),
            FieldKind::Numeric | FieldKind::Text => Input::Text(String::new()),
        };
        Self {
            column: column.into(),
            declared_type,
            kind,
            is_id,
            read_only: is_id,
            input,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn declared_type(&self) -> DeclaredType {
        self.declared_type
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_id(&self) -> bool {
        self.is_id
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn text(&self) -> Option<&str> {
        match &self.input {
            Input::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_checked(&self) -> Option<bool> {
        match self.input {
            Input::Checked(checked) => Some(checked),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        match self.input {
            Input::Date(date) => Some(date),
            _ => None,
        }
    }

    /// Replace the text without filtering; invalid numbers surface on collect.
    ///
    /// Returns `false` for checkbox and date fields.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.input {
            Input::Text(current) => {
                *current = text.into();
                true
            }
            _ => false,
        }
    }

    pub fn set_checked(&mut self, checked: bool) -> bool {
        match &mut self.input {
            Input::Checked(current) => {
                *current = checked;
                true
            }
            _ => false,
        }
    }

    pub fn set_date(&mut self, date: NaiveDateTime) -> bool {
        match &mut self.input {
            Input::Date(current) => {
                *current = date;
                true
            }
            _ => false,
        }
    }

    /// Flip a checkbox the way a click would; read-only boxes stay put
    pub fn toggle(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        match &mut self.input {
            Input::Checked(current) => {
                *current = !*current;
                true
            }
            _ => false,
        }
    }

    /// Apply one keystroke, returning whether it was accepted.
    ///
    /// Read-only fields reject everything. Control characters are accepted
    /// by text fields; backspace deletes the last character.
    pub fn type_char(&mut self, ch: char) -> bool {
        if self.read_only {
            return false;
        }
        let numeric = self.kind == FieldKind::Numeric;
        let Input::Text(text) = &mut self.input else {
            return false;
        };

        if ch.is_control() {
            if ch == BACKSPACE {
                text.pop();
            }
            return true;
        }
        if numeric && !numeric_input::accepts(text, ch) {
            return false;
        }
        text.push(ch);
        true
    }

    /// Show a stored value in this field's native representation
    pub(crate) fn fill(&mut self, value: &Value) {
        match &mut self.input {
            Input::Checked(checked) => *checked = value.as_bool().unwrap_or(false),
            Input::Date(date) => {
                if let Some(parsed) = value.as_datetime() {
                    *date = parsed;
                }
            }
            Input::Text(text) => {
                *text = if value.is_null() {
                    String::new()
                } else {
                    value.to_string()
                };
            }
        }
    }

    /// Read the field back as a value of its declared type.
    ///
    /// A blank id field yields `Null`; any other blank text or numeric field
    /// is required.
    pub fn value(&self) -> Result<Value, ValidationError> {
        let text = match &self.input {
            Input::Checked(checked) => return Ok(Value::Bool(*checked)),
            Input::Date(date) => return Ok(Value::DateTime(*date)),
            Input::Text(text) => text,
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            if self.is_id {
                return Ok(Value::Null);
            }
            return Err(ValidationError::new(&self.column, ValidationReason::Required));
        }

        let invalid = || ValidationError::new(&self.column, ValidationReason::InvalidNumber);
        match self.declared_type {
            DeclaredType::Integer => trimmed.parse::<i64>().map(Value::Int64).map_err(|_| invalid()),
            DeclaredType::Decimal => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float64)
                .ok_or_else(invalid),
            _ => Ok(Value::String(text.clone())),
        }
    }
}
