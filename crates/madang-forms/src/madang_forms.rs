//! Schema-driven record forms
//!
//! Given a table's column descriptors (and optionally an existing row) the
//! builder produces typed input fields. Numeric fields filter keystrokes as
//! they are typed; `FieldSet::collect` turns the fields back into a
//! [`Record`](madang_core::Record) or names the first field that is invalid.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use madang_forms::FormBuilder;
//!
//! let columns = gateway.column_types("Book")?;
//! let next_id = gateway.max_id("Book", "bookid")? + 1;
//! let mut form = FormBuilder::new().build_insert_fields(&columns, "bookid", next_id);
//! form.type_str("bookname", "Rust in Action")?;
//! let record = form.collect()?;
//! ```
//!
//! Nothing here touches the database.

mod field;
mod field_set;
mod form_builder;
pub mod numeric_input;
mod validation;

pub use field::{FieldKind, FormField};
pub use field_set::FieldSet;
pub use form_builder::FormBuilder;
pub use validation::{FormError, ValidationError, ValidationReason};
