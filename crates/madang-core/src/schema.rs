//! Schema introspection types

use serde::{Deserialize, Serialize};

/// Category of a column's declared type.
///
/// The store reports free-form type names; every name maps onto exactly one
/// of these categories, falling back to `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeclaredType {
    Integer,
    /// Decimal, numeric and floating point columns
    Decimal,
    Boolean,
    DateTime,
    #[default]
    Text,
}

impl DeclaredType {
    /// Map a database type name (e.g. `INT`, `nvarchar(50)`, `DECIMAL(10,2)`)
    /// onto its category.
    pub fn from_type_name(type_name: &str) -> Self {
        let lower = type_name.trim().to_lowercase();
        let base = lower
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .trim_start_matches("unsigned ")
            .to_string();
        // Trailing modifiers such as UNSIGNED or WITH TIME ZONE do not change the category
        let head = base.split_whitespace().next().unwrap_or_default();

        match head {
            b if b.starts_with("int") => DeclaredType::Integer,
            "bigint" | "smallint" | "tinyint" | "mediumint" => DeclaredType::Integer,
            b if b.starts_with("double") => DeclaredType::Decimal,
            "decimal" | "numeric" | "float" | "real" | "money" | "smallmoney" => {
                DeclaredType::Decimal
            }
            "bit" | "bool" | "boolean" => DeclaredType::Boolean,
            b if b.starts_with("datetime") || b.starts_with("timestamp") => DeclaredType::DateTime,
            "date" | "smalldatetime" => DeclaredType::DateTime,
            "" | "text" | "char" | "nchar" | "varchar" | "nvarchar" | "clob" => DeclaredType::Text,
            _ => {
                tracing::trace!(type_name = %type_name, "unrecognized type name, treating as text");
                DeclaredType::Text
            }
        }
    }
}

/// A column of a table as reported by catalog introspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,
    /// Type name exactly as declared in the store
    pub type_name: String,
    /// Category derived from `type_name`
    pub declared_type: DeclaredType,
    /// Whether the column is (part of) the primary key
    #[serde(default)]
    pub is_primary_key: bool,
    /// Whether the column accepts NULL
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Create a descriptor from a name and a declared type name
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            name: name.into(),
            declared_type: DeclaredType::from_type_name(&type_name),
            type_name,
            is_primary_key: false,
            nullable: true,
        }
    }

    /// Builder: mark as primary key
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }

    /// Case-insensitive name comparison, matching how the store resolves identifiers
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Base table information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name
    pub name: String,
}

/// A single-column reference from one table to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    /// Referencing column in the owning table
    pub column: String,
    /// Referenced table
    pub referenced_table: String,
    /// Referenced column
    pub referenced_column: String,
}
