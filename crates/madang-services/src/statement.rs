//! Statement builders
//!
//! Identifiers passed here must already be resolved against the schema;
//! they are bracket-quoted and interpolated. Values are always bound.

use std::collections::HashSet;

use madang_core::{param_name, quote_identifier, BoundParam, Value};

/// SQL text plus its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<BoundParam>,
}

impl Statement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }
}

/// Hands out `@name` parameters, suffixing a counter when two columns
/// sanitize to the same name.
#[derive(Debug, Default)]
struct ParamNames {
    used: HashSet<String>,
}

impl ParamNames {
    fn next(&mut self, column: &str) -> String {
        let base = param_name(column);
        let mut candidate = base.clone();
        let mut suffix = 1;
        while !self.used.insert(candidate.to_lowercase()) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        candidate
    }
}

/// `SELECT * FROM [table]`
pub fn select_all(table: &str) -> Statement {
    Statement::new(format!("SELECT * FROM {}", quote_identifier(table)))
}

/// Largest id in the table, 0 when empty
pub fn max_id(table: &str, id_column: &str) -> Statement {
    Statement::new(format!(
        "SELECT COALESCE(MAX({}), 0) FROM {}",
        quote_identifier(id_column),
        quote_identifier(table)
    ))
}

/// One column and one inferred-type parameter per record entry
pub fn insert(table: &str, entries: &[(&str, &Value)]) -> Statement {
    let mut names = ParamNames::default();
    let mut columns = Vec::with_capacity(entries.len());
    let mut params = Vec::with_capacity(entries.len());
    for (column, value) in entries {
        columns.push(quote_identifier(column));
        params.push(BoundParam::inferred(names.next(column), (*value).clone()));
    }

    let placeholders: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(table),
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    }
}

/// `assignments` must not contain the id column; its parameter is bound last,
/// typed the same way as in `delete`
pub fn update(
    table: &str,
    id_column: &str,
    assignments: &[(&str, &Value)],
    id_value: &Value,
) -> Statement {
    let mut names = ParamNames::default();
    let mut set_clauses = Vec::with_capacity(assignments.len());
    let mut params = Vec::with_capacity(assignments.len() + 1);
    for (column, value) in assignments {
        let name = names.next(column);
        set_clauses.push(format!("{} = {}", quote_identifier(column), name));
        params.push(BoundParam::inferred(name, (*value).clone()));
    }

    let id_param = names.next(id_column);
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quote_identifier(table),
        set_clauses.join(", "),
        quote_identifier(id_column),
        id_param
    );
    params.push(BoundParam::identifier(id_param, id_value.clone()));

    Statement { sql, params }
}

/// Integer ids bind as `Int`, anything else as text
pub fn delete(table: &str, id_column: &str, id_value: &Value) -> Statement {
    Statement {
        sql: format!(
            "DELETE FROM {} WHERE {} = @idValue",
            quote_identifier(table),
            quote_identifier(id_column)
        ),
        params: vec![BoundParam::identifier("@idValue", id_value.clone())],
    }
}

pub fn row_exists(table: &str, column: &str, value: &Value) -> Statement {
    Statement {
        sql: format!(
            "SELECT COUNT(*) FROM {} WHERE {} = @value",
            quote_identifier(table),
            quote_identifier(column)
        ),
        params: vec![BoundParam::inferred("@value", value.clone())],
    }
}
