//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from an introspected table.
//! Identifiers come from introspection only; values are always bound as parameters.

use crate::schema::{ColumnInfo, ColumnKind, TableInfo};
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }

    /// Push a value and return its placeholder, cast to the column's type when known.
    fn placeholder(&mut self, v: Value, column: &ColumnInfo) -> String {
        let n = self.push_param(v);
        if column.sql_type.is_empty() {
            format!("${}", n)
        } else {
            format!("${}::{}", n, column.sql_type)
        }
    }

    /// Placeholder for a key lookup. Integer keys are compared as int8: an id past
    /// the column's range matches no row instead of failing the cast.
    fn key_placeholder(&mut self, id: Value, pk: &ColumnInfo) -> String {
        if pk.kind == ColumnKind::Integer {
            let n = self.push_param(id);
            format!("${}::\"pg_catalog\".\"int8\"", n)
        } else {
            self.placeholder(id, pk)
        }
    }
}

/// Types the row decoder reads natively; everything else is selected as text.
const NATIVE_TYPES: &[&str] = &[
    "smallint",
    "integer",
    "bigint",
    "real",
    "double precision",
    "boolean",
    "text",
    "character varying",
    "character",
    "uuid",
    "timestamp with time zone",
    "timestamp without time zone",
    "date",
    "json",
    "jsonb",
    "bytea",
];

fn select_expr(column: &ColumnInfo) -> String {
    let q = quoted(&column.name);
    if NATIVE_TYPES.contains(&column.data_type.as_str()) {
        q
    } else {
        format!("{}::text AS {}", q, q)
    }
}

/// SELECT list: each column as-is, except types without a native decoding as col::text.
fn select_column_list(table: &TableInfo) -> String {
    table
        .columns
        .iter()
        .map(select_expr)
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT page of rows, ordered by primary key when the table has one.
pub fn select_list(schema: &str, table: &TableInfo, limit: u32, offset: u32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let order_clause = table
        .primary_key
        .as_deref()
        .map(|pk| format!(" ORDER BY {}", quoted(pk)))
        .unwrap_or_default();
    let limit_param = q.push_param(Value::from(limit));
    let offset_param = q.push_param(Value::from(offset));
    q.sql = format!(
        "SELECT {} FROM {}{} LIMIT ${} OFFSET ${}",
        select_column_list(table),
        qualified_table(schema, &table.name),
        order_clause,
        limit_param,
        offset_param
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(schema: &str, table: &TableInfo, pk: &ColumnInfo, id: Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.key_placeholder(id, pk);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(table),
        qualified_table(schema, &table.name),
        quoted(&pk.name),
        ph
    );
    q
}

/// INSERT the given fields (in column order; names without a column are skipped).
/// Returns the primary key when the table has one.
pub fn insert(schema: &str, table: &TableInfo, fields: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &table.columns {
        let Some(val) = fields.get(&c.name) else { continue };
        placeholders.push(q.placeholder(val.clone(), c));
        cols.push(quoted(&c.name));
    }
    let target = qualified_table(schema, &table.name);
    let values = if cols.is_empty() {
        " DEFAULT VALUES".to_string()
    } else {
        format!(" ({}) VALUES ({})", cols.join(", "), placeholders.join(", "))
    };
    let returning = table
        .primary_column()
        .map(|pk| format!(" RETURNING {}", select_expr(pk)))
        .unwrap_or_default();
    q.sql = format!("INSERT INTO {}{}{}", target, values, returning);
    q
}

/// UPDATE by id: SET only fields that name a non-key column. None when nothing is left to set.
pub fn update(
    schema: &str,
    table: &TableInfo,
    pk: &ColumnInfo,
    id: Value,
    fields: &Map<String, Value>,
) -> Option<QueryBuf> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in &table.columns {
        if c.name == pk.name {
            continue;
        }
        let Some(val) = fields.get(&c.name) else { continue };
        let rhs = q.placeholder(val.clone(), c);
        sets.push(format!("{} = {}", quoted(&c.name), rhs));
    }
    if sets.is_empty() {
        return None;
    }
    let id_ph = q.key_placeholder(id, pk);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        qualified_table(schema, &table.name),
        sets.join(", "),
        quoted(&pk.name),
        id_ph
    );
    Some(q)
}

/// DELETE by id.
pub fn delete(schema: &str, table: &TableInfo, pk: &ColumnInfo, id: Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.key_placeholder(id, pk);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        qualified_table(schema, &table.name),
        quoted(&pk.name),
        ph
    );
    q
}
