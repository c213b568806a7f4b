//! Introspected table model: what the database reports about a table's columns.

/// Coarse column type used to check incoming JSON values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    Boolean,
    /// No JSON type check is applied.
    Other,
}

impl ColumnKind {
    /// Classify a type string as reported by `information_schema.columns.data_type`.
    /// MySQL-style strings such as `int(11) unsigned` or `varchar(255)` are understood too.
    pub fn from_data_type(data_type: &str) -> Self {
        let lower = data_type.trim().to_lowercase();
        let base = lower.split('(').next().unwrap_or("").trim();
        let base = base.strip_suffix(" unsigned").unwrap_or(base);
        match base {
            "smallint" | "integer" | "bigint" | "int" | "int2" | "int4" | "int8" | "tinyint"
            | "mediumint" | "smallserial" | "serial" | "bigserial" => ColumnKind::Integer,
            "real" | "double precision" | "double" | "float" | "float4" | "float8" | "numeric"
            | "decimal" => ColumnKind::Float,
            "text" | "character varying" | "character" | "varchar" | "char" | "bpchar"
            | "tinytext" | "mediumtext" | "longtext" => ColumnKind::Text,
            "boolean" | "bool" => ColumnKind::Boolean,
            _ => ColumnKind::Other,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColumnInfo {
    pub name: String,
    /// Type string as reported by the database (e.g. "integer", "character varying").
    pub data_type: String,
    /// Qualified type name used for parameter casts (e.g. `"pg_catalog"."int4"`).
    pub sql_type: String,
    pub kind: ColumnKind,
    pub nullable: bool,
    /// Whether the column has a DB default (sequence, identity, expression).
    pub has_default: bool,
}

#[derive(Clone, Debug)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    /// Set only when the primary key is a single column.
    pub primary_key: Option<String>,
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_column(&self) -> Option<&ColumnInfo> {
        self.primary_key.as_deref().and_then(|pk| self.column(pk))
    }
}
