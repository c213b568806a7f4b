//! Request validation: JSON field types against introspected column types.

use crate::error::AppError;
use crate::schema::{ColumnInfo, ColumnKind, TableInfo};
use crate::service::backend::Record;
use serde_json::Value;

pub struct RecordValidator;

impl RecordValidator {
    /// Fields for an insert. Unknown fields are dropped; a key supplied for a
    /// column the database generates itself is discarded.
    pub fn for_create(table: &TableInfo, body: Record) -> Result<Record, AppError> {
        let mut fields = retain_known(table, body);
        if let Some(pk) = table.primary_column() {
            if pk.has_default {
                fields.remove(&pk.name);
            }
        }
        Self::validate(table, &fields)?;
        Ok(fields)
    }

    /// Fields for an update. The primary key cannot be changed.
    pub fn for_update(table: &TableInfo, body: Record) -> Result<Record, AppError> {
        let fields = retain_known(table, body);
        if let Some(pk) = table.primary_key.as_deref() {
            if fields.contains_key(pk) {
                return Err(AppError::InvalidField(pk.to_string()));
            }
        }
        Self::validate(table, &fields)?;
        Ok(fields)
    }

    /// Check every present field in column order; the first mismatch is reported.
    pub fn validate(table: &TableInfo, fields: &Record) -> Result<(), AppError> {
        for col in &table.columns {
            if let Some(v) = fields.get(&col.name) {
                if !value_matches(col, v) {
                    return Err(AppError::InvalidField(col.name.clone()));
                }
            }
        }
        Ok(())
    }
}

fn retain_known(table: &TableInfo, body: Record) -> Record {
    body.into_iter()
        .filter(|(k, _)| {
            let known = table.column(k).is_some();
            if !known {
                tracing::debug!(table = %table.name, field = %k, "dropping unknown field");
            }
            known
        })
        .collect()
}

fn value_matches(col: &ColumnInfo, v: &Value) -> bool {
    if v.is_null() {
        return col.nullable;
    }
    match col.kind {
        ColumnKind::Integer => v.is_i64() || v.is_u64(),
        ColumnKind::Float => v.is_number(),
        ColumnKind::Text => v.is_string(),
        ColumnKind::Boolean => v.is_boolean(),
        ColumnKind::Other => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn column(name: &str, data_type: &str, nullable: bool) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: data_type.to_string(),
            sql_type: String::new(),
            kind: ColumnKind::from_data_type(data_type),
            nullable,
            has_default: false,
        }
    }

    fn items() -> TableInfo {
        let mut id = column("id", "integer", false);
        id.has_default = true;
        TableInfo {
            name: "items".into(),
            columns: vec![
                id,
                column("title", "character varying", false),
                column("description", "text", true),
                column("price", "double precision", true),
                column("qty", "integer", true),
                column("active", "boolean", true),
                column("meta", "jsonb", true),
            ],
            primary_key: Some("id".into()),
        }
    }

    fn record(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn accepts_matching_types() {
        let body = record(json!({
            "title": "lamp",
            "description": null,
            "price": 12,
            "qty": 3,
            "active": true,
            "meta": {"any": ["thing"]}
        }));
        let fields = RecordValidator::for_create(&items(), body).unwrap();
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn null_requires_nullable_column() {
        let err = RecordValidator::for_create(&items(), record(json!({"title": null}))).unwrap_err();
        assert!(matches!(err, AppError::InvalidField(f) if f == "title"));
    }

    #[test]
    fn rejects_mismatched_types() {
        let cases = [
            json!({"title": 42}),
            json!({"price": "cheap"}),
            json!({"qty": 1.5}),
            json!({"qty": "3"}),
            json!({"active": "yes"}),
        ];
        for body in cases {
            assert!(matches!(
                RecordValidator::for_create(&items(), record(body)),
                Err(AppError::InvalidField(_))
            ));
        }
    }

    #[test]
    fn reports_first_bad_column_in_table_order() {
        let body = record(json!({"qty": "x", "title": 1}));
        let err = RecordValidator::validate(&items(), &body).unwrap_err();
        assert!(matches!(err, AppError::InvalidField(f) if f == "title"));
    }

    #[test]
    fn create_drops_generated_key_and_unknown_fields() {
        let body = record(json!({"id": 77, "title": "desk", "nope": 1}));
        let fields = RecordValidator::for_create(&items(), body).unwrap();
        assert_eq!(fields, record(json!({"title": "desk"})));
    }

    #[test]
    fn create_keeps_key_without_default() {
        let mut table = items();
        table.columns[0].has_default = false;
        let fields = RecordValidator::for_create(&table, record(json!({"id": 5}))).unwrap();
        assert_eq!(fields.get("id"), Some(&json!(5)));
    }

    #[test]
    fn update_rejects_key_change() {
        let err = RecordValidator::for_update(&items(), record(json!({"id": 2, "title": "x"}))).unwrap_err();
        assert!(matches!(err, AppError::InvalidField(f) if f == "id"));
    }
}
