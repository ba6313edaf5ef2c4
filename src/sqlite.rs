//! A [`crate::paginate::QueryExecutor`] backed by a `rusqlite::Connection`,
//! letting the pagination pipeline run end to end against a real SQLite
//! database without a caller bringing their own driver glue.

use rusqlite::types::{ToSqlOutput, Value as SqliteValue};
use rusqlite::ToSql;

use crate::error::Result;
use crate::paginate::QueryExecutor;
use crate::value::Value;

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(match self {
            Value::Bool(b) => SqliteValue::Integer(*b as i64),
            Value::Int(i) => SqliteValue::Integer(*i),
            Value::Float(f) => SqliteValue::Real(*f),
            Value::String(s) => SqliteValue::Text(s.clone()),
        }))
    }
}

/// Executes rendered statements against an owned `rusqlite::Connection`.
pub struct SqliteExecutor {
    conn: rusqlite::Connection,
}

impl SqliteExecutor {
    pub fn new(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

fn row_to_json(row: &rusqlite::Row<'_>) -> rusqlite::Result<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for (index, column) in row.as_ref().column_names().iter().enumerate() {
        let value: rusqlite::types::ValueRef = row.get_ref(index)?;
        let json = match value {
            rusqlite::types::ValueRef::Null => serde_json::Value::Null,
            rusqlite::types::ValueRef::Integer(i) => serde_json::Value::from(i),
            rusqlite::types::ValueRef::Real(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            rusqlite::types::ValueRef::Text(t) => {
                let text = String::from_utf8_lossy(t);
                serde_json::from_str(&text).unwrap_or_else(|_| serde_json::Value::String(text.into_owned()))
            }
            rusqlite::types::ValueRef::Blob(_) => serde_json::Value::Null,
        };
        map.insert(column.to_string(), json);
    }
    Ok(serde_json::Value::Object(map))
}

impl QueryExecutor for SqliteExecutor {
    fn count(&self, sql: &str, params: &[Value]) -> Result<i64> {
        let params: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        let total: i64 = self
            .conn
            .query_row(sql, params.as_slice(), |row| row.get(0))?;
        Ok(total)
    }

    fn rows(&self, sql: &str, params: &[Value]) -> Result<Vec<serde_json::Value>> {
        let params: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params.as_slice(), |row| row_to_json(row))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> SqliteExecutor {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE person (id INTEGER PRIMARY KEY, name TEXT, age INTEGER, jsonable TEXT);
             INSERT INTO person (name, age, jsonable) VALUES ('Ada', 36, '{\"active\": true}');
             INSERT INTO person (name, age, jsonable) VALUES ('Lin', 29, '{\"active\": false}');",
        )
        .unwrap();
        SqliteExecutor::new(conn)
    }

    #[test]
    fn counts_rows() {
        let executor = setup();
        let total = executor.count("SELECT COUNT(id) FROM person", &[]).unwrap();
        assert_eq!(total, 2);
    }

    #[test]
    fn fetches_rows_as_json_with_nested_document_parsed() {
        let executor = setup();
        let rows = executor
            .rows("SELECT * FROM person WHERE age > ?", &[Value::Int(30)])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Ada");
        assert_eq!(rows[0]["jsonable"]["active"], true);
    }
}
