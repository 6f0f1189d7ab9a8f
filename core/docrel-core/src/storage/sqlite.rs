//! Embedded relational engine adapter backed by SQLite (`rusqlite`).
//!
//! Statements are compiled lazily: `prepare` only records the text, bindings
//! accumulate on the handle, and the connection lock is taken for the
//! duration of `execute` / `fetch_*`. This keeps [`SqliteConnection`]
//! `Send + Sync` so one handle can be shared by several engines.

use crate::error::{DocRelError, DocRelResult};
use crate::storage::{Connection, ParamValue, PreparedStatement, Row, SqlValue};
use parking_lot::Mutex;
use rusqlite::types::{ToSql, Value};
use std::path::Path;

/// SQLite connection handle.
pub struct SqliteConnection {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteConnection {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> DocRelResult<Self> {
        let conn = rusqlite::Connection::open(path).map_err(map_sqlite_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> DocRelResult<Self> {
        let conn = rusqlite::Connection::open_in_memory().map_err(map_sqlite_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run one or more statements without bindings (fixtures, templates).
    pub fn execute_batch(&self, sql: &str) -> DocRelResult<()> {
        self.conn.lock().execute_batch(sql).map_err(map_sqlite_error)
    }
}

impl Connection for SqliteConnection {
    fn prepare(&self, sql: &str) -> DocRelResult<Box<dyn PreparedStatement + '_>> {
        Ok(Box::new(SqliteStatement {
            conn: &self.conn,
            sql: sql.to_string(),
            params: Vec::new(),
        }))
    }
}

struct SqliteStatement<'c> {
    conn: &'c Mutex<rusqlite::Connection>,
    sql: String,
    params: Vec<(String, Value)>,
}

impl SqliteStatement<'_> {
    fn named_params(&self) -> Vec<(&str, &dyn ToSql)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }

    fn query(&self, limit: Option<usize>) -> DocRelResult<Vec<Row>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&self.sql).map_err(map_sqlite_error)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let params = self.named_params();
        let mut rows = stmt.query(params.as_slice()).map_err(map_sqlite_error)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sqlite_error)? {
            let mut record = Row::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                let value: Value = row.get(idx).map_err(map_sqlite_error)?;
                record.insert(name.clone(), SqlValue::from(value));
            }
            out.push(record);
            if limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
        }
        Ok(out)
    }
}

impl PreparedStatement for SqliteStatement<'_> {
    fn bind(&mut self, placeholder: &str, value: ParamValue) -> DocRelResult<()> {
        let value = Value::from(value);
        match self.params.iter_mut().find(|(name, _)| name == placeholder) {
            Some(slot) => slot.1 = value,
            None => self.params.push((placeholder.to_string(), value)),
        }
        Ok(())
    }

    fn execute(&mut self) -> DocRelResult<()> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&self.sql).map_err(map_sqlite_error)?;
        let params = self.named_params();
        stmt.execute(params.as_slice()).map_err(map_sqlite_error)?;
        Ok(())
    }

    fn fetch_one(&mut self) -> DocRelResult<Option<Row>> {
        Ok(self.query(Some(1))?.into_iter().next())
    }

    fn fetch_all(&mut self) -> DocRelResult<Vec<Row>> {
        self.query(None)
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Null => Value::Null,
            ParamValue::Str(s) => Value::Text(s),
            ParamValue::Int(i) => Value::Integer(i),
            ParamValue::Bool(b) => Value::Integer(i64::from(b)),
        }
    }
}

impl From<Value> for SqlValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Integer(i) => SqlValue::Integer(i),
            Value::Real(f) => SqlValue::Real(f),
            Value::Text(s) => SqlValue::Text(s),
            Value::Blob(b) => SqlValue::Blob(b),
        }
    }
}

fn map_sqlite_error(err: rusqlite::Error) -> DocRelError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            DocRelError::Duplicate(err.to_string())
        }
        _ => DocRelError::Engine(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Query;

    fn setup() -> SqliteConnection {
        let conn = SqliteConnection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE `t.x` (`uid` TEXT UNIQUE, `n` INT, `f` BOOLEAN);")
            .unwrap();
        conn
    }

    #[test]
    fn test_bind_execute_fetch() {
        let conn = setup();
        Query::new("INSERT INTO `t.x` (`uid`, `n`, `f`) VALUES (:uid, :n, :f)")
            .bind(":uid", "a".into())
            .bind(":n", ParamValue::Int(7))
            .bind(":f", ParamValue::Bool(true))
            .execute(&conn)
            .unwrap();

        let row = Query::new("SELECT * FROM `t.x` WHERE `uid` = :uid")
            .bind(":uid", "a".into())
            .fetch_one(&conn)
            .unwrap()
            .unwrap();
        assert_eq!(row.get("uid"), Some(&SqlValue::Text("a".to_string())));
        assert_eq!(row.get("n"), Some(&SqlValue::Integer(7)));
        assert_eq!(row.get("f"), Some(&SqlValue::Integer(1)));
    }

    #[test]
    fn test_fetch_one_empty() {
        let conn = setup();
        let row = Query::new("SELECT * FROM `t.x` WHERE `uid` = :uid")
            .bind(":uid", "missing".into())
            .fetch_one(&conn)
            .unwrap();
        assert!(row.is_none());
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate() {
        let conn = setup();
        let insert = Query::new("INSERT INTO `t.x` (`uid`) VALUES (:uid)").bind(":uid", "a".into());
        insert.execute(&conn).unwrap();
        let err = insert.execute(&conn).unwrap_err();
        assert!(matches!(err, DocRelError::Duplicate(_)), "got {err:?}");
    }

    #[test]
    fn test_engine_error_on_missing_table() {
        let conn = setup();
        let err = Query::new("DROP TABLE `nope`").execute(&conn).unwrap_err();
        assert!(matches!(err, DocRelError::Engine(_)));
    }

    #[test]
    fn test_rebind_replaces_value() {
        let conn = setup();
        let mut stmt = conn
            .prepare("INSERT INTO `t.x` (`uid`, `n`) VALUES (:uid, :n)")
            .unwrap();
        stmt.bind(":uid", "b".into()).unwrap();
        stmt.bind(":n", ParamValue::Int(1)).unwrap();
        stmt.bind(":n", ParamValue::Int(2)).unwrap();
        stmt.execute().unwrap();
        drop(stmt);

        let rows = Query::new("SELECT `n` FROM `t.x`").fetch_all(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("n"), Some(&SqlValue::Integer(2)));
    }
}
