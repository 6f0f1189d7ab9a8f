//! Storage module — the relational engine boundary.
//!
//! The engine never talks to a driver directly: every statement goes through
//! the [`Connection`] / [`PreparedStatement`] pair (prepare, bind, execute,
//! fetch). Connection lifecycle belongs to the caller.
//!
//! # Contract
//!
//! - `prepare`: accepts statement text with `:name` placeholders.
//! - `bind`: the [`ParamValue`] variant is the type hint (STRING / INTEGER / BOOLEAN).
//! - `execute`: runs a statement that returns no rows.
//! - `fetch_one` / `fetch_all`: run a query and return rows keyed by column name.
//! - Unique-constraint violations surface as
//!   [`DocRelError::Duplicate`](crate::error::DocRelError::Duplicate); other
//!   driver failures as [`DocRelError::Engine`](crate::error::DocRelError::Engine).

#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::error::DocRelResult;
use crate::logging::SQL_TARGET;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnection;

/// Native bound-parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Str,
    Int,
    Bool,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParamType::Str => "STRING",
            ParamType::Int => "INTEGER",
            ParamType::Bool => "BOOLEAN",
        })
    }
}

/// A value bound to a named placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Str(String),
    Int(i64),
    Bool(bool),
}

impl ParamValue {
    /// Binding type carried by this value; `Null` binds as a string.
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Null | ParamValue::Str(_) => ParamType::Str,
            ParamValue::Int(_) => ParamType::Int,
            ParamValue::Bool(_) => ParamType::Bool,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

/// A value fetched from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One fetched row: column name → value.
pub type Row = HashMap<String, SqlValue>;

/// Relational engine connection.
pub trait Connection {
    /// Prepare a statement with named placeholders.
    fn prepare(&self, sql: &str) -> DocRelResult<Box<dyn PreparedStatement + '_>>;
}

/// A prepared statement with bound parameters.
pub trait PreparedStatement {
    /// Bind `value` to `placeholder` (including the leading `:`).
    fn bind(&mut self, placeholder: &str, value: ParamValue) -> DocRelResult<()>;

    /// Run a statement that returns no rows.
    fn execute(&mut self) -> DocRelResult<()>;

    /// Run a query and return its first row, if any.
    fn fetch_one(&mut self) -> DocRelResult<Option<Row>>;

    /// Run a query and return all rows.
    fn fetch_all(&mut self) -> DocRelResult<Vec<Row>>;
}

impl<C: Connection + ?Sized> Connection for &C {
    fn prepare(&self, sql: &str) -> DocRelResult<Box<dyn PreparedStatement + '_>> {
        (**self).prepare(sql)
    }
}

impl<C: Connection + ?Sized> Connection for Arc<C> {
    fn prepare(&self, sql: &str) -> DocRelResult<Box<dyn PreparedStatement + '_>> {
        (**self).prepare(sql)
    }
}

/// Statement text together with its bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub params: Vec<(String, ParamValue)>,
}

impl Query {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, placeholder: impl Into<String>, value: ParamValue) -> Self {
        self.params.push((placeholder.into(), value));
        self
    }

    fn prepare<'c, C: Connection + ?Sized>(
        &self,
        conn: &'c C,
    ) -> DocRelResult<Box<dyn PreparedStatement + 'c>> {
        tracing::debug!(target: SQL_TARGET, sql = %self.sql, params = self.params.len(), "prepare");
        let mut stmt = conn.prepare(&self.sql)?;
        for (placeholder, value) in &self.params {
            stmt.bind(placeholder, value.clone())?;
        }
        Ok(stmt)
    }

    /// Prepare, bind and execute.
    pub fn execute<C: Connection + ?Sized>(&self, conn: &C) -> DocRelResult<()> {
        self.prepare(conn)?.execute()
    }

    /// Prepare, bind and fetch the first row.
    pub fn fetch_one<C: Connection + ?Sized>(&self, conn: &C) -> DocRelResult<Option<Row>> {
        self.prepare(conn)?.fetch_one()
    }

    /// Prepare, bind and fetch every row.
    pub fn fetch_all<C: Connection + ?Sized>(&self, conn: &C) -> DocRelResult<Vec<Row>> {
        self.prepare(conn)?.fetch_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_value_carries_type_hint() {
        assert_eq!(ParamValue::Str("a".into()).param_type(), ParamType::Str);
        assert_eq!(ParamValue::Int(1).param_type(), ParamType::Int);
        assert_eq!(ParamValue::Bool(true).param_type(), ParamType::Bool);
        assert_eq!(ParamValue::Null.param_type(), ParamType::Str);
    }

    #[test]
    fn query_collects_bindings_in_order() {
        let query = Query::new("SELECT 1 WHERE a = :a AND b = :b")
            .bind(":a", ParamValue::Int(1))
            .bind(":b", "x".into());
        assert_eq!(query.params.len(), 2);
        assert_eq!(query.params[0].0, ":a");
        assert_eq!(query.params[1].1, ParamValue::Str("x".to_string()));
    }
}
