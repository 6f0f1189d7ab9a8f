//! DML statement text shared by every dialect.
//!
//! Placeholders are named after their position (`:col_0`, `:col_1`, ...)
//! rather than after attribute keys, since keys may contain `-`.

use crate::sql::naming::quote;

pub const UID: &str = "uid";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";
pub const PERMISSIONS: &str = "permissions";

/// Placeholder bound to the `index`-th attribute column of a statement.
pub fn column_placeholder(index: usize) -> String {
    format!(":col_{index}")
}

/// `INSERT INTO t (a, b) VALUES (:a, :b)` for `(column, placeholder)` pairs.
pub fn insert(table: &str, columns: &[(String, String)]) -> String {
    let names: Vec<String> = columns.iter().map(|(c, _)| quote(c)).collect();
    let values: Vec<&str> = columns.iter().map(|(_, p)| p.as_str()).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(table),
        names.join(", "),
        values.join(", ")
    )
}

/// `UPDATE t SET a = :a, ... WHERE uid = :uid`
pub fn update_by_uid(table: &str, assignments: &[(String, String)]) -> String {
    let sets: Vec<String> = assignments
        .iter()
        .map(|(c, p)| format!("{} = {p}", quote(c)))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = :uid",
        quote(table),
        sets.join(", "),
        quote(UID)
    )
}

pub fn select_by_uid(table: &str) -> String {
    format!("SELECT * FROM {} WHERE {} = :uid", quote(table), quote(UID))
}

pub fn select_column_by_uid(table: &str, column: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = :uid",
        quote(column),
        quote(table),
        quote(UID)
    )
}

pub fn delete_by_uid(table: &str) -> String {
    delete_by_column(table, UID)
}

/// `DELETE FROM t WHERE column = :id`; legacy tables key rows on other columns.
pub fn delete_by_column(table: &str, column: &str) -> String {
    let placeholder = if column == UID { ":uid" } else { ":id" };
    format!(
        "DELETE FROM {} WHERE {} = {placeholder}",
        quote(table),
        quote(column)
    )
}

/// Relationship rows linked to `:id` in either direction.
pub fn delete_relationships(table: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = :id OR {} = :id",
        quote(table),
        quote("start"),
        quote("end")
    )
}
