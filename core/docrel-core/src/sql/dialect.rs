//! SQL dialects — DDL text for the supported relational engines.
//!
//! `MySql` reproduces the canonical persisted layout. `Sqlite` expresses the
//! same logical layout for the embedded adapter; where SQLite has no
//! equivalent (FULLTEXT / SPATIAL indexes, key prefixes) it either refuses
//! before any DDL runs or drops the prefix.

use crate::error::{DocRelError, DocRelResult};
use crate::model::IndexKind;
use crate::sql::naming::quote;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed key-prefix length applied to every indexed column (MySQL).
// TODO: derive the prefix from the column type so INT/FLOAT columns can be indexed on MySQL.
pub const KEY_PREFIX_LEN: usize = 32;

const MYSQL_TABLE_OPTIONS: &str = "ENGINE=InnoDB AUTO_INCREMENT=0 DEFAULT CHARSET=utf8mb4";

/// Supported statement dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    MySql,
    Sqlite,
}

impl SqlDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDialect::MySql => "mysql",
            SqlDialect::Sqlite => "sqlite",
        }
    }

    fn synthetic_key(&self) -> &'static str {
        match self {
            SqlDialect::MySql => "`id` int(11) NOT NULL AUTO_INCREMENT",
            SqlDialect::Sqlite => "`id` INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }

    fn finish_table(&self, table: &str, mut body: Vec<String>, uid_unique: bool) -> Vec<String> {
        match self {
            SqlDialect::MySql => {
                body.push("PRIMARY KEY (`id`)".to_string());
                body.push(if uid_unique {
                    "UNIQUE KEY `index1` (`uid`)".to_string()
                } else {
                    "KEY `index1` (`uid`)".to_string()
                });
                vec![format!(
                    "CREATE TABLE {} (\n  {}\n) {MYSQL_TABLE_OPTIONS}",
                    quote(table),
                    body.join(",\n  ")
                )]
            }
            SqlDialect::Sqlite => {
                if uid_unique {
                    body.push("UNIQUE (`uid`)".to_string());
                }
                let mut statements = vec![format!(
                    "CREATE TABLE {} (\n  {}\n)",
                    quote(table),
                    body.join(",\n  ")
                )];
                if !uid_unique {
                    statements.push(format!(
                        "CREATE INDEX {} ON {} (`uid`)",
                        quote(&format!("{table}.index1")),
                        quote(table)
                    ));
                }
                statements
            }
        }
    }

    /// Primary table: synthetic key, unique external id, timestamps,
    /// permissions and one clause per non-array attribute.
    pub fn create_primary_table(&self, table: &str, columns: &[String]) -> Vec<String> {
        let mut body = vec![
            self.synthetic_key().to_string(),
            "`uid` varchar(45) DEFAULT NULL".to_string(),
            "`createdAt` datetime DEFAULT NULL".to_string(),
            "`updatedAt` datetime DEFAULT NULL".to_string(),
            "`permissions` longtext DEFAULT NULL".to_string(),
        ];
        body.extend(columns.iter().cloned());
        self.finish_table(table, body, true)
    }

    /// Child table for one array attribute, indexed on the owning document id.
    pub fn create_child_table(&self, table: &str, value_column: &str) -> Vec<String> {
        let body = vec![
            self.synthetic_key().to_string(),
            "`uid` varchar(45) DEFAULT NULL".to_string(),
            value_column.to_string(),
        ];
        self.finish_table(table, body, false)
    }

    pub fn drop_table(&self, table: &str) -> String {
        format!("DROP TABLE {}", quote(table))
    }

    pub fn add_column(&self, table: &str, column_clause: &str) -> String {
        format!("ALTER TABLE {} ADD COLUMN {column_clause}", quote(table))
    }

    pub fn drop_column(&self, table: &str, column: &str) -> String {
        format!("ALTER TABLE {} DROP COLUMN {}", quote(table), quote(column))
    }

    pub fn create_index(
        &self,
        table: &str,
        index: &str,
        kind: IndexKind,
        columns: &[String],
    ) -> DocRelResult<String> {
        match self {
            SqlDialect::MySql => {
                let keyword = match kind {
                    IndexKind::Key => "INDEX",
                    IndexKind::Unique => "UNIQUE INDEX",
                    IndexKind::Fulltext => "FULLTEXT INDEX",
                    IndexKind::Spatial => "SPATIAL INDEX",
                };
                let columns: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{}({KEY_PREFIX_LEN}) ASC", quote(c)))
                    .collect();
                Ok(format!(
                    "ALTER TABLE {} ADD {keyword} {} ({})",
                    quote(table),
                    quote(index),
                    columns.join(", ")
                ))
            }
            SqlDialect::Sqlite => {
                let keyword = match kind {
                    IndexKind::Key => "INDEX",
                    IndexKind::Unique => "UNIQUE INDEX",
                    IndexKind::Fulltext | IndexKind::Spatial => {
                        return Err(DocRelError::NotSupported {
                            feature: format!("{kind} index on sqlite"),
                            hint: "use a key or unique index, or the mysql dialect".to_string(),
                        });
                    }
                };
                let columns: Vec<String> =
                    columns.iter().map(|c| format!("{} ASC", quote(c))).collect();
                Ok(format!(
                    "CREATE {keyword} {} ON {} ({})",
                    quote(&format!("{table}.{index}")),
                    quote(table),
                    columns.join(", ")
                ))
            }
        }
    }

    /// SQLite index names are database-wide, so they carry the table name.
    pub fn drop_index(&self, table: &str, index: &str) -> String {
        match self {
            SqlDialect::MySql => {
                format!("ALTER TABLE {} DROP INDEX {}", quote(table), quote(index))
            }
            SqlDialect::Sqlite => format!("DROP INDEX {}", quote(&format!("{table}.{index}"))),
        }
    }

    /// Create `table` with the structure of `template`.
    pub fn clone_table(&self, table: &str, template: &str) -> String {
        match self {
            SqlDialect::MySql => format!("CREATE TABLE {} LIKE {}", quote(table), quote(template)),
            SqlDialect::Sqlite => format!(
                "CREATE TABLE {} AS SELECT * FROM {} WHERE 0",
                quote(table),
                quote(template)
            ),
        }
    }
}

impl FromStr for SqlDialect {
    type Err = DocRelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(SqlDialect::MySql),
            "sqlite" => Ok(SqlDialect::Sqlite),
            other => Err(DocRelError::Config(format!("unknown dialect '{other}'"))),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_primary_table() {
        let sql = SqlDialect::MySql.create_primary_table(
            "app_ns.collection.users",
            &["`col_name` TEXT NULL".to_string()],
        );
        assert_eq!(sql.len(), 1);
        let sql = &sql[0];
        assert!(sql.starts_with("CREATE TABLE `app_ns.collection.users` ("));
        assert!(sql.contains("`id` int(11) NOT NULL AUTO_INCREMENT"));
        assert!(sql.contains("`col_name` TEXT NULL"));
        assert!(sql.contains("UNIQUE KEY `index1` (`uid`)"));
        assert!(sql.ends_with("ENGINE=InnoDB AUTO_INCREMENT=0 DEFAULT CHARSET=utf8mb4"));
    }

    #[test]
    fn test_sqlite_child_table_adds_index_statement() {
        let sql = SqlDialect::Sqlite.create_child_table("t.tags", "`col_tags` TEXT NULL");
        assert_eq!(sql.len(), 2);
        assert!(sql[0].contains("`id` INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(!sql[0].contains("UNIQUE"));
        assert_eq!(sql[1], "CREATE INDEX `t.tags.index1` ON `t.tags` (`uid`)");
    }

    #[test]
    fn test_mysql_index_prefix() {
        let sql = SqlDialect::MySql
            .create_index(
                "t",
                "index_byName",
                IndexKind::Unique,
                &["col_first".to_string(), "col_last".to_string()],
            )
            .unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE `t` ADD UNIQUE INDEX `index_byName` (`col_first`(32) ASC, `col_last`(32) ASC)"
        );
    }

    #[test]
    fn test_sqlite_rejects_fulltext() {
        let err = SqlDialect::Sqlite
            .create_index("t", "index_x", IndexKind::Fulltext, &["col_a".to_string()])
            .unwrap_err();
        assert!(matches!(err, DocRelError::NotSupported { .. }));
    }

    #[test]
    fn test_sqlite_index_names_are_table_scoped() {
        let create = SqlDialect::Sqlite
            .create_index("t", "index_x", IndexKind::Key, &["col_a".to_string()])
            .unwrap();
        assert_eq!(create, "CREATE INDEX `t.index_x` ON `t` (`col_a` ASC)");
        assert_eq!(SqlDialect::Sqlite.drop_index("t", "index_x"), "DROP INDEX `t.index_x`");
        assert_eq!(
            SqlDialect::MySql.drop_index("t", "index_x"),
            "ALTER TABLE `t` DROP INDEX `index_x`"
        );
    }

    #[test]
    fn test_clone_table() {
        assert_eq!(
            SqlDialect::MySql.clone_table("app_ns.audit.audit", "template.audit.audit"),
            "CREATE TABLE `app_ns.audit.audit` LIKE `template.audit.audit`"
        );
        assert!(SqlDialect::Sqlite
            .clone_table("a", "b")
            .ends_with("WHERE 0"));
    }

    #[test]
    fn test_parse_dialect() {
        assert_eq!("MySQL".parse::<SqlDialect>().unwrap(), SqlDialect::MySql);
        assert!("postgres".parse::<SqlDialect>().is_err());
    }
}
