// SQL 모듈 진입점 — identifier builder, dialect DDL, DML text, filter splitter
pub mod dialect;
pub mod filter;
pub mod naming;
pub mod statements;

pub use dialect::{KEY_PREFIX_LEN, SqlDialect};
pub use filter::{Filter, Operator, split};
pub use naming::Namespace;
