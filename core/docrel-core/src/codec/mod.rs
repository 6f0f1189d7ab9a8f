//! Document Codec — JSON document ⇄ relational rows.
//!
//! Encoding splits a [`Document`](crate::model::Document) into one primary
//! row plus child rows per array attribute; decoding reassembles the JSON
//! shape from the fetched rows. DOCUMENT attributes are routed through a
//! [`NestedResolver`] so that related documents are stored or loaded
//! recursively.

pub mod decode;
pub mod encode;
pub mod resolver;
pub mod value;

pub use decode::decode;
pub use encode::{ChildRows, ColumnValue, EncodedDocument, encode};
pub use resolver::{DocumentStore, NestedResolver};
pub use value::{from_sql, to_param};
