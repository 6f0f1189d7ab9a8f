//! Schema Manager — DDL for collections, attributes, indexes and namespaces.

pub mod manager;
pub mod mocks;
pub mod type_map;

pub use manager::SchemaManager;
pub use mocks::mocks;
pub use type_map::{binding_type, column_clause, column_definition};
