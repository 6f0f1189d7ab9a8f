//! Engine module — DocumentEngine and its operations

pub mod catalog;
pub mod crud;
pub mod database;
pub mod find;
pub mod lifecycle;

pub use catalog::{CollectionCatalog, MemoryCatalog};
pub use database::DocumentEngine;
pub use find::FindOptions;
