//! Descriptors — attributes, collections, indexes and documents.
//!
//! Descriptors are plain values handed in by the caller's metadata layer.
//! They are mutated only through the explicit add/remove operations; the
//! engine performs no optimistic-concurrency checks on them.

pub mod attribute;
pub mod collection;
pub mod document;

pub use attribute::{Attribute, AttributeType, RESERVED_KEYS, Relation, RelationPolicy};
pub use collection::{Collection, Index, IndexKind};
pub use document::Document;
