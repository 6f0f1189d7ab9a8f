//! Nested Resolver — recursive create/update/read of related documents.
//!
//! The codec never sees the engine itself, only [`DocumentStore`]. The engine
//! implements that trait, so recursion happens at runtime without a
//! compile-time cycle between codec and engine.

use crate::error::{DocRelError, DocRelResult};
use crate::model::{Attribute, Document};
use serde_json::Value;

/// Document operations addressed by collection id, as the resolver needs them.
///
/// `depth` is the nesting level of the call (top-level documents are 0);
/// implementations refuse calls beyond their configured limit.
pub trait DocumentStore {
    fn create_related(&self, collection: &str, data: Document, depth: usize)
    -> DocRelResult<Document>;

    fn update_related(
        &self,
        collection: &str,
        id: &str,
        data: Document,
        depth: usize,
    ) -> DocRelResult<Document>;

    fn get_related(&self, collection: &str, id: &str, depth: usize)
    -> DocRelResult<Option<Document>>;
}

/// Resolves DOCUMENT-typed values against a [`DocumentStore`].
#[derive(Clone, Copy)]
pub struct NestedResolver<'s> {
    store: &'s dyn DocumentStore,
    depth: usize,
}

impl<'s> NestedResolver<'s> {
    pub fn new(store: &'s dyn DocumentStore, depth: usize) -> Self {
        Self { store, depth }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Store a nested value and return the identifier to persist.
    ///
    /// - object with `$id`: updated in place (created under that id if missing)
    /// - object without `$id`: created
    /// - string: taken as an existing document id
    pub fn persist(&self, attribute: &Attribute, value: &Value) -> DocRelResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::String(id) => Ok(Value::String(id.clone())),
            Value::Object(_) => {
                let target = attribute.relation.target(&attribute.key)?;
                let mut nested = Document::from_value(value.clone())?;
                nested.collection = target.to_string();
                let depth = self.depth + 1;

                let stored = match nested.id.clone() {
                    Some(id) => {
                        match self.store.update_related(target, &id, nested.clone(), depth) {
                            Err(DocRelError::DocumentNotFound { .. }) => {
                                self.store.create_related(target, nested, depth)?
                            }
                            other => other?,
                        }
                    }
                    None => self.store.create_related(target, nested, depth)?,
                };

                stored.id.map(Value::String).ok_or_else(|| {
                    DocRelError::Engine(format!(
                        "nested document in '{target}' was stored without an id"
                    ))
                })
            }
            other => Err(DocRelError::TypeMismatch {
                attribute: attribute.key.clone(),
                expected: "document".to_string(),
                actual: other.to_string(),
            }),
        }
    }

    /// Replace a stored identifier with the referenced document (null if gone).
    ///
    /// References past the store's nesting limit stay as their identifier, so
    /// cyclic references (a document pointing at itself or back at an
    /// ancestor) still read.
    pub fn resolve(&self, attribute: &Attribute, stored: &Value) -> DocRelResult<Value> {
        match stored {
            Value::Null => Ok(Value::Null),
            Value::String(id) => {
                let target = attribute.relation.target(&attribute.key)?;
                match self.store.get_related(target, id, self.depth + 1) {
                    Ok(Some(document)) => document.into_value(),
                    Ok(None) => Ok(Value::Null),
                    Err(DocRelError::NestingTooDeep { .. }) => Ok(stored.clone()),
                    Err(e) => Err(e),
                }
            }
            other => Err(DocRelError::TypeMismatch {
                attribute: attribute.key.clone(),
                expected: "document id".to_string(),
                actual: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::HashMap;

    /// In-memory store keyed by (collection, id).
    #[derive(Default)]
    pub(crate) struct MapStore {
        pub docs: Mutex<HashMap<(String, String), Document>>,
        pub next: Mutex<u32>,
        pub limit: Option<usize>,
    }

    impl DocumentStore for MapStore {
        fn create_related(
            &self,
            collection: &str,
            mut data: Document,
            _: usize,
        ) -> DocRelResult<Document> {
            let id = match data.id.clone() {
                Some(id) => id,
                None => {
                    let mut next = self.next.lock();
                    *next += 1;
                    format!("gen-{next}")
                }
            };
            data.id = Some(id.clone());
            self.docs.lock().insert((collection.to_string(), id), data.clone());
            Ok(data)
        }

        fn update_related(
            &self,
            collection: &str,
            id: &str,
            mut data: Document,
            _: usize,
        ) -> DocRelResult<Document> {
            let mut docs = self.docs.lock();
            let key = (collection.to_string(), id.to_string());
            if !docs.contains_key(&key) {
                return Err(DocRelError::DocumentNotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
            data.id = Some(id.to_string());
            docs.insert(key, data.clone());
            Ok(data)
        }

        fn get_related(
            &self,
            collection: &str,
            id: &str,
            depth: usize,
        ) -> DocRelResult<Option<Document>> {
            if depth > self.limit.unwrap_or(usize::MAX) {
                return Err(DocRelError::NestingTooDeep {
                    depth,
                    limit: self.limit.unwrap_or(usize::MAX),
                });
            }
            Ok(self
                .docs
                .lock()
                .get(&(collection.to_string(), id.to_string()))
                .cloned())
        }
    }

    fn owner() -> Attribute {
        Attribute::document("owner", ["users"])
    }

    #[test]
    fn test_persist_creates_without_id() {
        let store = MapStore::default();
        let resolver = NestedResolver::new(&store, 0);
        let id = resolver.persist(&owner(), &json!({"name": "Ann"})).unwrap();
        assert_eq!(id, json!("gen-1"));
        assert!(store.docs.lock().contains_key(&("users".to_string(), "gen-1".to_string())));
    }

    #[test]
    fn test_persist_updates_with_id() {
        let store = MapStore::default();
        store
            .create_related("users", Document::new("users").with_id("u1"), 0)
            .unwrap();
        let resolver = NestedResolver::new(&store, 0);
        let id = resolver
            .persist(&owner(), &json!({"$id": "u1", "name": "Renamed"}))
            .unwrap();
        assert_eq!(id, json!("u1"));
        let docs = store.docs.lock();
        let stored = docs.get(&("users".to_string(), "u1".to_string())).unwrap();
        assert_eq!(stored.get("name"), Some(&json!("Renamed")));
    }

    #[test]
    fn test_persist_with_unknown_id_creates_under_that_id() {
        let store = MapStore::default();
        let resolver = NestedResolver::new(&store, 0);
        let id = resolver.persist(&owner(), &json!({"$id": "fresh"})).unwrap();
        assert_eq!(id, json!("fresh"));
        assert_eq!(store.docs.lock().len(), 1);
    }

    #[test]
    fn test_persist_rejects_scalars() {
        let store = MapStore::default();
        let resolver = NestedResolver::new(&store, 0);
        assert!(matches!(
            resolver.persist(&owner(), &json!(12)),
            Err(DocRelError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_resolve_past_limit_keeps_id() {
        let store = MapStore {
            limit: Some(1),
            ..MapStore::default()
        };
        store
            .create_related("users", Document::new("users").with_id("u1"), 0)
            .unwrap();

        let shallow = NestedResolver::new(&store, 0);
        let resolved = shallow.resolve(&owner(), &json!("u1")).unwrap();
        assert!(resolved.is_object());
        assert_eq!(resolved["$id"], json!("u1"));

        let deep = NestedResolver::new(&store, 1);
        assert_eq!(deep.resolve(&owner(), &json!("u1")).unwrap(), json!("u1"));
    }

    #[test]
    fn test_resolve_missing_is_null() {
        let store = MapStore::default();
        let resolver = NestedResolver::new(&store, 0);
        assert_eq!(resolver.resolve(&owner(), &json!("nope")).unwrap(), Value::Null);
        assert_eq!(resolver.resolve(&owner(), &Value::Null).unwrap(), Value::Null);
    }
}
