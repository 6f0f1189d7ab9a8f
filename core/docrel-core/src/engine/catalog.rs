//! Collection catalog — metadata lookup used by nested resolution.

use crate::error::DocRelResult;
use crate::model::Collection;
use crate::schema::mocks;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Resolves collection ids to descriptors.
pub trait CollectionCatalog: Send + Sync {
    fn collection(&self, id: &str) -> Option<Collection>;

    /// Insert or replace a descriptor.
    fn register(&self, collection: Collection);

    fn remove(&self, id: &str) -> Option<Collection>;
}

/// In-memory catalog
#[derive(Default)]
pub struct MemoryCatalog {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-loaded with the bootstrap collections.
    pub fn with_mocks() -> DocRelResult<Self> {
        let catalog = Self::new();
        for collection in mocks()? {
            catalog.register(collection);
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.collections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.read().is_empty()
    }
}

impl CollectionCatalog for MemoryCatalog {
    fn collection(&self, id: &str) -> Option<Collection> {
        self.collections.read().get(id).cloned()
    }

    fn register(&self, collection: Collection) {
        self.collections
            .write()
            .insert(collection.id().to_string(), collection);
    }

    fn remove(&self, id: &str) -> Option<Collection> {
        self.collections.write().remove(id)
    }
}
