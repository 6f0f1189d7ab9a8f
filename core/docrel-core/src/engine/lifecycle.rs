//! Schema lifecycle through the engine — DDL plus descriptor/catalog upkeep.

use crate::engine::DocumentEngine;
use crate::error::{DocRelError, DocRelResult};
use crate::model::{Attribute, Collection, Index};
use crate::schema::{SchemaManager, mocks};
use crate::sql::Namespace;
use crate::storage::Connection;
use tracing::instrument;

impl<C: Connection> DocumentEngine<C> {
    // ════════════════════════════════════════════
    // Collections
    // ════════════════════════════════════════════

    /// 컬렉션 테이블 생성 후 catalog에 등록
    #[instrument(skip(self, collection), fields(collection = collection.id()))]
    pub fn create_collection(&self, collection: &Collection) -> DocRelResult<()> {
        self.schema().create_collection(collection)?;
        self.catalog.register(collection.clone());
        Ok(())
    }

    #[instrument(skip(self, collection), fields(collection = collection.id()))]
    pub fn delete_collection(&self, collection: &Collection) -> DocRelResult<()> {
        self.schema().delete_collection(collection)?;
        self.catalog.remove(collection.id());
        Ok(())
    }

    // ════════════════════════════════════════════
    // Attributes
    // ════════════════════════════════════════════

    /// Add `attribute` to the physical schema and to `collection`.
    #[instrument(
        skip(self, collection, attribute),
        fields(collection = collection.id(), key = %attribute.key)
    )]
    pub fn create_attribute(
        &self,
        collection: &mut Collection,
        attribute: Attribute,
    ) -> DocRelResult<()> {
        if collection.attribute(&attribute.key).is_some() {
            return Err(DocRelError::DuplicateAttribute {
                collection: collection.id().to_string(),
                key: attribute.key,
            });
        }
        self.schema().create_attribute(collection.id(), &attribute)?;
        collection.add_attribute(attribute)?;
        self.catalog.register(collection.clone());
        Ok(())
    }

    /// Drop the column or child table behind `key`; the key disappears from
    /// subsequent reads.
    #[instrument(skip(self, collection), fields(collection = collection.id()))]
    pub fn delete_attribute(&self, collection: &mut Collection, key: &str) -> DocRelResult<()> {
        let attribute = collection
            .attribute(key)
            .cloned()
            .ok_or_else(|| DocRelError::UnknownAttribute {
                collection: collection.id().to_string(),
                key: key.to_string(),
                reason: "no such attribute".to_string(),
            })?;
        self.schema().delete_attribute(collection.id(), &attribute)?;
        collection.remove_attribute(key);
        self.catalog.register(collection.clone());
        Ok(())
    }

    // ════════════════════════════════════════════
    // Indexes
    // ════════════════════════════════════════════

    #[instrument(
        skip(self, collection, index),
        fields(collection = collection.id(), index = %index.id)
    )]
    pub fn create_index(&self, collection: &mut Collection, index: Index) -> DocRelResult<()> {
        self.schema().create_index(collection, &index)?;
        collection.add_index(index)?;
        self.catalog.register(collection.clone());
        Ok(())
    }

    #[instrument(skip(self, collection), fields(collection = collection.id()))]
    pub fn delete_index(&self, collection: &mut Collection, id: &str) -> DocRelResult<()> {
        self.schema().delete_index(collection.id(), id)?;
        collection.remove_index(id);
        self.catalog.register(collection.clone());
        Ok(())
    }

    // ════════════════════════════════════════════
    // Namespaces
    // ════════════════════════════════════════════

    /// Namespace 생성: bootstrap 컬렉션 + audit/abuse 테이블
    ///
    /// Partial success is possible: tables created before a failing step are
    /// left in place.
    ///
    /// The catalog holds descriptors, not tables, and is shared by every
    /// namespace on this engine. The bootstrap descriptors are (re)registered
    /// here and survive [`delete_namespace`](Self::delete_namespace), since
    /// other namespaces and the engine's own namespace still use them.
    #[instrument(skip(self))]
    pub fn create_namespace(&self, name: &str) -> DocRelResult<()> {
        let namespace = Namespace::new(name)?;
        let collections = mocks()?;
        SchemaManager::new(&self.conn, self.config.dialect, &namespace)
            .create_namespace(&collections)?;
        for collection in collections {
            self.catalog.register(collection);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete_namespace(&self, name: &str) -> DocRelResult<()> {
        let namespace = Namespace::new(name)?;
        SchemaManager::new(&self.conn, self.config.dialect, &namespace).delete_namespace(&mocks()?)
    }
}
