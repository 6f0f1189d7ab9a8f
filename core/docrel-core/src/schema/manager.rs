//! DDL issuing for collection, attribute, index and namespace lifecycle.
//!
//! No operation checks for existing objects first, and none rolls back
//! earlier statements when a later one fails: the caller orders calls and
//! runs schema changes exclusively.

use crate::error::{DocRelError, DocRelResult};
use crate::model::{Attribute, Collection, Index};
use crate::schema::type_map::column_clause;
use crate::sql::naming::{self, ABUSE_TEMPLATE, AUDIT_TEMPLATE, Namespace};
use crate::sql::SqlDialect;
use crate::storage::{Connection, Query};
use tracing::{info, instrument, warn};

/// Schema lifecycle against one namespace.
pub struct SchemaManager<'a, C: Connection + ?Sized> {
    conn: &'a C,
    dialect: SqlDialect,
    namespace: &'a Namespace,
}

impl<'a, C: Connection + ?Sized> SchemaManager<'a, C> {
    pub fn new(conn: &'a C, dialect: SqlDialect, namespace: &'a Namespace) -> Self {
        Self {
            conn,
            dialect,
            namespace,
        }
    }

    fn execute(&self, statement: &str) -> DocRelResult<()> {
        Query::new(statement)
            .execute(self.conn)
            .map_err(|e| DocRelError::schema(statement, e))
    }

    fn execute_all(&self, statements: &[String]) -> DocRelResult<()> {
        statements.iter().try_for_each(|s| self.execute(s))
    }

    // ════════════════════════════════════════════
    // Collections
    // ════════════════════════════════════════════

    /// Primary table with one column per non-array attribute, then one
    /// child table per array attribute.
    #[instrument(skip_all, fields(collection = collection.id()))]
    pub fn create_collection(&self, collection: &Collection) -> DocRelResult<()> {
        let table = self.namespace.collection_table(collection.id())?;

        let columns = collection
            .stored_attributes()
            .filter(|a| !a.array)
            .map(|a| column_clause(&a.key, a.kind))
            .collect::<DocRelResult<Vec<_>>>()?;
        self.execute_all(&self.dialect.create_primary_table(&table, &columns))?;

        for attribute in collection.stored_attributes().filter(|a| a.array) {
            if let Err(e) = self.create_child_table(collection.id(), attribute) {
                warn!(
                    attribute = %attribute.key,
                    "child table creation failed after primary table was created"
                );
                return Err(e);
            }
        }

        info!(table = %table, "collection created");
        Ok(())
    }

    /// Drops the primary table first; a failure there leaves child tables untouched.
    #[instrument(skip_all, fields(collection = collection.id()))]
    pub fn delete_collection(&self, collection: &Collection) -> DocRelResult<()> {
        let table = self.namespace.collection_table(collection.id())?;
        self.execute(&self.dialect.drop_table(&table))?;

        for attribute in collection.stored_attributes().filter(|a| a.array) {
            let child = self.namespace.child_table(collection.id(), &attribute.key)?;
            if let Err(e) = self.execute(&self.dialect.drop_table(&child)) {
                warn!(table = %child, "child table drop failed after primary table was dropped");
                return Err(e);
            }
        }

        info!(table = %table, "collection deleted");
        Ok(())
    }

    // ════════════════════════════════════════════
    // Attributes
    // ════════════════════════════════════════════

    fn create_child_table(&self, collection: &str, attribute: &Attribute) -> DocRelResult<()> {
        let child = self.namespace.child_table(collection, &attribute.key)?;
        let value_column = column_clause(&attribute.key, attribute.kind)?;
        self.execute_all(&self.dialect.create_child_table(&child, &value_column))
    }

    /// Array attributes get a child table, others a new primary-table column.
    #[instrument(skip_all, fields(collection = collection, key = %attribute.key))]
    pub fn create_attribute(&self, collection: &str, attribute: &Attribute) -> DocRelResult<()> {
        if attribute.array {
            return self.create_child_table(collection, attribute);
        }
        let table = self.namespace.collection_table(collection)?;
        let clause = column_clause(&attribute.key, attribute.kind)?;
        self.execute(&self.dialect.add_column(&table, &clause))
    }

    #[instrument(skip_all, fields(collection = collection, key = %attribute.key))]
    pub fn delete_attribute(&self, collection: &str, attribute: &Attribute) -> DocRelResult<()> {
        if attribute.array {
            let child = self.namespace.child_table(collection, &attribute.key)?;
            return self.execute(&self.dialect.drop_table(&child));
        }
        let table = self.namespace.collection_table(collection)?;
        let column = naming::column(&attribute.key)?;
        self.execute(&self.dialect.drop_column(&table, &column))
    }

    // ════════════════════════════════════════════
    // Indexes
    // ════════════════════════════════════════════

    /// Composite index over non-array attribute columns.
    ///
    /// Keys are checked against the descriptor before any statement runs.
    #[instrument(skip_all, fields(collection = collection.id(), index = %index.id))]
    pub fn create_index(&self, collection: &Collection, index: &Index) -> DocRelResult<()> {
        collection.validate_index_keys(&index.attributes)?;
        let table = self.namespace.collection_table(collection.id())?;
        let name = naming::index(&index.id)?;
        let columns = index
            .attributes
            .iter()
            .map(|key| naming::column(key))
            .collect::<DocRelResult<Vec<_>>>()?;
        let statement = self.dialect.create_index(&table, &name, index.kind, &columns)?;
        self.execute(&statement)
    }

    #[instrument(skip_all, fields(collection = collection, index = id))]
    pub fn delete_index(&self, collection: &str, id: &str) -> DocRelResult<()> {
        let table = self.namespace.collection_table(collection)?;
        let name = naming::index(id)?;
        self.execute(&self.dialect.drop_index(&table, &name))
    }

    // ════════════════════════════════════════════
    // Namespaces
    // ════════════════════════════════════════════

    /// Provision `collections` (tables plus declared indexes), then clone the
    /// audit and abuse tables from their templates.
    #[instrument(skip_all, fields(namespace = self.namespace.as_str()))]
    pub fn create_namespace(&self, collections: &[Collection]) -> DocRelResult<()> {
        let mut applied = 0usize;
        let result = (|| {
            for collection in collections {
                self.create_collection(collection)?;
                applied += 1;
                for index in collection.indexes() {
                    self.create_index(collection, index)?;
                }
            }
            self.execute(&self.dialect.clone_table(&self.namespace.audit_table(), AUDIT_TEMPLATE))?;
            self.execute(&self.dialect.clone_table(&self.namespace.abuse_table(), ABUSE_TEMPLATE))
        })();

        if let Err(e) = result {
            if applied > 0 {
                warn!(collections_created = applied, "namespace creation failed part way");
            }
            return Err(e);
        }
        info!(collections = collections.len(), "namespace created");
        Ok(())
    }

    #[instrument(skip_all, fields(namespace = self.namespace.as_str()))]
    pub fn delete_namespace(&self, collections: &[Collection]) -> DocRelResult<()> {
        let mut dropped = 0usize;
        let result = (|| {
            for collection in collections {
                self.delete_collection(collection)?;
                dropped += 1;
            }
            self.execute(&self.dialect.drop_table(&self.namespace.audit_table()))?;
            self.execute(&self.dialect.drop_table(&self.namespace.abuse_table()))
        })();

        if let Err(e) = result {
            if dropped > 0 {
                warn!(collections_dropped = dropped, "namespace deletion failed part way");
            }
            return Err(e);
        }
        info!(collections = collections.len(), "namespace deleted");
        Ok(())
    }
}
