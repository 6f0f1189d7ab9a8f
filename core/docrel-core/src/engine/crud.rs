//! DocumentEngine CRUD Operations — create, get, update, delete

use crate::codec::{DocumentStore, EncodedDocument, NestedResolver, decode, encode};
use crate::engine::DocumentEngine;
use crate::error::{DocRelError, DocRelResult};
use crate::model::{Collection, Document};
use crate::sql::statements::{
    self, CREATED_AT, PERMISSIONS, UID, UPDATED_AT, column_placeholder,
};
use crate::storage::{Connection, ParamValue, Query};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::instrument;

/// `YYYY-MM-DD HH:MM:SS` in UTC
fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl<C: Connection> DocumentEngine<C> {
    // ════════════════════════════════════════════
    // CREATE Operations
    // ════════════════════════════════════════════

    /// 문서를 생성합니다.
    ///
    /// `$id`가 없으면 UUID를 할당하고, nested 문서를 먼저 저장한 뒤 primary
    /// row와 array attribute별 child row를 차례로 삽입합니다.
    /// A unique-index violation surfaces as `Duplicate`; rows written before a
    /// failing statement stay in place.
    #[instrument(skip(self, collection, data), fields(collection = collection.id()))]
    pub fn create_document(
        &self,
        collection: &Collection,
        data: Document,
    ) -> DocRelResult<Document> {
        self.create_at(collection, data, 0)
    }

    pub(crate) fn create_at(
        &self,
        collection: &Collection,
        mut data: Document,
        depth: usize,
    ) -> DocRelResult<Document> {
        self.check_depth(depth)?;
        let id = data.id.clone().unwrap_or_else(new_id);
        prepare_document(&mut data, collection, &id);

        let resolver = NestedResolver::new(self, depth);
        let encoded = encode(collection, &id, &data, &resolver)?;

        let table = self.namespace.collection_table(collection.id())?;
        let now = timestamp();
        let mut columns = vec![
            (UID.to_string(), ":uid".to_string()),
            (CREATED_AT.to_string(), ":createdAt".to_string()),
            (UPDATED_AT.to_string(), ":updatedAt".to_string()),
            (PERMISSIONS.to_string(), ":permissions".to_string()),
        ];
        columns.extend(
            encoded
                .columns
                .iter()
                .enumerate()
                .map(|(i, c)| (c.column.clone(), column_placeholder(i))),
        );

        let insert = Query::new(statements::insert(&table, &columns))
            .bind(":uid", ParamValue::from(id.as_str()))
            .bind(":createdAt", ParamValue::from(now.as_str()))
            .bind(":updatedAt", ParamValue::from(now))
            .bind(":permissions", ParamValue::from(encoded.permissions.as_str()));
        bind_columns(insert, &encoded).execute(&self.conn)?;

        self.insert_children(collection, &encoded)?;
        Ok(data)
    }

    fn insert_children(
        &self,
        collection: &Collection,
        encoded: &EncodedDocument,
    ) -> DocRelResult<()> {
        for child in &encoded.children {
            let table = self.namespace.child_table(collection.id(), &child.key)?;
            let sql = statements::insert(
                &table,
                &[
                    (UID.to_string(), ":uid".to_string()),
                    (child.column.clone(), column_placeholder(0)),
                ],
            );
            for value in &child.values {
                Query::new(sql.as_str())
                    .bind(":uid", ParamValue::from(encoded.id.as_str()))
                    .bind(column_placeholder(0), value.clone())
                    .execute(&self.conn)?;
            }
        }
        Ok(())
    }

    // ════════════════════════════════════════════
    // READ Operations
    // ════════════════════════════════════════════

    /// 문서를 조회합니다. 없으면 `None`을 반환합니다 (에러 아님).
    #[instrument(skip(self, collection), fields(collection = collection.id()))]
    pub fn get_document(
        &self,
        collection: &Collection,
        id: &str,
    ) -> DocRelResult<Option<Document>> {
        self.get_at(collection, id, 0)
    }

    pub(crate) fn get_at(
        &self,
        collection: &Collection,
        id: &str,
        depth: usize,
    ) -> DocRelResult<Option<Document>> {
        self.check_depth(depth)?;
        let table = self.namespace.collection_table(collection.id())?;
        let Some(primary) = Query::new(statements::select_by_uid(&table))
            .bind(":uid", ParamValue::from(id))
            .fetch_one(&self.conn)?
        else {
            return Ok(None);
        };

        let mut children = HashMap::new();
        for attribute in collection.stored_attributes().filter(|a| a.array) {
            let child = self.namespace.child_table(collection.id(), &attribute.key)?;
            let column = crate::sql::naming::column(&attribute.key)?;
            let rows = Query::new(statements::select_column_by_uid(&child, &column))
                .bind(":uid", ParamValue::from(id))
                .fetch_all(&self.conn)?;
            children.insert(attribute.key.clone(), rows);
        }

        let resolver = NestedResolver::new(self, depth);
        decode(collection, &primary, &children, &resolver).map(Some)
    }

    fn exists(&self, collection: &Collection, id: &str) -> DocRelResult<bool> {
        let table = self.namespace.collection_table(collection.id())?;
        let row = Query::new(statements::select_column_by_uid(&table, UID))
            .bind(":uid", ParamValue::from(id))
            .fetch_one(&self.conn)?;
        Ok(row.is_some())
    }

    // ════════════════════════════════════════════
    // UPDATE Operations
    // ════════════════════════════════════════════

    /// 문서 전체를 덮어씁니다.
    ///
    /// The identifier is always `id`; a `$id` inside `data` is ignored.
    /// Attributes missing from `data` become NULL and their child rows are
    /// removed. `createdAt` is kept.
    #[instrument(skip(self, collection, data), fields(collection = collection.id()))]
    pub fn update_document(
        &self,
        collection: &Collection,
        id: &str,
        data: Document,
    ) -> DocRelResult<Document> {
        self.update_at(collection, id, data, 0)
    }

    pub(crate) fn update_at(
        &self,
        collection: &Collection,
        id: &str,
        mut data: Document,
        depth: usize,
    ) -> DocRelResult<Document> {
        self.check_depth(depth)?;
        if !self.exists(collection, id)? {
            return Err(DocRelError::DocumentNotFound {
                collection: collection.id().to_string(),
                id: id.to_string(),
            });
        }
        prepare_document(&mut data, collection, id);

        let resolver = NestedResolver::new(self, depth);
        let encoded = encode(collection, id, &data, &resolver)?;

        let table = self.namespace.collection_table(collection.id())?;
        let mut assignments = vec![
            (UPDATED_AT.to_string(), ":updatedAt".to_string()),
            (PERMISSIONS.to_string(), ":permissions".to_string()),
        ];
        assignments.extend(
            encoded
                .columns
                .iter()
                .enumerate()
                .map(|(i, c)| (c.column.clone(), column_placeholder(i))),
        );
        let update = Query::new(statements::update_by_uid(&table, &assignments))
            .bind(":uid", ParamValue::from(id))
            .bind(":updatedAt", ParamValue::from(timestamp()))
            .bind(":permissions", ParamValue::from(encoded.permissions.as_str()));
        bind_columns(update, &encoded).execute(&self.conn)?;

        self.delete_children(collection, id)?;
        self.insert_children(collection, &encoded)?;
        Ok(data)
    }

    // ════════════════════════════════════════════
    // DELETE Operations
    // ════════════════════════════════════════════

    /// 문서를 삭제합니다 (primary row + 모든 child rows).
    ///
    /// Deleting a missing id is not an error.
    #[instrument(skip(self, collection), fields(collection = collection.id()))]
    pub fn delete_document(&self, collection: &Collection, id: &str) -> DocRelResult<()> {
        let table = self.namespace.collection_table(collection.id())?;
        Query::new(statements::delete_by_uid(&table))
            .bind(":uid", ParamValue::from(id))
            .execute(&self.conn)?;
        self.delete_children(collection, id)
    }

    fn delete_children(&self, collection: &Collection, id: &str) -> DocRelResult<()> {
        for attribute in collection.stored_attributes().filter(|a| a.array) {
            let child = self.namespace.child_table(collection.id(), &attribute.key)?;
            Query::new(statements::delete_by_uid(&child))
                .bind(":uid", ParamValue::from(id))
                .execute(&self.conn)?;
        }
        Ok(())
    }

    /// 레거시 generic storage 삭제 경로.
    ///
    /// Removes `id` from `<ns>.database.documents` (by `uid`),
    /// `<ns>.database.properties` (by `documentUid`) and
    /// `<ns>.database.relationships` (as `start` or `end`). Deployments that
    /// still carry the generic three-table layout use this instead of
    /// [`delete_document`](Self::delete_document).
    #[instrument(skip(self))]
    pub fn delete_legacy_document(&self, id: &str) -> DocRelResult<()> {
        let [documents, properties, relationships] = self.namespace.legacy_tables();
        Query::new(statements::delete_by_uid(&documents))
            .bind(":uid", ParamValue::from(id))
            .execute(&self.conn)?;
        Query::new(statements::delete_by_column(&properties, "documentUid"))
            .bind(":id", ParamValue::from(id))
            .execute(&self.conn)?;
        Query::new(statements::delete_relationships(&relationships))
            .bind(":id", ParamValue::from(id))
            .execute(&self.conn)
    }

    fn lookup(&self, collection: &str) -> DocRelResult<Collection> {
        self.catalog
            .collection(collection)
            .ok_or_else(|| DocRelError::CollectionNotFound(collection.to_string()))
    }
}

fn prepare_document(data: &mut Document, collection: &Collection, id: &str) {
    data.id = Some(id.to_string());
    data.collection = collection.id().to_string();
    if data.permissions.is_null() {
        data.permissions = Value::Object(Map::new());
    }
}

fn bind_columns(mut query: Query, encoded: &EncodedDocument) -> Query {
    for (i, column) in encoded.columns.iter().enumerate() {
        query = query.bind(column_placeholder(i), column.value.clone());
    }
    query
}

impl<C: Connection> DocumentStore for DocumentEngine<C> {
    fn create_related(
        &self,
        collection: &str,
        data: Document,
        depth: usize,
    ) -> DocRelResult<Document> {
        let collection = self.lookup(collection)?;
        self.create_at(&collection, data, depth)
    }

    fn update_related(
        &self,
        collection: &str,
        id: &str,
        data: Document,
        depth: usize,
    ) -> DocRelResult<Document> {
        let collection = self.lookup(collection)?;
        self.update_at(&collection, id, data, depth)
    }

    fn get_related(
        &self,
        collection: &str,
        id: &str,
        depth: usize,
    ) -> DocRelResult<Option<Document>> {
        let collection = self.lookup(collection)?;
        self.get_at(&collection, id, depth)
    }
}
