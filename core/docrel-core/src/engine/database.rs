//! DocumentEngine struct definition and constructors

use crate::config::EngineConfig;
use crate::engine::catalog::{CollectionCatalog, MemoryCatalog};
use crate::error::{DocRelError, DocRelResult};
use crate::schema::SchemaManager;
use crate::sql::{Namespace, SqlDialect};
use crate::storage::Connection;
use std::sync::Arc;
use tracing::{info, instrument};

/// 문서-관계 매핑 엔진
///
/// 컬렉션 단위의 primary table과 array attribute별 child table에 문서를
/// 분해하여 저장하고, 읽을 때 다시 조립합니다.
///
/// # 데이터 흐름
///
/// - **create/update**: document → codec → primary row + child rows
/// - **get**: primary row + child rows → codec → document (nested 문서 재귀 조회)
/// - **schema lifecycle**: collection / attribute / index / namespace DDL
///
/// Statements run one after another on the caller's connection with no
/// surrounding transaction.
///
/// # 예제
///
/// ```rust
/// use docrel_core::{
///     Attribute, AttributeType, Collection, Document, DocumentEngine, EngineConfig,
///     SqliteConnection, SqlDialect,
/// };
/// use serde_json::json;
///
/// # fn main() -> docrel_core::DocRelResult<()> {
/// let config = EngineConfig::new("demo").with_dialect(SqlDialect::Sqlite);
/// let engine = DocumentEngine::new(SqliteConnection::open_in_memory()?, config)?;
///
/// let notes = Collection::new("notes", vec![Attribute::new("title", AttributeType::Text)])?;
/// engine.create_collection(&notes)?;
///
/// let note = Document::new("notes").with("title", json!("hi"));
/// let created = engine.create_document(&notes, note)?;
/// let id = created.id.clone().unwrap_or_default();
/// let fetched = engine.get_document(&notes, &id)?;
/// assert_eq!(fetched.and_then(|d| d.get("title").cloned()), Some(json!("hi")));
/// # Ok(())
/// # }
/// ```
pub struct DocumentEngine<C: Connection> {
    pub(crate) conn: C,
    pub(crate) config: EngineConfig,
    pub(crate) namespace: Namespace,
    pub(crate) catalog: Arc<dyn CollectionCatalog>,
}

impl<C: Connection> DocumentEngine<C> {
    /// 엔진 생성 (bootstrap collection이 등록된 in-memory catalog 사용)
    #[instrument(skip(conn))]
    pub fn new(conn: C, config: EngineConfig) -> DocRelResult<Self> {
        let catalog = Arc::new(MemoryCatalog::with_mocks()?);
        Self::with_catalog(conn, config, catalog)
    }

    /// 외부 catalog를 사용하는 엔진 생성
    pub fn with_catalog(
        conn: C,
        config: EngineConfig,
        catalog: Arc<dyn CollectionCatalog>,
    ) -> DocRelResult<Self> {
        let namespace = config.namespace()?;
        if config.max_nesting_depth == 0 {
            return Err(DocRelError::Config(
                "max_nesting_depth must be at least 1".to_string(),
            ));
        }
        info!(
            namespace = namespace.as_str(),
            dialect = %config.dialect,
            "document engine ready"
        );
        Ok(Self {
            conn,
            config,
            namespace,
            catalog,
        })
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn dialect(&self) -> SqlDialect {
        self.config.dialect
    }

    pub fn catalog(&self) -> &Arc<dyn CollectionCatalog> {
        &self.catalog
    }

    pub(crate) fn schema(&self) -> SchemaManager<'_, C> {
        SchemaManager::new(&self.conn, self.config.dialect, &self.namespace)
    }

    pub(crate) fn check_depth(&self, depth: usize) -> DocRelResult<()> {
        if depth > self.config.max_nesting_depth {
            return Err(DocRelError::NestingTooDeep {
                depth,
                limit: self.config.max_nesting_depth,
            });
        }
        Ok(())
    }
}
