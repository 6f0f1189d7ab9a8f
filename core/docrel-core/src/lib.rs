//! # docrel — Document-Relational Mapping Engine
//!
//! docrel은 스키마가 유연한 문서 모델을 관계형 테이블에 저장하는 매핑 엔진입니다.
//! 컬렉션마다 primary table 하나를 두고, array attribute는 전용 child table로
//! 분해하며, DOCUMENT 타입 attribute는 참조 문서의 id로 저장합니다.
//!
//! ## 주요 특징
//!
//! - **Schema derivation**: attribute 스키마 → 테이블 / 컬럼 / 인덱스 DDL
//! - **Document codec**: 문서 ⇄ primary row + child rows
//! - **Nested documents**: 참조 문서의 재귀 생성 / 수정 / 조회 (깊이 제한)
//! - **SQL dialects**: MySQL (canonical layout), SQLite (embedded, 테스트용)
//! - **Filter splitter**: `key<op>value` 표현식 분해
//!
//! ## 빠른 시작
//!
//! ```rust
//! use docrel_core::{
//!     Attribute, AttributeType, Collection, Document, DocumentEngine, EngineConfig,
//!     SqliteConnection, SqlDialect,
//! };
//! use serde_json::json;
//!
//! # fn main() -> docrel_core::DocRelResult<()> {
//! let config = EngineConfig::new("quickstart").with_dialect(SqlDialect::Sqlite);
//! let engine = DocumentEngine::new(SqliteConnection::open_in_memory()?, config)?;
//!
//! // 컬렉션 생성: name (TEXT), scores (INTEGER array → child table)
//! let players = Collection::new(
//!     "players",
//!     vec![
//!         Attribute::new("name", AttributeType::Text),
//!         Attribute::new("scores", AttributeType::Integer).with_array(true),
//!     ],
//! )?;
//! engine.create_collection(&players)?;
//!
//! // 문서 생성 및 조회
//! let doc = Document::new("players")
//!     .with("name", json!("a"))
//!     .with("scores", json!([1, 2, 3]));
//! let created = engine.create_document(&players, doc)?;
//! let id = created.id.clone().unwrap_or_default();
//!
//! let fetched = engine.get_document(&players, &id)?;
//! assert!(fetched.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## 저장 레이아웃
//!
//! ```text
//! primary table   app_<namespace>.collection.<collectionId>
//! child table     app_<namespace>.collection.<collectionId>.<attributeKey>
//! column          col_<attributeKey>
//! index           index_<indexId>
//! ```
//!
//! ## 모듈 구조
//!
//! - [`engine`] — 문서 엔진 ([`DocumentEngine`]), catalog, find/count
//! - [`schema`] — type mapper, DDL schema manager, bootstrap collections
//! - [`codec`] — document codec, nested resolver, value coercion
//! - [`model`] — attribute / collection / index / document descriptors
//! - [`sql`] — identifier builder, dialects, DML text, filter splitter
//! - [`storage`] — relational engine boundary (+ SQLite adapter)

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod schema;
pub mod sql;
pub mod storage;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use codec::{DocumentStore, NestedResolver};
pub use config::EngineConfig;
pub use engine::{CollectionCatalog, DocumentEngine, FindOptions, MemoryCatalog};
pub use error::{DocRelError, DocRelResult};
pub use model::{
    Attribute, AttributeType, Collection, Document, Index, IndexKind, Relation, RelationPolicy,
};
pub use sql::{Namespace, SqlDialect};
pub use storage::{Connection, ParamValue, PreparedStatement, Query, Row, SqlValue};

#[cfg(feature = "sqlite")]
pub use storage::SqliteConnection;
