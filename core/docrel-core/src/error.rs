//! Error types for the docrel mapping engine.
//!
//! All public APIs return `DocRelResult<T>`.
//! Nothing in this crate retries or swallows a failure; every variant is
//! surfaced synchronously to the immediate caller.

use thiserror::Error;

/// Unified error type for all docrel operations.
#[derive(Debug, Error)]
pub enum DocRelError {
    /// Attribute type outside the supported set
    #[error("unsupported attribute type: {0}")]
    UnsupportedType(String),

    /// Index kind outside KEY / UNIQUE / FULLTEXT / SPATIAL
    #[error("unsupported index kind: {0}")]
    UnsupportedIndexKind(String),

    /// DDL execution failure (duplicate object, invalid identifier, engine constraint)
    #[error("schema error: {message}\nStatement: {statement}")]
    Schema { message: String, statement: String },

    /// Unique constraint violation on insert
    #[error("duplicate entry: {0}")]
    Duplicate(String),

    /// Filter expression did not split into exactly two non-empty parts
    #[error("invalid filter expression: '{0}'")]
    InvalidExpression(String),

    /// Filter expression contains no recognized operator
    #[error("invalid operator in filter: '{0}'")]
    InvalidOperator(String),

    /// Namespace name is empty or malformed
    #[error("invalid namespace: '{0}'")]
    InvalidNamespace(String),

    /// Identifier rejected by the allow-list
    #[error("invalid {kind} identifier: '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },

    /// Attribute key declared twice in one collection
    #[error("attribute '{key}' already exists in collection '{collection}'")]
    DuplicateAttribute { collection: String, key: String },

    /// Attribute is missing, or cannot be used where it was referenced
    #[error("attribute '{key}' is not usable in collection '{collection}': {reason}")]
    UnknownAttribute {
        collection: String,
        key: String,
        reason: String,
    },

    /// Value cannot be coerced to the attribute's binding type
    #[error("type mismatch for '{attribute}': expected {expected}, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Collection descriptor unknown to the catalog
    #[error("collection '{0}' not found")]
    CollectionNotFound(String),

    /// Update targeted a document that does not exist
    #[error("document '{id}' not found in collection '{collection}'")]
    DocumentNotFound { collection: String, id: String },

    /// Nested document resolution exceeded the configured depth
    #[error("nested document depth {depth} exceeds limit {limit}")]
    NestingTooDeep { depth: usize, limit: usize },

    /// Relation policy could not pick a related collection
    #[error("relation error on '{attribute}': {message}")]
    Relation { attribute: String, message: String },

    /// Feature the selected SQL dialect cannot express
    #[error("not supported: {feature}\nHint: {hint}")]
    NotSupported { feature: String, hint: String },

    /// Relational engine failure outside DDL
    #[error("engine error: {0}")]
    Engine(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid engine configuration
    #[error("config error: {0}")]
    Config(String),

    /// Standard I/O error
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Result type alias for all docrel operations.
pub type DocRelResult<T> = Result<T, DocRelError>;

impl DocRelError {
    /// Wrap a failure raised while executing a DDL statement.
    pub(crate) fn schema(statement: &str, source: DocRelError) -> Self {
        let message = match source {
            DocRelError::Engine(message) | DocRelError::Duplicate(message) => message,
            other => other.to_string(),
        };
        DocRelError::Schema {
            message,
            statement: statement.to_string(),
        }
    }
}

impl From<serde_json::Error> for DocRelError {
    fn from(err: serde_json::Error) -> Self {
        DocRelError::Serialization(err.to_string())
    }
}
