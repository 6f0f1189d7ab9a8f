//! Engine configuration — namespace, SQL dialect, nesting limit.
//!
//! Loaded from code (`with_*` setters), environment variables or a JSON file.

use crate::error::{DocRelError, DocRelResult};
use crate::sql::{Namespace, SqlDialect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const ENV_NAMESPACE: &str = "DOCREL_NAMESPACE";
pub const ENV_DIALECT: &str = "DOCREL_DIALECT";
pub const ENV_MAX_NESTING_DEPTH: &str = "DOCREL_MAX_NESTING_DEPTH";

/// 기본 namespace
pub const DEFAULT_NAMESPACE: &str = "default";
/// 기본 nested document 깊이 제한
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 8;

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

/// 엔진 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tenant prefix for every table name
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Statement flavour for DDL
    #[serde(default)]
    pub dialect: SqlDialect,

    /// Deepest nested document level resolved before failing
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

impl EngineConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// 환경 변수에서 로드 (설정되지 않은 값은 기본값 유지)
    pub fn from_env() -> DocRelResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DocRelResult<Self> {
        let mut config = Self::default();
        if let Some(namespace) = lookup(ENV_NAMESPACE) {
            config.namespace = namespace;
        }
        if let Some(dialect) = lookup(ENV_DIALECT) {
            config.dialect = dialect.parse()?;
        }
        if let Some(depth) = lookup(ENV_MAX_NESTING_DEPTH) {
            config.max_nesting_depth = depth.trim().parse().map_err(|_| {
                DocRelError::Config(format!(
                    "{ENV_MAX_NESTING_DEPTH} must be an integer, got '{depth}'"
                ))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// JSON 파일에서 로드
    pub fn from_json_file(path: impl AsRef<Path>) -> DocRelResult<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| DocRelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DocRelResult<()> {
        self.namespace().map(|_| ())
    }

    /// Validated namespace.
    pub fn namespace(&self) -> DocRelResult<Namespace> {
        Namespace::new(self.namespace.clone())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            dialect: SqlDialect::default(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}
