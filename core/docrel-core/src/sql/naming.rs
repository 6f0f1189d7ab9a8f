//! Identifier builder — deterministic, injection-safe table/column/index names.
//!
//! Every component (namespace, collection id, attribute key, index id) is
//! validated against `[A-Za-z0-9_-]{1,64}` before it reaches a statement, so
//! quoting with backticks can never be broken out of.
//!
//! Layout (persisted state, kept stable):
//!
//! ```text
//! primary table   app_<namespace>.collection.<collectionId>
//! child table     app_<namespace>.collection.<collectionId>.<attributeKey>
//! column          col_<attributeKey>
//! index           index_<indexId>
//! audit / abuse   app_<namespace>.audit.audit / app_<namespace>.abuse.abuse
//! ```

use crate::error::{DocRelError, DocRelResult};
use std::fmt;

/// Maximum length of a single identifier component.
pub const MAX_COMPONENT_LEN: usize = 64;

/// Template the per-namespace audit table is cloned from.
pub const AUDIT_TEMPLATE: &str = "template.audit.audit";
/// Template the per-namespace abuse table is cloned from.
pub const ABUSE_TEMPLATE: &str = "template.abuse.abuse";

/// Check one identifier component against the allow-list.
pub fn validate_component(kind: &'static str, value: &str) -> DocRelResult<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
    if value.is_empty() || value.len() > MAX_COMPONENT_LEN || !value.chars().all(allowed) {
        return Err(DocRelError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Wrap an already-built name in backticks.
pub fn quote(name: &str) -> String {
    format!("`{name}`")
}

/// Validated namespace (tenant prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> DocRelResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DocRelError::InvalidNamespace(name));
        }
        validate_component("namespace", &name)
            .map_err(|_| DocRelError::InvalidNamespace(name.clone()))?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `app_<namespace>.collection.<collection>`
    pub fn collection_table(&self, collection: &str) -> DocRelResult<String> {
        validate_component("collection", collection)?;
        Ok(format!("app_{}.collection.{collection}", self.0))
    }

    /// `app_<namespace>.collection.<collection>.<key>`
    pub fn child_table(&self, collection: &str, key: &str) -> DocRelResult<String> {
        validate_component("attribute", key)?;
        Ok(format!("{}.{key}", self.collection_table(collection)?))
    }

    pub fn audit_table(&self) -> String {
        format!("app_{}.audit.audit", self.0)
    }

    pub fn abuse_table(&self) -> String {
        format!("app_{}.abuse.abuse", self.0)
    }

    /// Tables of the generic legacy layout: documents, properties, relationships.
    pub fn legacy_tables(&self) -> [String; 3] {
        [
            format!("{}.database.documents", self.0),
            format!("{}.database.properties", self.0),
            format!("{}.database.relationships", self.0),
        ]
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `col_<key>`
pub fn column(key: &str) -> DocRelResult<String> {
    validate_component("attribute", key)?;
    Ok(format!("col_{key}"))
}

/// `index_<id>`
pub fn index(id: &str) -> DocRelResult<String> {
    validate_component("index", id)?;
    Ok(format!("index_{id}"))
}
