//! Attribute descriptors and the abstract attribute type system.

use crate::error::{DocRelError, DocRelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Document fields that are never stored as `col_<key>` columns.
pub const RESERVED_KEYS: [&str; 3] = ["$id", "$collection", "$permissions"];

/// Abstract attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttributeType {
    Text,
    Url,
    Key,
    Ipv4,
    Ipv6,
    Email,
    Integer,
    Float,
    Numeric,
    Boolean,
    /// Reference to a document in a related collection
    Document,
}

impl AttributeType {
    pub const ALL: [AttributeType; 11] = [
        AttributeType::Text,
        AttributeType::Url,
        AttributeType::Key,
        AttributeType::Ipv4,
        AttributeType::Ipv6,
        AttributeType::Email,
        AttributeType::Integer,
        AttributeType::Float,
        AttributeType::Numeric,
        AttributeType::Boolean,
        AttributeType::Document,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Text => "text",
            AttributeType::Url => "url",
            AttributeType::Key => "key",
            AttributeType::Ipv4 => "ipv4",
            AttributeType::Ipv6 => "ipv6",
            AttributeType::Email => "email",
            AttributeType::Integer => "integer",
            AttributeType::Float => "float",
            AttributeType::Numeric => "numeric",
            AttributeType::Boolean => "boolean",
            AttributeType::Document => "document",
        }
    }
}

impl FromStr for AttributeType {
    type Err = DocRelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| DocRelError::UnsupportedType(s.to_string()))
    }
}

impl TryFrom<String> for AttributeType {
    type Error = DocRelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AttributeType> for String {
    fn from(ty: AttributeType) -> Self {
        ty.as_str().to_string()
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a DOCUMENT attribute picks its target among the declared candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationPolicy {
    /// Always the first declared candidate
    #[default]
    FirstDeclared,
    /// A specific candidate, which must be declared
    Pinned(String),
}

/// Declared related collections plus the policy that resolves them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default)]
    pub candidates: Vec<String>,
    #[serde(default)]
    pub policy: RelationPolicy,
}

impl Relation {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            policy: RelationPolicy::FirstDeclared,
        }
    }

    pub fn with_policy(mut self, policy: RelationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Resolve the collection a DOCUMENT attribute points at.
    pub fn target(&self, attribute: &str) -> DocRelResult<&str> {
        let found = match &self.policy {
            RelationPolicy::FirstDeclared => self.candidates.first(),
            RelationPolicy::Pinned(id) => self.candidates.iter().find(|c| *c == id),
        };
        found.map(String::as_str).ok_or_else(|| DocRelError::Relation {
            attribute: attribute.to_string(),
            message: match &self.policy {
                RelationPolicy::FirstDeclared => "no related collection declared".to_string(),
                RelationPolicy::Pinned(id) => format!("pinned collection '{id}' is not declared"),
            },
        })
    }
}

/// A typed, possibly repeated document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    #[serde(default)]
    pub array: bool,
    #[serde(default, skip_serializing_if = "Relation::is_empty")]
    pub relation: Relation,
}

impl Attribute {
    pub fn new(key: impl Into<String>, kind: AttributeType) -> Self {
        Self {
            key: key.into(),
            kind,
            array: false,
            relation: Relation::default(),
        }
    }

    /// A DOCUMENT attribute referencing `related` collections.
    pub fn document<I, S>(key: impl Into<String>, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, AttributeType::Document).with_relation(Relation::new(related))
    }

    pub fn with_array(mut self, array: bool) -> Self {
        self.array = array;
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = relation;
        self
    }

    pub fn is_reserved(&self) -> bool {
        RESERVED_KEYS.contains(&self.key.as_str())
    }

    pub fn is_document(&self) -> bool {
        self.kind == AttributeType::Document
    }
}
