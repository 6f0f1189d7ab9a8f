//! Collection and index descriptors.

use crate::error::{DocRelError, DocRelResult};
use crate::model::attribute::Attribute;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical index kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IndexKind {
    Key,
    Unique,
    Fulltext,
    Spatial,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Key => "key",
            IndexKind::Unique => "unique",
            IndexKind::Fulltext => "fulltext",
            IndexKind::Spatial => "spatial",
        }
    }
}

impl FromStr for IndexKind {
    type Err = DocRelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "key" => Ok(IndexKind::Key),
            "unique" => Ok(IndexKind::Unique),
            "fulltext" => Ok(IndexKind::Fulltext),
            "spatial" => Ok(IndexKind::Spatial),
            other => Err(DocRelError::UnsupportedIndexKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for IndexKind {
    type Error = DocRelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IndexKind> for String {
    fn from(kind: IndexKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite index over non-array attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IndexKind,
    pub attributes: Vec<String>,
}

impl Index {
    pub fn new<I, S>(id: impl Into<String>, kind: IndexKind, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            kind,
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawCollection {
    id: String,
    #[serde(default, alias = "rules")]
    attributes: Vec<Attribute>,
    #[serde(default)]
    indexes: Vec<Index>,
}

/// A named document type: one primary table plus one child table per array attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCollection")]
pub struct Collection {
    id: String,
    attributes: Vec<Attribute>,
    indexes: Vec<Index>,
}

impl TryFrom<RawCollection> for Collection {
    type Error = DocRelError;

    fn try_from(raw: RawCollection) -> Result<Self, Self::Error> {
        let mut collection = Collection::new(raw.id, raw.attributes)?;
        for index in raw.indexes {
            collection.add_index(index)?;
        }
        Ok(collection)
    }
}

impl Collection {
    /// Build a descriptor, rejecting duplicate attribute keys.
    pub fn new(id: impl Into<String>, attributes: Vec<Attribute>) -> DocRelResult<Self> {
        let mut collection = Self {
            id: id.into(),
            attributes: Vec::with_capacity(attributes.len()),
            indexes: Vec::new(),
        };
        for attribute in attributes {
            collection.add_attribute(attribute)?;
        }
        Ok(collection)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.key == key)
    }

    /// Attributes that map to storage (reserved keys excluded).
    pub fn stored_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| !a.is_reserved())
    }

    pub fn add_attribute(&mut self, attribute: Attribute) -> DocRelResult<()> {
        if self.attribute(&attribute.key).is_some() {
            return Err(DocRelError::DuplicateAttribute {
                collection: self.id.clone(),
                key: attribute.key,
            });
        }
        self.attributes.push(attribute);
        Ok(())
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<Attribute> {
        let pos = self.attributes.iter().position(|a| a.key == key)?;
        Some(self.attributes.remove(pos))
    }

    /// Every key must name an existing, stored, non-array attribute.
    pub fn validate_index_keys(&self, keys: &[String]) -> DocRelResult<()> {
        if keys.is_empty() {
            return Err(DocRelError::UnknownAttribute {
                collection: self.id.clone(),
                key: String::new(),
                reason: "index needs at least one attribute".to_string(),
            });
        }
        for key in keys {
            let reason = match self.attribute(key) {
                None => "no such attribute",
                Some(a) if a.is_reserved() => "reserved attributes are not columns",
                Some(a) if a.array => "array attributes live in child tables",
                Some(_) => continue,
            };
            return Err(DocRelError::UnknownAttribute {
                collection: self.id.clone(),
                key: key.clone(),
                reason: reason.to_string(),
            });
        }
        Ok(())
    }

    pub fn add_index(&mut self, index: Index) -> DocRelResult<()> {
        self.validate_index_keys(&index.attributes)?;
        self.indexes.retain(|i| i.id != index.id);
        self.indexes.push(index);
        Ok(())
    }

    pub fn remove_index(&mut self, id: &str) -> Option<Index> {
        let pos = self.indexes.iter().position(|i| i.id == id)?;
        Some(self.indexes.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeType;

    fn users() -> Collection {
        Collection::new(
            "users",
            vec![
                Attribute::new("name", AttributeType::Text),
                Attribute::new("tags", AttributeType::Text).with_array(true),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let err = Collection::new(
            "users",
            vec![
                Attribute::new("name", AttributeType::Text),
                Attribute::new("name", AttributeType::Email),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, DocRelError::DuplicateAttribute { key, .. } if key == "name"));
    }

    #[test]
    fn test_index_kind_parse() {
        assert_eq!("unique".parse::<IndexKind>().unwrap(), IndexKind::Unique);
        assert!(matches!(
            "btree".parse::<IndexKind>(),
            Err(DocRelError::UnsupportedIndexKind(k)) if k == "btree"
        ));
    }

    #[test]
    fn test_index_over_array_rejected() {
        let mut users = users();
        let err = users
            .add_index(Index::new("byTags", IndexKind::Key, ["tags"]))
            .unwrap_err();
        assert!(matches!(err, DocRelError::UnknownAttribute { .. }));
        assert!(users
            .add_index(Index::new("byName", IndexKind::Key, ["name"]))
            .is_ok());
        assert_eq!(users.indexes().len(), 1);
    }

    #[test]
    fn test_remove_attribute() {
        let mut users = users();
        assert!(users.remove_attribute("name").is_some());
        assert!(users.attribute("name").is_none());
        assert!(users.remove_attribute("name").is_none());
    }

    #[test]
    fn test_deserialize_with_rules_alias() {
        let json = r#"{
            "id": "posts",
            "rules": [
                {"key": "title", "type": "text"},
                {"key": "title", "type": "text"}
            ]
        }"#;
        assert!(serde_json::from_str::<Collection>(json).is_err());

        let json = r#"{"id": "posts", "rules": [{"key": "title", "type": "text"}],
                       "indexes": [{"id": "t", "type": "fulltext", "attributes": ["title"]}]}"#;
        let posts: Collection = serde_json::from_str(json).unwrap();
        assert_eq!(posts.attributes().len(), 1);
        assert_eq!(posts.indexes()[0].kind, IndexKind::Fulltext);
    }
}
