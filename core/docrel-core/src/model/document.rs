//! Abstract document representation.

use crate::error::DocRelResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn empty_permissions() -> Value {
    Value::Object(Map::new())
}

/// A document: reserved identity/permission fields plus attribute values.
///
/// Serializes as one JSON object; reserved fields use the `$id`,
/// `$collection` and `$permissions` keys, attributes sit alongside them.
///
/// # 예제
///
/// ```rust
/// use docrel_core::Document;
/// use serde_json::json;
///
/// let doc = Document::new("users").with("name", json!("Alice"));
/// assert_eq!(doc.get("name"), Some(&json!("Alice")));
/// assert!(doc.id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "$collection", default)]
    pub collection: String,

    #[serde(rename = "$permissions", default = "empty_permissions")]
    pub permissions: Value,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Document {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            id: None,
            collection: collection.into(),
            permissions: empty_permissions(),
            attributes: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_permissions(mut self, permissions: Value) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Parse a nested document value (a JSON object).
    pub fn from_value(value: Value) -> DocRelResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn into_value(self) -> DocRelResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reserved_fields_split_from_attributes() {
        let doc = Document::from_value(json!({
            "$id": "abc",
            "$collection": "users",
            "$permissions": {"read": ["*"]},
            "name": "Alice",
            "age": 30
        }))
        .unwrap();
        assert_eq!(doc.id.as_deref(), Some("abc"));
        assert_eq!(doc.collection, "users");
        assert_eq!(doc.permissions, json!({"read": ["*"]}));
        assert_eq!(doc.attributes.len(), 2);
        assert!(doc.get("$id").is_none());
    }

    #[test]
    fn test_permissions_default_to_empty_object() {
        let doc = Document::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(doc.permissions, json!({}));
        assert!(doc.id.is_none());
    }

    #[test]
    fn test_into_value() {
        let value = Document::new("users")
            .with_id("1")
            .with("name", json!("Bob"))
            .into_value()
            .unwrap();
        assert_eq!(
            value,
            json!({"$id": "1", "$collection": "users", "$permissions": {}, "name": "Bob"})
        );
    }
}
