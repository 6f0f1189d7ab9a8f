use crate::codec::resolver::NestedResolver;
use crate::codec::value::to_param;
use crate::error::{DocRelError, DocRelResult};
use crate::model::{Attribute, Collection, Document};
use crate::sql::naming;
use crate::storage::ParamValue;
use serde_json::Value;

/// One primary-row column and the value bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValue {
    pub key: String,
    pub column: String,
    pub value: ParamValue,
}

/// All values of one array attribute, one child row each.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRows {
    pub key: String,
    pub column: String,
    pub values: Vec<ParamValue>,
}

/// Row-shaped form of a document, ready for INSERT/UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDocument {
    pub id: String,
    /// Permissions serialized as JSON text.
    pub permissions: String,
    /// Every non-array attribute, in declaration order (absent keys bind null).
    pub columns: Vec<ColumnValue>,
    /// Array attributes that carried a value.
    pub children: Vec<ChildRows>,
}

/// Encode `document` for storage under `id`.
///
/// Reserved keys are never written as attributes. Keys not declared on the
/// collection are ignored.
pub fn encode(
    collection: &Collection,
    id: &str,
    document: &Document,
    resolver: &NestedResolver<'_>,
) -> DocRelResult<EncodedDocument> {
    let permissions = serde_json::to_string(&document.permissions)?;
    let mut columns = Vec::new();
    let mut children = Vec::new();

    for attribute in collection.stored_attributes() {
        let column = naming::column(&attribute.key)?;
        let raw = document.get(&attribute.key).unwrap_or(&Value::Null);

        if attribute.array {
            let items = match raw {
                Value::Null => continue,
                Value::Array(items) => items,
                other => {
                    return Err(DocRelError::TypeMismatch {
                        attribute: attribute.key.clone(),
                        expected: "array".to_string(),
                        actual: other.to_string(),
                    });
                }
            };
            let values = items
                .iter()
                .map(|item| encode_value(attribute, item, resolver))
                .collect::<DocRelResult<Vec<_>>>()?;
            children.push(ChildRows {
                key: attribute.key.clone(),
                column,
                values,
            });
        } else {
            columns.push(ColumnValue {
                key: attribute.key.clone(),
                column,
                value: encode_value(attribute, raw, resolver)?,
            });
        }
    }

    Ok(EncodedDocument {
        id: id.to_string(),
        permissions,
        columns,
        children,
    })
}

fn encode_value(
    attribute: &Attribute,
    value: &Value,
    resolver: &NestedResolver<'_>,
) -> DocRelResult<ParamValue> {
    if attribute.is_document() {
        let reference = resolver.persist(attribute, value)?;
        return to_param(&attribute.key, attribute.kind, &reference);
    }
    to_param(&attribute.key, attribute.kind, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::resolver::tests::MapStore;
    use crate::model::AttributeType;
    use serde_json::json;

    fn scores() -> Collection {
        Collection::new(
            "c1",
            vec![
                Attribute::new("name", AttributeType::Text),
                Attribute::new("age", AttributeType::Integer),
                Attribute::new("scores", AttributeType::Integer).with_array(true),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_encode_splits_primary_and_children() {
        let store = MapStore::default();
        let resolver = NestedResolver::new(&store, 0);
        let doc = Document::new("c1")
            .with("name", json!("x"))
            .with("scores", json!([1, 2, 3]));

        let encoded = encode(&scores(), "id-1", &doc, &resolver).unwrap();
        assert_eq!(encoded.id, "id-1");
        assert_eq!(encoded.permissions, "{}");
        assert_eq!(encoded.columns.len(), 2);
        assert_eq!(encoded.columns[0].column, "col_name");
        assert_eq!(encoded.columns[0].value, ParamValue::Str("x".into()));
        // absent attribute binds null
        assert_eq!(encoded.columns[1].value, ParamValue::Null);
        assert_eq!(encoded.children.len(), 1);
        assert_eq!(
            encoded.children[0].values,
            vec![ParamValue::Int(1), ParamValue::Int(2), ParamValue::Int(3)]
        );
    }

    #[test]
    fn test_encode_skips_absent_arrays() {
        let store = MapStore::default();
        let resolver = NestedResolver::new(&store, 0);
        let encoded = encode(&scores(), "id", &Document::new("c1"), &resolver).unwrap();
        assert!(encoded.children.is_empty());
    }

    #[test]
    fn test_encode_rejects_scalar_for_array() {
        let store = MapStore::default();
        let resolver = NestedResolver::new(&store, 0);
        let doc = Document::new("c1").with("scores", json!(5));
        assert!(matches!(
            encode(&scores(), "id", &doc, &resolver),
            Err(DocRelError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_encode_stores_nested_documents_by_id() {
        let collection = Collection::new(
            "posts",
            vec![
                Attribute::document("author", ["users"]),
                Attribute::document("tags", ["tags"]).with_array(true),
            ],
        )
        .unwrap();
        let store = MapStore::default();
        let resolver = NestedResolver::new(&store, 0);
        let doc = Document::new("posts")
            .with("author", json!({"name": "Ann"}))
            .with("tags", json!([{"label": "a"}, "existing-tag"]));

        let encoded = encode(&collection, "p1", &doc, &resolver).unwrap();
        assert_eq!(encoded.columns[0].value, ParamValue::Str("gen-1".into()));
        assert_eq!(
            encoded.children[0].values,
            vec![
                ParamValue::Str("gen-2".into()),
                ParamValue::Str("existing-tag".into())
            ]
        );
        assert_eq!(store.docs.lock().len(), 2);
    }

    #[test]
    fn test_encode_ignores_reserved_and_undeclared_keys() {
        let store = MapStore::default();
        let resolver = NestedResolver::new(&store, 0);
        let doc = Document::new("c1")
            .with_id("ignored")
            .with("undeclared", json!(1))
            .with_permissions(json!({"read": ["*"]}));
        let encoded = encode(&scores(), "real", &doc, &resolver).unwrap();
        assert_eq!(encoded.id, "real");
        assert_eq!(encoded.permissions, r#"{"read":["*"]}"#);
        assert!(encoded.columns.iter().all(|c| c.key != "undeclared"));
    }
}
