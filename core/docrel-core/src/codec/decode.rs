use crate::codec::resolver::NestedResolver;
use crate::codec::value::from_sql;
use crate::error::DocRelResult;
use crate::model::{Attribute, Collection, Document};
use crate::sql::naming;
use crate::sql::statements::{PERMISSIONS, UID};
use crate::storage::{Row, SqlValue};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Rebuild a document from its primary row and per-attribute child rows.
///
/// A column missing from the row omits the key; a NULL column decodes to
/// `null`. `children` is keyed by attribute key; array attributes with no
/// entry are omitted as well.
pub fn decode(
    collection: &Collection,
    primary: &Row,
    children: &HashMap<String, Vec<Row>>,
    resolver: &NestedResolver<'_>,
) -> DocRelResult<Document> {
    let mut document = Document::new(collection.id());
    document.id = primary.get(UID).and_then(SqlValue::as_text).map(str::to_string);
    document.permissions = match primary.get(PERMISSIONS).and_then(SqlValue::as_text) {
        Some(text) if !text.is_empty() => serde_json::from_str(text)?,
        _ => Value::Object(Map::new()),
    };

    for attribute in collection.stored_attributes() {
        let column = naming::column(&attribute.key)?;

        if attribute.array {
            let Some(rows) = children.get(&attribute.key) else {
                continue;
            };
            let items = rows
                .iter()
                .map(|row| {
                    let raw = row.get(&column).unwrap_or(&SqlValue::Null);
                    decode_value(attribute, raw, resolver)
                })
                .collect::<DocRelResult<Vec<_>>>()?;
            document.set(attribute.key.clone(), Value::Array(items));
        } else if let Some(raw) = primary.get(&column) {
            document.set(attribute.key.clone(), decode_value(attribute, raw, resolver)?);
        }
    }

    Ok(document)
}

fn decode_value(
    attribute: &Attribute,
    raw: &SqlValue,
    resolver: &NestedResolver<'_>,
) -> DocRelResult<Value> {
    let value = from_sql(&attribute.key, attribute.kind, raw)?;
    if attribute.is_document() {
        return resolver.resolve(attribute, &value);
    }
    Ok(value)
}
