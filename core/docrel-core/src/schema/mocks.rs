//! Bootstrap collections provisioned for every namespace.

use crate::error::DocRelResult;
use crate::model::{Attribute, AttributeType, Collection, Index, IndexKind};

fn attr(key: &str, kind: AttributeType) -> Attribute {
    Attribute::new(key, kind)
}

fn build(id: &str, attributes: Vec<Attribute>, indexes: Vec<Index>) -> DocRelResult<Collection> {
    let mut collection = Collection::new(id, attributes)?;
    for index in indexes {
        collection.add_index(index)?;
    }
    Ok(collection)
}

/// The system's own schema, created by `create_namespace` and dropped by
/// `delete_namespace`.
pub fn mocks() -> DocRelResult<Vec<Collection>> {
    use AttributeType::*;

    Ok(vec![
        build(
            "users",
            vec![
                attr("name", Text),
                attr("email", Email),
                attr("emailVerification", Boolean),
                attr("status", Integer),
                attr("password", Text),
                attr("passwordUpdate", Integer),
                attr("registration", Integer),
                attr("prefs", Text),
                attr("roles", Key).with_array(true),
            ],
            vec![Index::new("email", IndexKind::Unique, ["email"])],
        )?,
        build(
            "sessions",
            vec![
                attr("userId", Key),
                attr("secret", Text),
                attr("expire", Integer),
                attr("ip", Ipv6),
                attr("userAgent", Text),
            ],
            vec![Index::new("userId", IndexKind::Key, ["userId"])],
        )?,
        build(
            "teams",
            vec![
                attr("name", Text),
                attr("sum", Integer),
                attr("dateCreated", Integer),
            ],
            vec![],
        )?,
        build(
            "memberships",
            vec![
                attr("teamId", Key),
                attr("userId", Key),
                attr("invited", Integer),
                attr("joined", Integer),
                attr("confirm", Boolean),
                attr("secret", Text),
                attr("roles", Text).with_array(true),
            ],
            vec![Index::new("team", IndexKind::Key, ["teamId", "userId"])],
        )?,
        build(
            "files",
            vec![
                attr("name", Text),
                attr("mimeType", Text),
                attr("sizeOriginal", Integer),
                attr("signature", Text),
                attr("path", Text),
                Attribute::document("owner", ["users"]),
                attr("tags", Text).with_array(true),
            ],
            vec![],
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_mock_ids_are_unique() {
        let mocks = mocks().unwrap();
        let ids: HashSet<&str> = mocks.iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), mocks.len());
    }

    #[test]
    fn test_mock_indexes_reference_plain_attributes() {
        for collection in mocks().unwrap() {
            for index in collection.indexes() {
                collection.validate_index_keys(&index.attributes).unwrap();
            }
        }
    }

    #[test]
    fn test_files_owner_points_at_users() {
        let mocks = mocks().unwrap();
        let files = mocks.iter().find(|c| c.id() == "files").unwrap();
        let owner = files.attribute("owner").unwrap();
        assert_eq!(owner.relation.target("owner").unwrap(), "users");
    }

    #[test]
    fn test_mocks_have_array_attributes() {
        for collection in mocks().unwrap() {
            if collection.id() == "sessions" || collection.id() == "teams" {
                continue;
            }
            assert!(
                collection.attributes().iter().any(|a| a.array),
                "{}",
                collection.id()
            );
        }
    }
}
