//! Find / count entry points.
//!
//! Filters are split and validated so malformed expressions fail early, but
//! nothing is executed yet.

use crate::engine::DocumentEngine;
use crate::error::DocRelResult;
use crate::model::Document;
use crate::sql::{Filter, split};
use crate::storage::Connection;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Query options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindOptions {
    #[serde(default)]
    pub collection: Option<String>,
    /// `key<op>value` expressions, e.g. `age>=18`
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub order_field: Option<String>,
    #[serde(default)]
    pub order_desc: bool,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filters.push(expression.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Split every filter expression.
    pub fn parsed_filters(&self) -> DocRelResult<Vec<Filter>> {
        self.filters.iter().map(|f| split(f)).collect()
    }
}

impl<C: Connection> DocumentEngine<C> {
    // TODO: translate `Filter`s into a WHERE clause over `col_<key>` columns once
    // the collection is resolved through the catalog.
    #[instrument(skip(self))]
    pub fn find(&self, options: &FindOptions) -> DocRelResult<Vec<Document>> {
        options.parsed_filters()?;
        Ok(Vec::new())
    }

    #[instrument(skip(self))]
    pub fn count(&self, options: &FindOptions) -> DocRelResult<u64> {
        options.parsed_filters()?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::Operator;

    #[test]
    fn test_parsed_filters() {
        let options = FindOptions::new().filter("age>=18").filter("name=ann");
        let filters = options.parsed_filters().unwrap();
        assert_eq!(filters[0].operator, Operator::GreaterOrEqual);
        assert_eq!(filters[1].key, "name");
    }

    #[test]
    fn test_invalid_filter_surfaces() {
        let options = FindOptions::new().filter("age");
        assert!(options.parsed_filters().is_err());
    }
}
