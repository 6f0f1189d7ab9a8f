//! Type Mapper — abstract attribute type → native column type / binding type.
//!
//! The mapping is part of the persisted layout: changing a column definition
//! changes what existing tables look like. Every column is nullable with no
//! default (sparse schema).

use crate::error::DocRelResult;
use crate::model::AttributeType;
use crate::sql::naming;
use crate::storage::ParamType;

/// Native column type for an attribute type.
pub fn column_definition(ty: AttributeType) -> &'static str {
    match ty {
        AttributeType::Text | AttributeType::Url => "TEXT NULL",
        AttributeType::Key | AttributeType::Document => "VARCHAR(36) NULL",
        AttributeType::Ipv4 => "VARCHAR(15) NULL",
        AttributeType::Ipv6 => "VARCHAR(39) NULL",
        AttributeType::Email => "VARCHAR(255) NULL",
        AttributeType::Integer => "INT NULL",
        AttributeType::Float | AttributeType::Numeric => "FLOAT NULL",
        AttributeType::Boolean => "BOOLEAN NULL",
    }
}

/// Bound-parameter type for an attribute type.
///
/// FLOAT and NUMERIC bind as strings even though their column is numeric;
/// existing deployments depend on that.
pub fn binding_type(ty: AttributeType) -> ParamType {
    match ty {
        AttributeType::Integer => ParamType::Int,
        AttributeType::Boolean => ParamType::Bool,
        AttributeType::Text
        | AttributeType::Url
        | AttributeType::Key
        | AttributeType::Ipv4
        | AttributeType::Ipv6
        | AttributeType::Email
        | AttributeType::Float
        | AttributeType::Numeric
        | AttributeType::Document => ParamType::Str,
    }
}

/// Full column clause: `` `col_<key>` <definition> ``.
pub fn column_clause(key: &str, ty: AttributeType) -> DocRelResult<String> {
    Ok(format!(
        "{} {}",
        naming::quote(&naming::column(key)?),
        column_definition(ty)
    ))
}
