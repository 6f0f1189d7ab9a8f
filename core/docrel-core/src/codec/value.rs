//! Value coercion between JSON attribute values and native row values.

use crate::error::{DocRelError, DocRelResult};
use crate::model::AttributeType;
use crate::schema::type_map::binding_type;
use crate::storage::{ParamType, ParamValue, SqlValue};
use serde_json::{Number, Value};

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(attribute: &str, expected: ParamType, value: &Value) -> DocRelError {
    DocRelError::TypeMismatch {
        attribute: attribute.to_string(),
        expected: expected.to_string(),
        actual: json_kind(value).to_string(),
    }
}

/// Coerce a JSON value into a bindable value for `ty`.
pub fn to_param(attribute: &str, ty: AttributeType, value: &Value) -> DocRelResult<ParamValue> {
    let expected = binding_type(ty);
    let param = match (expected, value) {
        (_, Value::Null) => ParamValue::Null,

        (ParamType::Str, Value::String(s)) => ParamValue::Str(s.clone()),
        (ParamType::Str, Value::Number(n)) => ParamValue::Str(n.to_string()),
        (ParamType::Str, Value::Bool(b)) => ParamValue::Str(if *b { "1" } else { "0" }.to_string()),
        (ParamType::Str, composite) => ParamValue::Str(serde_json::to_string(composite)?),

        (ParamType::Int, Value::Number(n)) => match n.as_i64() {
            Some(i) => ParamValue::Int(i),
            None => match n.as_f64().and_then(exact_i64) {
                Some(i) if n.as_u64().is_none() => ParamValue::Int(i),
                _ => return Err(mismatch(attribute, expected, value)),
            },
        },
        (ParamType::Int, Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => ParamValue::Int(i),
            Err(_) => return Err(mismatch(attribute, expected, value)),
        },
        (ParamType::Int, Value::Bool(b)) => ParamValue::Int(i64::from(*b)),

        (ParamType::Bool, Value::Bool(b)) => ParamValue::Bool(*b),
        (ParamType::Bool, Value::Number(n)) => {
            ParamValue::Bool(n.as_f64().is_some_and(|f| f != 0.0))
        }
        (ParamType::Bool, Value::String(s)) => match s.as_str() {
            "true" | "1" => ParamValue::Bool(true),
            "false" | "0" | "" => ParamValue::Bool(false),
            _ => return Err(mismatch(attribute, expected, value)),
        },

        _ => return Err(mismatch(attribute, expected, value)),
    };
    Ok(param)
}

/// Decode a fetched column back into JSON according to `ty`.
pub fn from_sql(attribute: &str, ty: AttributeType, value: &SqlValue) -> DocRelResult<Value> {
    let undecodable = |actual: &str| DocRelError::TypeMismatch {
        attribute: attribute.to_string(),
        expected: ty.to_string(),
        actual: actual.to_string(),
    };

    let decoded = match (ty, value) {
        (_, SqlValue::Null) => Value::Null,

        (AttributeType::Integer, SqlValue::Integer(i)) => Value::from(*i),
        (AttributeType::Integer, SqlValue::Real(f)) => {
            Value::from(exact_i64(*f).ok_or_else(|| undecodable("real"))?)
        }
        (AttributeType::Integer, SqlValue::Text(s)) => {
            Value::from(s.trim().parse::<i64>().map_err(|_| undecodable("text"))?)
        }

        (AttributeType::Float | AttributeType::Numeric, SqlValue::Real(f)) => float(*f),
        (AttributeType::Float | AttributeType::Numeric, SqlValue::Integer(i)) => float(*i as f64),
        (AttributeType::Float | AttributeType::Numeric, SqlValue::Text(s)) => {
            float(s.trim().parse::<f64>().map_err(|_| undecodable("text"))?)
        }

        (AttributeType::Boolean, SqlValue::Integer(i)) => Value::Bool(*i != 0),
        (AttributeType::Boolean, SqlValue::Real(f)) => Value::Bool(*f != 0.0),
        (AttributeType::Boolean, SqlValue::Text(s)) => {
            Value::Bool(matches!(s.as_str(), "1" | "true"))
        }

        (_, SqlValue::Text(s)) => Value::String(s.clone()),
        (_, SqlValue::Integer(i)) => Value::String(i.to_string()),
        (_, SqlValue::Real(f)) => Value::String(f.to_string()),
        (_, SqlValue::Blob(bytes)) => Value::String(
            String::from_utf8(bytes.clone()).map_err(|_| undecodable("blob"))?,
        ),
    };
    Ok(decoded)
}

/// Whole floats inside the `i64` range; `as` would saturate anything else.
fn exact_i64(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < -(i64::MIN as f64);
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn float(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}
