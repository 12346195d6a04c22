// JSON representation of values

use crate::error::TypeError;
use crate::types::Kind;
use crate::value::Value;
use bstr::BString;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value as Json;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn invalid(kind: Kind, json: &Json) -> TypeError {
    TypeError::Conversion {
        kind,
        reason: format!("cannot read {} from JSON {}", kind, json),
    }
}

/// Read a JSON value as a value of `kind`; JSON null maps to the kind's null
pub fn value_from_json(kind: Kind, json: &Json) -> Result<Value, TypeError> {
    if json.is_null() {
        return Ok(Value::null(kind));
    }

    let value = match kind {
        Kind::Boolean => json.as_bool().map(Value::from),
        Kind::String => json.as_str().map(Value::from),
        Kind::Decimal => match json {
            Json::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok()
                .map(Value::from),
            Json::String(s) => Decimal::from_str(s.trim()).ok().map(Value::from),
            _ => None,
        },
        Kind::Double => match json {
            Json::Number(n) => n.as_f64().map(Value::from),
            Json::String(s) => s.trim().parse::<f64>().ok().map(Value::from),
            _ => None,
        },
        Kind::Integer => json
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Value::from),
        Kind::Long => json.as_i64().map(Value::from),
        Kind::Date => json
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            .map(Value::from),
        Kind::Time => json
            .as_str()
            .and_then(|s| {
                TIME_FORMATS
                    .iter()
                    .find_map(|format| NaiveTime::parse_from_str(s, format).ok())
            })
            .map(Value::from),
        Kind::Timestamp => json
            .as_str()
            .and_then(|s| {
                TIMESTAMP_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            })
            .map(Value::from),
        Kind::ByteArray => match json {
            Json::String(s) => Some(Value::from(BString::from(s.as_str()))),
            Json::Array(items) => items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(Value::from),
            _ => None,
        },
    };

    value.ok_or_else(|| invalid(kind, json))
}

/// Write a value as JSON; decimals keep their scale by rendering as strings
pub fn value_to_json(value: &Value) -> Json {
    match value {
        _ if value.is_null() => Json::Null,
        Value::Boolean(Some(b)) => Json::Bool(*b),
        Value::String(Some(s)) => Json::String(s.clone()),
        Value::Decimal(Some(d)) => Json::String(d.to_string()),
        // NaN and infinities have no JSON number form
        Value::Double(Some(f)) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or_else(|| Json::String(f.to_string())),
        Value::Integer(Some(n)) => Json::from(*n),
        Value::Long(Some(n)) => Json::from(*n),
        Value::Date(Some(d)) => Json::String(d.format(DATE_FORMAT).to_string()),
        Value::Time(Some(t)) => Json::String(t.format("%H:%M:%S%.f").to_string()),
        Value::Timestamp(Some(ts)) => Json::String(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        Value::ByteArray(Some(b)) => Json::Array(b.iter().map(|byte| Json::from(*byte)).collect()),
        _ => Json::Null,
    }
}
