use mongodb::bson::{self, Bson, Document};
use serde::Serializer;
use serde_json::{Map, Number, Value};

use crate::store::StoreError;

/// Convert a stored value into the public wire format.
///
/// Identifiers become their 24-character hex form and timestamps become
/// RFC 3339 strings, which is what browser clients of this API expect.
/// Everything else falls back to relaxed extended JSON.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Double(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        other => other.clone().into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: &Document) -> Value {
    let map: Map<String, Value> = doc
        .iter()
        .map(|(k, v)| (k.clone(), bson_to_json(v)))
        .collect();
    Value::Object(map)
}

pub fn documents_to_json(docs: &[Document]) -> Value {
    Value::Array(docs.iter().map(document_to_json).collect())
}

/// Request bodies must be JSON objects; anything else cannot become a document.
pub fn json_to_document(value: Value) -> Result<Document, StoreError> {
    match value {
        Value::Object(_) => {
            bson::to_document(&value).map_err(|e| StoreError::InvalidDocument(e.to_string()))
        }
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// serde helper for acknowledgment fields holding raw store values
pub fn serialize_bson<S: Serializer>(value: &Bson, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_some(&bson_to_json(value))
}
