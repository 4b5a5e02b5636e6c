//! Extended JSON conversion for filter documents.

use mongodb::bson::{self, Bson, Document};
use serde_json::Value;

/// Parse an Extended JSON string into a BSON document.
///
/// Type wrappers such as `{"$date": ...}` or `{"$numberLong": ...}` become the
/// BSON values they describe; query operators like `$exists` are kept as-is.
pub fn parse_document_from_json(input: &str) -> Result<Document, String> {
    let value: Value = serde_json::from_str(input.trim()).map_err(|e| e.to_string())?;
    let bson = Bson::try_from(value).map_err(|e| e.to_string())?;
    match bson {
        Bson::Document(doc) => Ok(doc),
        _ => Err("Root JSON must be a document".to_string()),
    }
}

/// Serialize a BSON value as compact relaxed Extended JSON.
pub fn bson_to_relaxed_extjson_string(value: &Bson) -> String {
    let json = value.clone().into_relaxed_extjson();
    serde_json::to_string(&json).unwrap_or_else(|_| format!("{value:?}"))
}

/// Serialize a BSON document as compact relaxed Extended JSON.
pub fn document_to_relaxed_extjson_string(doc: &Document) -> String {
    bson_to_relaxed_extjson_string(&bson::Bson::Document(doc.clone()))
}
