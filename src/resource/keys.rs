//! Key list codec.
//!
//! Key values arrive as literal text and are typed by exact match, in this
//! order: `"1"`, `"-1"`, `"true"`, `"false"`, anything else stays a string.
//!
//! Older configurations put two index options inside the key list:
//! `expireAfterSeconds` and `unique`. [`InlineOptions`] keeps reading that
//! encoding and writes it back on read so existing configurations see no drift.

use mongodb::bson::{Bson, Document};

use crate::bson::bson_value_literal;
use crate::error::{Error, Result};
use crate::models::{IndexKey, IndexSpec};

/// Reserved key field carrying the TTL option.
pub const TTL_FIELD: &str = "expireAfterSeconds";

/// Reserved key field carrying the unique option (matched case-insensitively).
pub const UNIQUE_FIELD: &str = "unique";

/// A key value after literal typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    Int(i32),
    Bool(bool),
    Raw(String),
}

impl KeyValue {
    pub fn from_literal(value: &str) -> Self {
        match value {
            "1" => KeyValue::Int(1),
            "-1" => KeyValue::Int(-1),
            "true" => KeyValue::Bool(true),
            "false" => KeyValue::Bool(false),
            other => KeyValue::Raw(other.to_string()),
        }
    }

    pub fn into_bson(self) -> Bson {
        match self {
            KeyValue::Int(n) => Bson::Int32(n),
            KeyValue::Bool(b) => Bson::Boolean(b),
            KeyValue::Raw(s) => Bson::String(s),
        }
    }
}

/// Index options that can be given inline in the key list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineOptions {
    pub unique: Option<bool>,
    pub expire_after_seconds: Option<i64>,
}

impl InlineOptions {
    /// Split inline options out of `keys`, returning the remaining key pairs.
    ///
    /// A non-integer TTL is rejected. A negative TTL is not an option and stays
    /// in the key list. Repeated options are last-wins.
    pub fn extract(keys: &[IndexKey]) -> Result<(Vec<IndexKey>, InlineOptions)> {
        let mut options = InlineOptions::default();
        let mut remaining = Vec::with_capacity(keys.len());

        for key in keys {
            if key.field == TTL_FIELD {
                let seconds = key.value.parse::<i64>().map_err(|err| {
                    Error::Validation(format!(
                        "{TTL_FIELD} value must be integer: {:?}: {err}",
                        key.value
                    ))
                })?;
                if seconds >= 0 {
                    options.expire_after_seconds = Some(seconds);
                    continue;
                }
            }

            if key.field.eq_ignore_ascii_case(UNIQUE_FIELD) {
                match key.value.to_ascii_lowercase().as_str() {
                    "true" => {
                        options.unique = Some(true);
                        continue;
                    }
                    "false" => {
                        options.unique = Some(false);
                        continue;
                    }
                    _ => {}
                }
            }

            remaining.push(key.clone());
        }

        Ok((remaining, options))
    }

    /// Resolve the effective key pairs and options of a specification.
    ///
    /// First-class `unique` / `expire_after_seconds` fields take precedence over
    /// their inline counterparts.
    pub fn resolve(spec: &IndexSpec) -> Result<(Vec<IndexKey>, InlineOptions)> {
        if let Some(seconds) = spec.expire_after_seconds.filter(|seconds| *seconds < 0) {
            return Err(Error::Validation(format!(
                "expire_after_seconds must not be negative, got {seconds}"
            )));
        }

        let (keys, inline) = Self::extract(&spec.keys)?;
        let options = InlineOptions {
            unique: spec.unique.or(inline.unique),
            expire_after_seconds: spec.expire_after_seconds.or(inline.expire_after_seconds),
        };
        Ok((keys, options))
    }

    /// Append the synthetic pairs a read reports for these options.
    pub fn append_to(&self, keys: &mut Vec<IndexKey>) {
        if let Some(unique) = self.unique {
            keys.push(IndexKey::new(UNIQUE_FIELD, unique.to_string()));
        }
        if let Some(seconds) = self.expire_after_seconds {
            keys.push(IndexKey::new(TTL_FIELD, seconds.to_string()));
        }
    }
}

/// Build the ordered key document from option-free key pairs.
///
/// A field listed twice is a `Validation` error.
pub fn key_document(keys: &[IndexKey]) -> Result<Document> {
    let mut doc = Document::new();
    for key in keys {
        if doc.contains_key(&key.field) {
            return Err(Error::Validation(format!(
                "key field {:?} is listed more than once",
                key.field
            )));
        }
        doc.insert(key.field.clone(), KeyValue::from_literal(&key.value).into_bson());
    }
    Ok(doc)
}

/// Key pairs of an observed key document, in server order.
pub fn keys_from_document(doc: &Document) -> Vec<IndexKey> {
    doc.iter().map(|(field, value)| IndexKey::new(field.clone(), bson_value_literal(value))).collect()
}
