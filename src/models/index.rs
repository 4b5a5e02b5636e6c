//! Desired, observed and persisted index attributes.

use std::time::Duration;

use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

use crate::bson::{bson_as_i64, bson_truthy};

/// Create deadline applied when the configuration does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// One `(field, value)` entry of the ordered key list.
///
/// `value` is kept as literal text; typing happens when the key document is
/// built (see `resource::keys`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKey {
    pub field: String,
    pub value: String,
}

impl IndexKey {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self { field: field.into(), value: value.into() }
    }
}

/// Desired configuration of an index.
///
/// Everything except `hidden` (and `timeout`, which is not a server property)
/// is fixed once the index exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub database: String,
    pub collection: String,
    pub keys: Vec<IndexKey>,
    /// Empty lets the server generate a name.
    #[serde(default)]
    pub name: String,
    /// Extended JSON document; empty means no partial filter.
    #[serde(default)]
    pub partial_filter_expression: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_after_seconds: Option<i64>,
}

impl IndexSpec {
    pub fn new(
        database: impl Into<String>,
        collection: impl Into<String>,
        keys: Vec<IndexKey>,
    ) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            keys,
            name: String::new(),
            partial_filter_expression: String::new(),
            hidden: false,
            timeout: DEFAULT_TIMEOUT_SECS,
            unique: None,
            expire_after_seconds: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_partial_filter_expression(mut self, filter: impl Into<String>) -> Self {
        self.partial_filter_expression = filter.into();
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    pub fn with_expire_after_seconds(mut self, seconds: i64) -> Self {
        self.expire_after_seconds = Some(seconds);
        self
    }

    /// Deadline for the create call.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Attributes recorded for a managed index, keyed by its identity string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexState {
    pub id: String,
    #[serde(flatten)]
    pub spec: IndexSpec,
}

/// An index as reported by `listIndexes`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservedIndex {
    pub name: String,
    /// Key document in server order.
    pub keys: Document,
    pub unique: Option<bool>,
    pub expire_after_seconds: Option<i64>,
    pub partial_filter_expression: Option<Document>,
    pub hidden: Option<bool>,
}

impl ObservedIndex {
    /// Read one raw `listIndexes` entry.
    ///
    /// Option values are taken as the server stored them, so a TTL saved as a
    /// double or a `unique: 1` flag still reads back.
    pub fn from_document(spec: &Document) -> Self {
        Self {
            name: spec.get_str("name").unwrap_or_default().to_string(),
            keys: spec.get_document("key").cloned().unwrap_or_default(),
            unique: spec.get("unique").and_then(bson_truthy),
            expire_after_seconds: spec.get("expireAfterSeconds").and_then(bson_as_i64),
            partial_filter_expression: spec.get_document("partialFilterExpression").ok().cloned(),
            hidden: spec.get("hidden").and_then(bson_truthy),
        }
    }
}
