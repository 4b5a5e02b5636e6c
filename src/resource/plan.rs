//! Change detection between recorded state and desired configuration.

use serde::Serialize;

use crate::bson::parse_document_from_json;
use crate::error::Result;
use crate::models::IndexSpec;
use crate::resource::keys::InlineOptions;

/// Differences between what was last applied and what is now desired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexChanges {
    /// Immutable attributes that differ; any entry means drop and recreate.
    pub replace: Vec<&'static str>,
    /// New hidden flag when it differs from the recorded one.
    pub hidden: Option<bool>,
}

impl IndexChanges {
    /// Compare a recorded specification against a desired one.
    ///
    /// Keys are compared after moving inline options out of both lists, so the
    /// synthetic `unique` / `expireAfterSeconds` pairs added by a read and the
    /// first-class fields describe the same index. An empty desired name never
    /// differs from a recorded one, since the server generated it.
    pub fn between(prior: &IndexSpec, desired: &IndexSpec) -> Result<Self> {
        let mut replace = Vec::new();

        if prior.database != desired.database {
            replace.push("database");
        }
        if prior.collection != desired.collection {
            replace.push("collection");
        }

        let (prior_keys, prior_options) = InlineOptions::resolve(prior)?;
        let (desired_keys, desired_options) = InlineOptions::resolve(desired)?;
        if prior_keys != desired_keys {
            replace.push("keys");
        }
        if prior_options.unique.unwrap_or(false) != desired_options.unique.unwrap_or(false) {
            replace.push("unique");
        }
        if prior_options.expire_after_seconds != desired_options.expire_after_seconds {
            replace.push("expire_after_seconds");
        }

        if !desired.name.is_empty() && prior.name != desired.name {
            replace.push("name");
        } else if desired.name.is_empty() && !prior.name.is_empty() {
            log::debug!("Keeping server generated index name {:?}", prior.name);
        }

        if !same_filter(&prior.partial_filter_expression, &desired.partial_filter_expression) {
            replace.push("partial_filter_expression");
        }

        let hidden = (prior.hidden != desired.hidden).then_some(desired.hidden);

        Ok(Self { replace, hidden })
    }

    pub fn requires_replace(&self) -> bool {
        !self.replace.is_empty()
    }

    pub fn hidden_changed(&self) -> bool {
        self.hidden.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.requires_replace() && !self.hidden_changed()
    }
}

/// Compare filters as documents when both parse, otherwise as text.
fn same_filter(prior: &str, desired: &str) -> bool {
    let prior = prior.trim();
    let desired = desired.trim();
    if prior.is_empty() || desired.is_empty() {
        return prior.is_empty() == desired.is_empty();
    }
    match (parse_document_from_json(prior), parse_document_from_json(desired)) {
        (Ok(a), Ok(b)) => a == b,
        _ => prior == desired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndexKey;

    fn spec(keys: &[(&str, &str)]) -> IndexSpec {
        IndexSpec::new("mydb", "mycoll", keys.iter().map(|(f, v)| IndexKey::new(*f, *v)).collect())
            .with_name("idx")
    }

    #[test]
    fn test_no_changes() {
        let changes = IndexChanges::between(&spec(&[("a", "1")]), &spec(&[("a", "1")])).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_hidden_is_in_place() {
        let prior = spec(&[("a", "1")]);
        let desired = spec(&[("a", "1")]).with_hidden(true);
        let changes = IndexChanges::between(&prior, &desired).unwrap();

        assert!(!changes.requires_replace());
        assert_eq!(changes.hidden, Some(true));
    }

    #[test]
    fn test_timeout_is_not_a_change() {
        let prior = spec(&[("a", "1")]);
        let desired = spec(&[("a", "1")]).with_timeout(120);
        assert!(IndexChanges::between(&prior, &desired).unwrap().is_empty());
    }

    #[test]
    fn test_immutable_fields_force_replace() {
        let prior = spec(&[("a", "1"), ("b", "-1")]);

        let mut desired = spec(&[("b", "-1"), ("a", "1")]);
        desired.collection = "other".into();
        let changes = IndexChanges::between(&prior, &desired).unwrap();
        assert_eq!(changes.replace, vec!["collection", "keys"]);

        let desired = spec(&[("a", "1"), ("b", "-1")]).with_name("renamed");
        assert_eq!(IndexChanges::between(&prior, &desired).unwrap().replace, vec!["name"]);
    }

    #[test]
    fn test_empty_name_keeps_generated_name() {
        let prior = spec(&[("a", "1")]).with_name("a_1");
        let desired = spec(&[("a", "1")]).with_name("");
        assert!(IndexChanges::between(&prior, &desired).unwrap().is_empty());
    }

    #[test]
    fn test_synthetic_pairs_are_not_drift() {
        // State as written back by a read, config using the inline encoding
        let prior = spec(&[("a", "1"), ("unique", "true"), ("expireAfterSeconds", "60")])
            .with_unique(true)
            .with_expire_after_seconds(60);
        let desired = spec(&[("a", "1"), ("expireAfterSeconds", "60"), ("Unique", "true")]);
        assert!(IndexChanges::between(&prior, &desired).unwrap().is_empty());

        // Same state, config using first-class fields
        let desired = spec(&[("a", "1")]).with_unique(true).with_expire_after_seconds(60);
        assert!(IndexChanges::between(&prior, &desired).unwrap().is_empty());
    }

    #[test]
    fn test_option_changes_force_replace() {
        let prior = spec(&[("a", "1"), ("expireAfterSeconds", "60")]);
        let desired = spec(&[("a", "1"), ("expireAfterSeconds", "120"), ("unique", "true")]);
        let changes = IndexChanges::between(&prior, &desired).unwrap();
        assert_eq!(changes.replace, vec!["unique", "expire_after_seconds"]);
    }

    #[test]
    fn test_unique_false_matches_absent() {
        let prior = spec(&[("a", "1")]);
        let desired = spec(&[("a", "1"), ("unique", "false")]);
        assert!(IndexChanges::between(&prior, &desired).unwrap().is_empty());
    }

    #[test]
    fn test_filter_compared_as_documents() {
        let prior = spec(&[("a", "1")]).with_partial_filter_expression(r#"{"a":{"$exists":true}}"#);
        let desired =
            spec(&[("a", "1")]).with_partial_filter_expression(r#"{ "a": { "$exists": true } }"#);
        assert!(IndexChanges::between(&prior, &desired).unwrap().is_empty());

        let desired = spec(&[("a", "1")]).with_partial_filter_expression(r#"{"a":{"$gt":5}}"#);
        assert_eq!(
            IndexChanges::between(&prior, &desired).unwrap().replace,
            vec!["partial_filter_expression"]
        );

        let desired = spec(&[("a", "1")]);
        assert!(IndexChanges::between(&prior, &desired).unwrap().requires_replace());
    }

    #[test]
    fn test_malformed_desired_ttl_is_an_error() {
        let prior = spec(&[("a", "1")]);
        let desired = spec(&[("a", "1"), ("expireAfterSeconds", "soon")]);
        assert!(IndexChanges::between(&prior, &desired).unwrap_err().is_validation());
    }
}
