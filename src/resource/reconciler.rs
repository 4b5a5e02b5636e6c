//! Create, read, update and delete of a single index.

use mongodb::IndexModel;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;

use crate::bson::{document_to_relaxed_extjson_string, parse_document_from_json};
use crate::connection::IndexClient;
use crate::error::{Error, Result};
use crate::models::{DEFAULT_TIMEOUT_SECS, IndexId, IndexSpec, IndexState};
use crate::resource::keys::{InlineOptions, key_document, keys_from_document};
use crate::resource::plan::IndexChanges;

/// Reconciles index configurations against a MongoDB deployment.
///
/// Holds nothing but the client, so one reconciler can serve many indexes as
/// long as calls for the same identity are not interleaved.
pub struct IndexReconciler<C> {
    client: C,
}

impl<C: IndexClient> IndexReconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Create the index described by `spec` and return its recorded state.
    ///
    /// All input is validated before the server is asked for anything. The
    /// create call is attempted once and cancelled after `spec.timeout` seconds.
    pub fn create(&self, spec: &IndexSpec) -> Result<IndexState> {
        let model = build_index_model(spec)?;

        log::debug!(
            "Creating index {:?} on {}.{}: {:?}",
            spec.name,
            spec.database,
            spec.collection,
            model.keys
        );
        let name =
            self.client.create_index(&spec.database, &spec.collection, model, spec.deadline())?;

        let id = IndexId::new(spec.database.clone(), spec.collection.clone(), name);
        log::info!("Created index {} on {}", id.name, id.namespace());

        let id = id.to_string();
        self.read(&id, spec.timeout).map_err(|err| {
            log::warn!("Index {:?} exists but reading it back failed: {}", id, err);
            Error::Created { id: id.clone(), source: Box::new(err) }
        })
    }

    /// Read the index identified by `id` back from the server.
    ///
    /// `timeout` is not observable remotely and is carried into the state as-is.
    pub fn read(&self, id: &str, timeout: u64) -> Result<IndexState> {
        let index_id = IndexId::parse(id)?;

        let indexes = self.client.list_indexes(&index_id.database, &index_id.collection)?;
        for index in &indexes {
            log::debug!("Index on {}: {:?}", index_id.namespace(), index);
        }

        let Some(observed) = indexes.into_iter().find(|index| index.name == index_id.name) else {
            return Err(Error::NotFound(format!("{} on {}", index_id.name, index_id.namespace())));
        };

        let options = InlineOptions {
            unique: observed.unique,
            expire_after_seconds: observed.expire_after_seconds,
        };
        let mut keys = keys_from_document(&observed.keys);
        options.append_to(&mut keys);

        let partial_filter_expression = observed
            .partial_filter_expression
            .as_ref()
            .map(document_to_relaxed_extjson_string)
            .unwrap_or_default();

        let spec = IndexSpec {
            database: index_id.database,
            collection: index_id.collection,
            keys,
            name: index_id.name,
            partial_filter_expression,
            hidden: observed.hidden.unwrap_or(false),
            timeout,
            unique: options.unique,
            expire_after_seconds: options.expire_after_seconds,
        };

        Ok(IndexState { id: id.to_string(), spec })
    }

    /// Bring an existing index under management from its identity alone.
    pub fn import(&self, id: &str) -> Result<IndexState> {
        let state = self.read(id, DEFAULT_TIMEOUT_SECS)?;
        log::info!("Imported index {}", state.spec.name);
        Ok(state)
    }

    /// Apply the in-place part of a change and refresh the state.
    ///
    /// Only `hidden` can change without recreating the index; one `collMod` is
    /// issued when it differs from `prior`, none otherwise.
    pub fn update(&self, prior: &IndexState, desired: &IndexSpec) -> Result<IndexState> {
        let index_id = IndexId::parse(&prior.id)?;
        let changes = IndexChanges::between(&prior.spec, desired)?;

        if changes.requires_replace() {
            log::warn!(
                "Index {} has changes that need recreation, not applied in place: {:?}",
                index_id.name,
                changes.replace
            );
        }

        if let Some(hidden) = changes.hidden {
            log::info!("Setting hidden={} on index {}", hidden, index_id.name);
            self.client.run_command(
                &index_id.database,
                doc! {
                    "collMod": index_id.collection.clone(),
                    "index": { "name": index_id.name.clone(), "hidden": hidden },
                },
            )?;
        }

        self.read(&prior.id, desired.timeout)
    }

    /// Drop the index identified by `id`.
    ///
    /// An index that is already gone is reported as a server error.
    pub fn delete(&self, id: &str) -> Result<()> {
        let index_id = IndexId::parse(id)?;
        self.client.drop_index(&index_id.database, &index_id.collection, &index_id.name)?;
        log::info!("Dropped index {} on {}", index_id.name, index_id.namespace());
        Ok(())
    }

    /// Compare recorded state against a desired configuration.
    pub fn plan(&self, prior: &IndexState, desired: &IndexSpec) -> Result<IndexChanges> {
        IndexChanges::between(&prior.spec, desired)
    }
}

/// Build the create request for `spec`, rejecting anything malformed.
pub fn build_index_model(spec: &IndexSpec) -> Result<IndexModel> {
    let (keys, inline) = InlineOptions::resolve(spec)?;
    let key_doc = key_document(&keys)?;
    if key_doc.is_empty() {
        return Err(Error::Validation(
            "index needs at least one key field besides unique/expireAfterSeconds".to_string(),
        ));
    }

    let mut options = IndexOptions::default();
    if !spec.name.is_empty() {
        options.name = Some(spec.name.clone());
    }
    options.unique = inline.unique;
    options.expire_after = inline
        .expire_after_seconds
        .map(|seconds| std::time::Duration::from_secs(seconds as u64));

    let filter = spec.partial_filter_expression.trim();
    if !filter.is_empty() {
        let filter = parse_document_from_json(filter).map_err(|err| {
            Error::Validation(format!("Invalid partial_filter_expression JSON: {err}"))
        })?;
        options.partial_filter_expression = Some(filter);
    }

    if spec.hidden {
        options.hidden = Some(true);
    }

    Ok(IndexModel::builder().keys(key_doc).options(options).build())
}
