//! Index operations for MongoDB collections.

use std::time::Duration;

use mongodb::Client;
use mongodb::IndexModel;
use mongodb::bson::Document;
use mongodb::error::ErrorKind;

use crate::connection::ConnectionManager;
use crate::error::{Error, Result};

impl ConnectionManager {
    /// List raw index specs for a collection (runs in Tokio runtime)
    ///
    /// A missing database or collection has no indexes and yields an empty list.
    pub fn list_indexes(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
    ) -> Result<Vec<Document>> {
        use futures::TryStreamExt;

        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            let cursor = match coll.list_indexes().await {
                Ok(cursor) => cursor,
                Err(err) if is_namespace_not_found(&err) => {
                    log::debug!("No namespace {}.{}, no indexes", database, collection);
                    return Ok(Vec::new());
                }
                Err(err) => return Err(err.into()),
            };
            let indexes: Vec<Document> = cursor.with_type::<Document>().try_collect().await?;
            Ok(indexes)
        })
    }

    /// Create one index, cancelled once `deadline` elapses (runs in Tokio runtime).
    ///
    /// Returns the index name reported by the server.
    pub fn create_index(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        index: IndexModel,
        deadline: Duration,
    ) -> Result<String> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            let fut = async { coll.create_index(index).await };

            match tokio::time::timeout(deadline, fut).await {
                Ok(result) => Ok(result?.index_name),
                Err(_) => Err(Error::Timeout(format!(
                    "index creation on {}.{} did not finish within {}s",
                    database,
                    collection,
                    deadline.as_secs()
                ))),
            }
        })
    }

    /// Drop an index by name in a collection (runs in Tokio runtime)
    pub fn drop_index(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
        name: &str,
    ) -> Result<()> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        let name = name.to_string();

        self.runtime.block_on(async {
            let coll = client.database(&database).collection::<Document>(&collection);
            coll.drop_index(name).await?;
            Ok(())
        })
    }

    /// Run a database command, e.g. `collMod` (runs in Tokio runtime)
    pub fn run_command(
        &self,
        client: &Client,
        database: &str,
        command: Document,
    ) -> Result<Document> {
        let client = client.clone();
        let database = database.to_string();

        self.runtime.block_on(async {
            let db = client.database(&database);
            let reply = db.run_command(command).await?;
            Ok(reply)
        })
    }
}

/// Server error code NamespaceNotFound.
const NAMESPACE_NOT_FOUND: i32 = 26;

fn is_namespace_not_found(err: &mongodb::error::Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(command) if command.code == NAMESPACE_NOT_FOUND)
}
