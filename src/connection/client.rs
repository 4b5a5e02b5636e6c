//! The database capability the reconciler depends on.

use std::time::Duration;

use mongodb::bson::Document;
use mongodb::{Client, IndexModel};

use crate::connection::ConnectionManager;
use crate::error::Result;
use crate::models::{ObservedIndex, ProviderConfig};

/// Index management calls against one MongoDB deployment.
///
/// Each call is attempted exactly once. Implementations must be safe to share
/// between reconcilers working on different indexes.
pub trait IndexClient: Send + Sync {
    fn list_indexes(&self, database: &str, collection: &str) -> Result<Vec<ObservedIndex>>;

    fn create_index(
        &self,
        database: &str,
        collection: &str,
        index: IndexModel,
        deadline: Duration,
    ) -> Result<String>;

    fn drop_index(&self, database: &str, collection: &str, name: &str) -> Result<()>;

    fn run_command(&self, database: &str, command: Document) -> Result<Document>;
}

/// `IndexClient` backed by a live server.
pub struct MongoIndexClient {
    manager: ConnectionManager,
    client: Client,
}

impl MongoIndexClient {
    /// Open a client and verify the server answers a ping.
    pub fn connect(config: &ProviderConfig) -> Result<Self> {
        let manager = ConnectionManager::new()?;
        let client = manager.connect(config)?;
        Ok(Self { manager, client })
    }
}

impl IndexClient for MongoIndexClient {
    fn list_indexes(&self, database: &str, collection: &str) -> Result<Vec<ObservedIndex>> {
        let indexes = self.manager.list_indexes(&self.client, database, collection)?;
        Ok(indexes.iter().map(ObservedIndex::from_document).collect())
    }

    fn create_index(
        &self,
        database: &str,
        collection: &str,
        index: IndexModel,
        deadline: Duration,
    ) -> Result<String> {
        self.manager.create_index(&self.client, database, collection, index, deadline)
    }

    fn drop_index(&self, database: &str, collection: &str, name: &str) -> Result<()> {
        self.manager.drop_index(&self.client, database, collection, name)
    }

    fn run_command(&self, database: &str, command: Document) -> Result<Document> {
        self.manager.run_command(&self.client, database, command)
    }
}
