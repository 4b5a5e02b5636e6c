//! Core ConnectionManager struct and connection setup.

use mongodb::Client;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use tokio::runtime::Runtime;

use crate::error::{Error, Result};
use crate::helpers::{extract_host_from_uri, redact_uri_password};
use crate::models::ProviderConfig;

/// Owns the Tokio runtime the async driver is driven on.
///
/// Every operation is a blocking call, so the reconciler stays synchronous.
pub struct ConnectionManager {
    /// Tokio runtime for MongoDB async operations
    pub(crate) runtime: Runtime,
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new() -> Result<Self> {
        let runtime = Runtime::new()?;
        Ok(Self { runtime })
    }

    /// Connect to MongoDB and ping it before handing the client out (runs in Tokio runtime)
    pub fn connect(&self, config: &ProviderConfig) -> Result<Client> {
        config.validate().map_err(Error::Validation)?;
        log::debug!("Connecting to {}", redact_uri_password(&config.uri));

        let config = config.clone();
        self.runtime.block_on(async {
            let mut options =
                ClientOptions::parse(&config.uri).await.map_err(connection_error)?;
            if let Some(app_name) = config.app_name.clone() {
                options.app_name = Some(app_name);
            }
            if let Some(timeout) = config.connect_timeout() {
                options.connect_timeout = Some(timeout);
            }
            if let Some(timeout) = config.server_selection_timeout() {
                options.server_selection_timeout = Some(timeout);
            }
            if let Some(direct) = config.direct_connection {
                options.direct_connection = Some(direct);
            }

            let client = Client::with_options(options).map_err(connection_error)?;

            // Ping to verify connection
            client
                .database("admin")
                .run_command(doc! { "ping": 1 })
                .await
                .map_err(connection_error)?;

            log::info!(
                "Connected to {}",
                extract_host_from_uri(&config.uri).unwrap_or_else(|| "MongoDB".to_string())
            );
            Ok(client)
        })
    }
}

fn connection_error(err: mongodb::error::Error) -> Error {
    Error::Connection(err.to_string())
}
