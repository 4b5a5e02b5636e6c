//! Common test utilities for integration tests using Testcontainers.
//!
//! A single MongoDB 7.0 container is shared per test binary (Rust compiles each
//! `tests/*.rs` file as a separate binary). Per-test isolation is achieved by
//! namespacing every database name with a short UUID suffix.
//!
//! The container runs on a dedicated background thread with its own tokio runtime.
//! The reconciler under test drives its own runtime with `block_on`, so tests are
//! plain `#[test]` functions and never run inside an async context.
//!
//! An `atexit` hook ensures the container is removed when the process exits.

#![allow(dead_code)]

use std::sync::OnceLock;

use mongodb::bson::doc;
use mongodb::{Client, options::ClientOptions};
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

use mongodb_index_resource::connection::{IndexClient, MongoIndexClient};
use mongodb_index_resource::models::ProviderConfig;
use mongodb_index_resource::resource::IndexReconciler;

static CONNECTION_STRING: OnceLock<String> = OnceLock::new();

/// Docker container ID, stored globally so the `atexit` handler can remove it.
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

unsafe extern "C" {
    fn atexit(f: extern "C" fn()) -> i32;
}

/// Called by the C runtime on process exit. Forcibly removes the shared container.
extern "C" fn remove_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", id])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
}

/// Start the shared container once per test binary and return its URI.
fn connection_string() -> &'static str {
    CONNECTION_STRING.get_or_init(|| {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create container runtime");

            rt.block_on(async {
                let container = Mongo::default()
                    .with_tag("7.0")
                    .start()
                    .await
                    .expect("Failed to start MongoDB container");

                // Store container ID for the atexit cleanup hook.
                let _ = CONTAINER_ID.set(container.id().to_string());
                unsafe {
                    atexit(remove_container);
                }

                let host = container.get_host().await.expect("Failed to get host");
                let port = container.get_host_port_ipv4(27017).await.expect("Failed to get port");
                let connection_string = format!("mongodb://{}:{}", host, port);

                // Readiness probe
                let opts = ClientOptions::parse(&connection_string).await.expect("Failed to parse");
                let probe = Client::with_options(opts).expect("Failed to create probe client");
                for _ in 0..30 {
                    if probe.database("admin").run_command(doc! { "ping": 1 }).await.is_ok() {
                        break;
                    }
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
                drop(probe);

                tx.send(connection_string).expect("Failed to send connection string");

                // Park forever to keep the container alive until the process exits.
                std::future::pending::<()>().await;
            });
        });

        rx.recv().expect("Failed to receive connection string")
    })
}

/// Provider configuration pointing at the shared container.
pub fn provider_config() -> ProviderConfig {
    let mut config = ProviderConfig::new(connection_string());
    config.app_name = Some("index-resource-tests".to_string());
    config.direct_connection = Some(true);
    config
}

/// A reconciler connected to the shared container.
pub fn reconciler() -> IndexReconciler<MongoIndexClient> {
    let client = MongoIndexClient::connect(&provider_config()).expect("Failed to connect");
    IndexReconciler::new(client)
}

/// Unique database name for this test.
pub fn db_name(name: &str) -> String {
    let test_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
    format!("{}_{}", name, test_id)
}

/// Create the collection so listIndexes has something to report.
pub fn create_collection(client: &impl IndexClient, database: &str, collection: &str) {
    client
        .run_command(database, doc! { "create": collection })
        .expect("Failed to create collection");
}
