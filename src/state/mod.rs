// Provider-side state: configuration loading

pub mod config;

pub use config::{ConfigManager, URI_ENV, resolve_provider_config};
