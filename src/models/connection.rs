// Provider connection configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::helpers::validate_mongodb_uri;

/// Settings used to open the client shared by every lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub uri: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub server_selection_timeout_secs: Option<u64>,
    #[serde(default)]
    pub direct_connection: Option<bool>,
}

impl ProviderConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            app_name: None,
            connect_timeout_secs: None,
            server_selection_timeout_secs: None,
            direct_connection: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_mongodb_uri(&self.uri)?;
        if self.connect_timeout_secs == Some(0) {
            return Err("connect_timeout_secs must be positive".into());
        }
        if self.server_selection_timeout_secs == Some(0) {
            return Err("server_selection_timeout_secs must be positive".into());
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn server_selection_timeout(&self) -> Option<Duration> {
        self.server_selection_timeout_secs.map(Duration::from_secs)
    }
}
