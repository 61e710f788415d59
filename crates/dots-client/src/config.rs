//! Session parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Port used when none is given.
pub const DEFAULT_PORT: u16 = 5555;

/// Upper bound on how long opening the connection may take.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// Where to connect and who to log in as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub login_id: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, login_id: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            login_id: login_id.into(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Check the parameters before any connection attempt.
    ///
    /// Host and login id must be non-blank and free of control characters,
    /// the port non-zero, and the connect timeout at least one second.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.host.trim().is_empty() {
            return Err(ClientError::InvalidConfig("host cannot be empty".to_string()));
        }
        if self.host.chars().any(char::is_control) {
            return Err(ClientError::InvalidConfig(
                "host cannot contain control characters".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ClientError::InvalidConfig("port must be 1-65535".to_string()));
        }
        if self.login_id.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "login id cannot be empty".to_string(),
            ));
        }
        if self.login_id.chars().any(char::is_control) {
            return Err(ClientError::InvalidConfig(
                "login id cannot contain control characters".to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "connect timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a config from JSON. Not validated.
    pub fn from_json(text: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
