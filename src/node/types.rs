//! Node type definitions.
//!
//! Roles, sync modes and the optional metrics block shared by every node
//! variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a node plays in the devnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Block producer holding validator keys
    Validator,
    /// Transaction generator
    Spammer,
    /// Bootstrap node published in every seed list
    Seed,
    /// Regular client following the chain
    Full,
    /// Header-only client
    Light,
}

impl NodeRole {
    /// Returns a string representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Validator => "validator",
            NodeRole::Spammer => "spammer",
            NodeRole::Seed => "seed",
            NodeRole::Full => "full",
            NodeRole::Light => "light",
        }
    }

    /// Name of the binary launched for this role
    pub fn binary(&self) -> &'static str {
        match self {
            NodeRole::Spammer => "nimiq-spammer",
            NodeRole::Validator | NodeRole::Seed | NodeRole::Full | NodeRole::Light => {
                "nimiq-client"
            }
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy a node uses to catch up with the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Replay the full history
    History,
    /// Sync the current state only
    Full,
    /// Headers and proofs only
    Light,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::History => "history",
            SyncMode::Full => "full",
            SyncMode::Light => "light",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics server exposed by a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSettings {
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl MetricsSettings {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_binaries() {
        assert_eq!(NodeRole::Spammer.binary(), "nimiq-spammer");
        assert_eq!(NodeRole::Validator.binary(), "nimiq-client");
        assert_eq!(NodeRole::Light.binary(), "nimiq-client");
    }

    #[test]
    fn test_sync_mode_serialization() {
        assert_eq!(serde_json::to_value(SyncMode::History).unwrap(), "history");
        let mode: SyncMode = serde_yaml::from_str("light").unwrap();
        assert_eq!(mode, SyncMode::Light);
        assert!(serde_yaml::from_str::<SyncMode>("turbo").is_err());
    }

    #[test]
    fn test_metrics_without_credentials_omit_keys() {
        let value = serde_json::to_value(MetricsSettings::new("127.0.0.1", 9500)).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(!object.contains_key("username"));
    }
}
