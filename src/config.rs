//! Topology file schema.
//!
//! A topology file is YAML with the shared settings, an optional list of
//! extra seed addresses and one entry per node, tagged by `role`:
//!
//! ```yaml
//! settings:
//!   nimiq_dir: /home/dev/core-rs-albatross
//!   conf_dir: /tmp/nimiq-devnet/conf
//!   state_dir: /tmp/nimiq-devnet/state
//!   logs_dir: /tmp/nimiq-devnet/logs
//! nodes:
//!   - role: seed
//!     name: seed1
//!     listen_port: 8443
//!   - role: spammer
//!     name: spammer1
//!     listen_port: 9200
//!     tpb: 50
//! ```

use crate::node::{MetricsSettings, NodeRole, SyncMode, ValidatorKeys};
use crate::settings::TopologySettings;
use crate::utils::validation::{validate_node_name, validate_seed_address, validate_unique_nodes};
use serde::{Deserialize, Serialize};

/// Complete devnet topology description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub settings: TopologySettings,
    /// Seeds outside of this topology, appended after the seed nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_seed_addresses: Vec<String>,
    pub nodes: Vec<NodeConfig>,
}

/// One node of the topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum NodeConfig {
    Validator {
        name: String,
        listen_port: u16,
        #[serde(default = "default_validator_sync_mode")]
        sync_mode: SyncMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metrics: Option<MetricsSettings>,
        keys: ValidatorKeys,
    },
    Spammer {
        name: String,
        listen_port: u16,
        /// Transactions per block
        tpb: u32,
        #[serde(default = "default_sync_mode")]
        sync_mode: SyncMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metrics: Option<MetricsSettings>,
    },
    Seed {
        name: String,
        listen_port: u16,
        #[serde(default = "default_sync_mode")]
        sync_mode: SyncMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metrics: Option<MetricsSettings>,
    },
    Full {
        name: String,
        listen_port: u16,
        #[serde(default = "default_sync_mode")]
        sync_mode: SyncMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metrics: Option<MetricsSettings>,
    },
    Light {
        name: String,
        listen_port: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metrics: Option<MetricsSettings>,
    },
}

fn default_sync_mode() -> SyncMode {
    SyncMode::History
}

fn default_validator_sync_mode() -> SyncMode {
    SyncMode::Full
}

impl NodeConfig {
    pub fn name(&self) -> &str {
        match self {
            NodeConfig::Validator { name, .. }
            | NodeConfig::Spammer { name, .. }
            | NodeConfig::Seed { name, .. }
            | NodeConfig::Full { name, .. }
            | NodeConfig::Light { name, .. } => name,
        }
    }

    pub fn listen_port(&self) -> u16 {
        match self {
            NodeConfig::Validator { listen_port, .. }
            | NodeConfig::Spammer { listen_port, .. }
            | NodeConfig::Seed { listen_port, .. }
            | NodeConfig::Full { listen_port, .. }
            | NodeConfig::Light { listen_port, .. } => *listen_port,
        }
    }

    pub fn role(&self) -> NodeRole {
        match self {
            NodeConfig::Validator { .. } => NodeRole::Validator,
            NodeConfig::Spammer { .. } => NodeRole::Spammer,
            NodeConfig::Seed { .. } => NodeRole::Seed,
            NodeConfig::Full { .. } => NodeRole::Full,
            NodeConfig::Light { .. } => NodeRole::Light,
        }
    }
}

impl TopologyConfig {
    /// Validate the topology description
    ///
    /// Role-specific parameters (tpb, sync modes, keys) are checked when the
    /// nodes are constructed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let settings = &self.settings;
        for (field, path) in [
            ("conf_dir", &settings.conf_dir),
            ("state_dir", &settings.state_dir),
            ("logs_dir", &settings.logs_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ValidationError::InvalidSettings(format!(
                    "{} cannot be empty",
                    field
                )));
            }
        }
        if settings.listen_host.parse::<std::net::Ipv4Addr>().is_err() {
            return Err(ValidationError::InvalidSettings(format!(
                "listen_host '{}' is not an IPv4 address",
                settings.listen_host
            )));
        }
        if let Some(loki) = &settings.loki {
            if loki.url.is_empty() {
                return Err(ValidationError::InvalidSettings(
                    "loki url cannot be empty".to_string(),
                ));
            }
        }

        if self.nodes.is_empty() {
            return Err(ValidationError::InvalidNode(
                "topology must contain at least one node".to_string(),
            ));
        }
        for node in &self.nodes {
            validate_node_name(node.name()).map_err(ValidationError::InvalidNode)?;
        }
        validate_unique_nodes(self.nodes.iter().map(|node| (node.name(), node.listen_port())))
            .map_err(ValidationError::InvalidNode)?;

        for address in &self.extra_seed_addresses {
            validate_seed_address(address).map_err(ValidationError::InvalidNetwork)?;
        }

        Ok(())
    }

    /// Number of nodes per role, in role order
    pub fn role_counts(&self) -> Vec<(NodeRole, usize)> {
        let roles = [
            NodeRole::Seed,
            NodeRole::Validator,
            NodeRole::Full,
            NodeRole::Light,
            NodeRole::Spammer,
        ];
        roles
            .into_iter()
            .map(|role| {
                let count = self.nodes.iter().filter(|node| node.role() == role).count();
                (role, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Topology validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Invalid node configuration: {0}")]
    InvalidNode(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPOLOGY: &str = r#"
settings:
  nimiq_dir: /opt/nimiq
  conf_dir: /tmp/devnet/conf
  state_dir: /tmp/devnet/state
  logs_dir: /tmp/devnet/logs
  loki:
    url: http://localhost:3100
    labels:
      environment: devnet
extra_seed_addresses:
  - /ip4/10.0.0.1/tcp/9000/ws
nodes:
  - role: seed
    name: seed1
    listen_port: 8443
  - role: validator
    name: validator1
    listen_port: 9100
    keys:
      validator_address: "NQ20 TSB0 DFSM UH9C 15GQ GAGJ TTE4 D3MA 859E"
      signing_key: "aa"
      voting_key: "bb"
      fee_key: "cc"
      voting_public_key: "dd"
      reward_address: "NQ07 0000 0000 0000 0000 0000 0000 0000 0000"
  - role: spammer
    name: spammer1
    listen_port: 9200
    tpb: 50
    metrics:
      host: 127.0.0.1
      port: 9500
  - role: light
    name: light1
    listen_port: 9300
"#;

    #[test]
    fn test_topology_parsing() {
        let config: TopologyConfig = serde_yaml::from_str(TOPOLOGY).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.nodes.len(), 4);
        assert_eq!(config.extra_seed_addresses.len(), 1);

        match &config.nodes[1] {
            NodeConfig::Validator { sync_mode, .. } => assert_eq!(*sync_mode, SyncMode::Full),
            other => panic!("expected validator, got {:?}", other),
        }
        match &config.nodes[2] {
            NodeConfig::Spammer { tpb, sync_mode, metrics, .. } => {
                assert_eq!(*tpb, 50);
                assert_eq!(*sync_mode, SyncMode::History);
                assert_eq!(metrics.as_ref().map(|m| m.port), Some(9500));
            }
            other => panic!("expected spammer, got {:?}", other),
        }

        let loki = config.settings.loki.as_ref().unwrap();
        assert_eq!(loki.labels.get("environment").map(String::as_str), Some("devnet"));
        assert!(loki.extra_fields.is_empty());
    }

    #[test]
    fn test_role_counts() {
        let config: TopologyConfig = serde_yaml::from_str(TOPOLOGY).unwrap();
        assert_eq!(
            config.role_counts(),
            vec![
                (NodeRole::Seed, 1),
                (NodeRole::Validator, 1),
                (NodeRole::Light, 1),
                (NodeRole::Spammer, 1),
            ]
        );
    }

    #[test]
    fn test_duplicate_port_is_rejected() {
        let mut config: TopologyConfig = serde_yaml::from_str(TOPOLOGY).unwrap();
        config.nodes.push(NodeConfig::Full {
            name: "full1".to_string(),
            listen_port: 8443,
            sync_mode: SyncMode::History,
            metrics: None,
        });
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNode(_))));
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut config: TopologyConfig = serde_yaml::from_str(TOPOLOGY).unwrap();
        config.nodes.push(NodeConfig::Light {
            name: "seed1".to_string(),
            listen_port: 9999,
            metrics: None,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate node name 'seed1'"));
    }

    #[test]
    fn test_invalid_settings() {
        let mut config: TopologyConfig = serde_yaml::from_str(TOPOLOGY).unwrap();
        config.settings.listen_host = "localhost".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidSettings(_))));

        let mut config: TopologyConfig = serde_yaml::from_str(TOPOLOGY).unwrap();
        config.extra_seed_addresses.push("seed1:8443".to_string());
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        let mut config: TopologyConfig = serde_yaml::from_str(TOPOLOGY).unwrap();
        config.nodes.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_role_fails_to_parse() {
        let yaml = r#"
settings:
  nimiq_dir: /opt/nimiq
  conf_dir: /tmp/devnet/conf
  state_dir: /tmp/devnet/state
  logs_dir: /tmp/devnet/logs
nodes:
  - role: miner
    name: miner1
    listen_port: 9000
"#;
        assert!(serde_yaml::from_str::<TopologyConfig>(yaml).is_err());
    }
}
