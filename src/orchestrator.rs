//! Topology generator.
//!
//! This module drives the configuration generation: it turns a validated
//! [`TopologyConfig`] into nodes, computes the seed list shared by all of
//! them, renders every node in declaration order, writes the genesis staking
//! the validators and finally writes the node registry for the launch tooling.

use crate::config::{NodeConfig, TopologyConfig};
use crate::genesis::{Genesis, GENESIS_FILE};
use crate::node::{DevnetNode, FullNode, LightNode, Node, Seed, Spammer, Validator};
use crate::registry::{NodeRegistry, REGISTRY_FILE};
use crate::settings::TopologySettings;
use crate::template::TemplateEngine;
use crate::utils::validation::validate_unique_nodes;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Nodes of a devnet together with their shared settings
#[derive(Debug, Clone)]
pub struct Topology {
    settings: Arc<TopologySettings>,
    nodes: Vec<DevnetNode>,
    extra_seed_addresses: Vec<String>,
}

/// Outcome of a successful generation run
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// Every file written, in write order
    pub files: Vec<PathBuf>,
    pub registry_path: PathBuf,
    pub genesis_path: PathBuf,
    pub seed_addresses: Vec<String>,
}

impl Topology {
    /// Assemble a topology from already constructed nodes.
    ///
    /// Fails if two nodes share a name or a listen port.
    pub fn new(
        settings: Arc<TopologySettings>,
        nodes: Vec<DevnetNode>,
        extra_seed_addresses: Vec<String>,
    ) -> Result<Self> {
        validate_unique_nodes(nodes.iter().map(|node| (node.name(), node.listen_port())))
            .map_err(|e| eyre!("Invalid topology: {}", e))?;

        Ok(Self {
            settings,
            nodes,
            extra_seed_addresses,
        })
    }

    /// Build every node described by `config`.
    ///
    /// The settings are frozen behind an `Arc` before the first node is
    /// created, so every node observes the same snapshot.
    pub fn from_config(config: &TopologyConfig) -> Result<Self> {
        let settings = Arc::new(config.settings.clone());

        let nodes = config
            .nodes
            .iter()
            .map(|node| build_node(node, &settings))
            .collect::<Result<Vec<_>>>()?;

        Self::new(settings, nodes, config.extra_seed_addresses.clone())
    }

    pub fn settings(&self) -> &TopologySettings {
        &self.settings
    }

    pub fn nodes(&self) -> &[DevnetNode] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&DevnetNode> {
        self.nodes.iter().find(|node| node.name() == name)
    }

    /// Seed list handed to every node: the seed nodes of this topology in
    /// declaration order, then the extra seed addresses.
    pub fn seed_addresses(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(DevnetNode::seed_address)
            .chain(self.extra_seed_addresses.iter().cloned())
            .collect()
    }

    /// Render every node, the genesis and the node registry.
    ///
    /// Nodes are rendered one after the other. The first failure aborts the
    /// run; files written before it are left in place.
    pub fn generate(&self, engine: &dyn TemplateEngine) -> Result<GenerationSummary> {
        let seed_addresses = self.seed_addresses();
        debug!("Seed addresses: {:?}", seed_addresses);

        for dir in [self.settings.conf_dir(), self.settings.logs_dir()] {
            std::fs::create_dir_all(dir)
                .wrap_err_with(|| format!("Failed to create directory '{}'", dir.display()))?;
        }

        let mut files = Vec::new();
        for node in &self.nodes {
            let base = node.base();
            for dir in [base.conf_dir(), base.state_dir()] {
                std::fs::create_dir_all(&dir).wrap_err_with(|| {
                    format!("Failed to create directory '{}' for node '{}'", dir.display(), node.name())
                })?;
            }

            node.render(engine, &seed_addresses)?;

            files.push(node.conf_toml());
            if let DevnetNode::Validator(validator) = node {
                files.push(validator.conf_yaml());
            }
        }

        let genesis_path = self.settings.conf_dir().join(GENESIS_FILE);
        let genesis = Genesis::from_nodes(&self.nodes);
        let content = genesis
            .render(engine)
            .wrap_err("Failed to render the devnet genesis")?;
        std::fs::write(&genesis_path, content)
            .wrap_err_with(|| format!("Failed to write genesis '{}'", genesis_path.display()))?;
        info!(
            "Wrote genesis with {} validator stake(s): {:?}",
            genesis.stakes.len(),
            genesis_path
        );
        files.push(genesis_path.clone());

        let registry_path = self.settings.conf_dir().join(REGISTRY_FILE);
        NodeRegistry::from_nodes(&self.nodes)
            .write(&registry_path)
            .wrap_err_with(|| format!("Failed to write node registry '{}'", registry_path.display()))?;
        info!("Wrote node registry: {:?}", registry_path);

        info!(
            "Generated configuration for {} node(s) with {} seed address(es)",
            self.nodes.len(),
            seed_addresses.len()
        );

        Ok(GenerationSummary {
            files,
            registry_path,
            genesis_path,
            seed_addresses,
        })
    }
}

fn build_node(config: &NodeConfig, settings: &Arc<TopologySettings>) -> Result<DevnetNode> {
    let settings = Arc::clone(settings);
    let node: DevnetNode = match config {
        NodeConfig::Validator {
            name,
            listen_port,
            sync_mode,
            metrics,
            keys,
        } => Validator::new(
            name.as_str(),
            *listen_port,
            settings,
            keys.clone(),
            *sync_mode,
            metrics.clone(),
        )?
        .into(),
        NodeConfig::Spammer {
            name,
            listen_port,
            tpb,
            sync_mode,
            metrics,
        } => Spammer::new(name.as_str(), *listen_port, settings, *tpb, *sync_mode, metrics.clone())?.into(),
        NodeConfig::Seed {
            name,
            listen_port,
            sync_mode,
            metrics,
        } => Seed::new(name.as_str(), *listen_port, settings, *sync_mode, metrics.clone())?.into(),
        NodeConfig::Full {
            name,
            listen_port,
            sync_mode,
            metrics,
        } => FullNode::new(name.as_str(), *listen_port, settings, *sync_mode, metrics.clone())?.into(),
        NodeConfig::Light {
            name,
            listen_port,
            metrics,
        } => LightNode::new(name.as_str(), *listen_port, settings, metrics.clone())?.into(),
    };

    debug!("Built {} node '{}'", node.role(), node.name());
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SyncMode;

    fn settings() -> Arc<TopologySettings> {
        Arc::new(TopologySettings::new("/opt/nimiq", "/tmp/devnet"))
    }

    #[test]
    fn test_seed_addresses_order() {
        let settings = settings();
        let nodes: Vec<DevnetNode> = vec![
            FullNode::new("full1", 9000, settings.clone(), SyncMode::History, None).unwrap().into(),
            Seed::new("seed2", 8444, settings.clone(), SyncMode::History, None).unwrap().into(),
            Seed::new("seed1", 8443, settings.clone(), SyncMode::History, None).unwrap().into(),
        ];
        let topology = Topology::new(settings, nodes, vec!["/ip4/10.0.0.1/tcp/9000/ws".to_string()]).unwrap();

        assert_eq!(
            topology.seed_addresses(),
            vec![
                "/ip4/127.0.0.1/tcp/8444/ws",
                "/ip4/127.0.0.1/tcp/8443/ws",
                "/ip4/10.0.0.1/tcp/9000/ws",
            ]
        );
    }

    #[test]
    fn test_duplicate_nodes_are_rejected() {
        let settings = settings();
        let nodes: Vec<DevnetNode> = vec![
            FullNode::new("full1", 9000, settings.clone(), SyncMode::History, None).unwrap().into(),
            FullNode::new("full2", 9000, settings.clone(), SyncMode::History, None).unwrap().into(),
        ];
        assert!(Topology::new(settings, nodes, Vec::new()).is_err());
    }

    #[test]
    fn test_construction_error_aborts_assembly() {
        let config = TopologyConfig {
            settings: TopologySettings::new("/opt/nimiq", "/tmp/devnet"),
            extra_seed_addresses: Vec::new(),
            nodes: vec![NodeConfig::Spammer {
                name: "spammer1".to_string(),
                listen_port: 9200,
                tpb: 0,
                sync_mode: SyncMode::History,
                metrics: None,
            }],
        };
        let err = Topology::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("spammer1"));
    }

    #[test]
    fn test_nodes_share_settings_snapshot() {
        let config = TopologyConfig {
            settings: TopologySettings::new("/opt/nimiq", "/tmp/devnet"),
            extra_seed_addresses: Vec::new(),
            nodes: vec![
                NodeConfig::Light {
                    name: "light1".to_string(),
                    listen_port: 9300,
                    metrics: None,
                },
                NodeConfig::Seed {
                    name: "seed1".to_string(),
                    listen_port: 8443,
                    sync_mode: SyncMode::Full,
                    metrics: None,
                },
            ],
        };
        let topology = Topology::from_config(&config).unwrap();
        for node in topology.nodes() {
            assert!(std::ptr::eq(node.base().settings(), topology.settings()));
        }
        assert!(topology.node("seed1").is_some());
        assert!(topology.node("seed9").is_none());
    }
}
