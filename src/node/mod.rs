//! Devnet node module.
//!
//! Each topology participant is one of a closed set of roles. Role variants
//! share a [`NodeBase`] and the [`Node`] contract; [`DevnetNode`] is the tagged
//! union the orchestrator works with.

pub mod base;
pub mod error;
pub mod full;
pub mod light;
pub mod seed;
pub mod spammer;
pub mod types;
pub mod validator;

pub use base::{Node, NodeBase, NodeConfigContext, CONF_TOML_FILE, MIN_PEERS};
pub use error::NodeError;
pub use full::FullNode;
pub use light::LightNode;
pub use seed::Seed;
pub use spammer::{Spammer, SPAMMER_ADDRESS};
pub use types::{MetricsSettings, NodeRole, SyncMode};
pub use validator::{Validator, ValidatorKeys};

use crate::template::TemplateEngine;

/// Any node of a devnet topology
#[derive(Debug, Clone)]
pub enum DevnetNode {
    Validator(Validator),
    Spammer(Spammer),
    Seed(Seed),
    Full(FullNode),
    Light(LightNode),
}

impl DevnetNode {
    /// Account address associated with the node, if its role has one
    pub fn address(&self) -> Option<&str> {
        match self {
            DevnetNode::Validator(validator) => Some(validator.address()),
            DevnetNode::Spammer(spammer) => Some(spammer.address()),
            DevnetNode::Seed(_) | DevnetNode::Full(_) | DevnetNode::Light(_) => None,
        }
    }

    /// Seed multiaddress, only for seed nodes
    pub fn seed_address(&self) -> Option<String> {
        match self {
            DevnetNode::Seed(seed) => Some(seed.seed_address()),
            DevnetNode::Validator(_)
            | DevnetNode::Spammer(_)
            | DevnetNode::Full(_)
            | DevnetNode::Light(_) => None,
        }
    }

    fn inner(&self) -> &dyn Node {
        match self {
            DevnetNode::Validator(node) => node,
            DevnetNode::Spammer(node) => node,
            DevnetNode::Seed(node) => node,
            DevnetNode::Full(node) => node,
            DevnetNode::Light(node) => node,
        }
    }
}

impl Node for DevnetNode {
    fn base(&self) -> &NodeBase {
        self.inner().base()
    }

    fn config_context<'a>(&'a self, seed_addresses: &'a [String]) -> NodeConfigContext<'a> {
        self.inner().config_context(seed_addresses)
    }

    fn render(&self, engine: &dyn TemplateEngine, seed_addresses: &[String]) -> Result<(), NodeError> {
        self.inner().render(engine, seed_addresses)
    }
}

impl From<Validator> for DevnetNode {
    fn from(node: Validator) -> Self {
        DevnetNode::Validator(node)
    }
}

impl From<Spammer> for DevnetNode {
    fn from(node: Spammer) -> Self {
        DevnetNode::Spammer(node)
    }
}

impl From<Seed> for DevnetNode {
    fn from(node: Seed) -> Self {
        DevnetNode::Seed(node)
    }
}

impl From<FullNode> for DevnetNode {
    fn from(node: FullNode) -> Self {
        DevnetNode::Full(node)
    }
}

impl From<LightNode> for DevnetNode {
    fn from(node: LightNode) -> Self {
        DevnetNode::Light(node)
    }
}
