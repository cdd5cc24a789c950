//! Devnet seed node.
//!
//! Seeds are the bootstrap peers of the devnet: their listen addresses make
//! up the seed list handed to every node. A seed drops its own address from
//! the list it renders.

use crate::node::base::{Node, NodeBase, NodeConfigContext};
use crate::node::error::NodeError;
use crate::node::types::{MetricsSettings, NodeRole, SyncMode};
use crate::settings::TopologySettings;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Seed {
    base: NodeBase,
}

impl Seed {
    pub fn new(
        name: impl Into<String>,
        listen_port: u16,
        settings: Arc<TopologySettings>,
        sync_mode: SyncMode,
        metrics: Option<MetricsSettings>,
    ) -> Result<Self, NodeError> {
        let name = name.into();
        if sync_mode == SyncMode::Light {
            return Err(NodeError::invalid(
                &name,
                NodeRole::Seed,
                "seed nodes must keep full state",
            ));
        }
        let base = NodeBase::new(
            NodeRole::Seed,
            name,
            listen_port,
            settings,
            sync_mode,
            metrics,
            Vec::new(),
        )?;
        Ok(Self { base })
    }

    /// Address published in the topology seed list
    pub fn seed_address(&self) -> String {
        self.base.listen_address()
    }
}

impl Node for Seed {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn config_context<'a>(&'a self, seed_addresses: &'a [String]) -> NodeConfigContext<'a> {
        let own = self.seed_address();
        let mut context = self.base.config_context(seed_addresses);
        context.seed_addresses.retain(|address| *address != own);
        context
    }
}
