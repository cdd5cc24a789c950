//! Devnet full node: a regular client following the chain.

use crate::node::base::{Node, NodeBase};
use crate::node::error::NodeError;
use crate::node::types::{MetricsSettings, NodeRole, SyncMode};
use crate::settings::TopologySettings;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FullNode {
    base: NodeBase,
}

impl FullNode {
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
                NodeRole::Full,
                "use a light node for light sync mode",
            ));
        }
        let base = NodeBase::new(
            NodeRole::Full,
            name,
            listen_port,
            settings,
            sync_mode,
            metrics,
            Vec::new(),
        )?;
        Ok(Self { base })
    }
}

impl Node for FullNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }
}
