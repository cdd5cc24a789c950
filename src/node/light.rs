//! Devnet light node. Always syncs in light mode.

use crate::node::base::{Node, NodeBase};
use crate::node::error::NodeError;
use crate::node::types::{MetricsSettings, NodeRole, SyncMode};
use crate::settings::TopologySettings;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LightNode {
    base: NodeBase,
}

impl LightNode {
    pub fn new(
        name: impl Into<String>,
        listen_port: u16,
        settings: Arc<TopologySettings>,
        metrics: Option<MetricsSettings>,
    ) -> Result<Self, NodeError> {
        let base = NodeBase::new(
            NodeRole::Light,
            name,
            listen_port,
            settings,
            SyncMode::Light,
            metrics,
            Vec::new(),
        )?;
        Ok(Self { base })
    }
}

impl Node for LightNode {
    fn base(&self) -> &NodeBase {
        &self.base
    }
}
