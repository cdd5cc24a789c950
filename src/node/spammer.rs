//! Devnet spammer node.
//!
//! A spammer runs `nimiq-spammer`, which pushes `tpb` transactions per block
//! into the network from a well-funded devnet account. The throughput target
//! reaches the binary as an execution argument (`-t <tpb>`); the rendered
//! configuration only differs from a regular node by its `spammer` flag.

use crate::node::base::{Node, NodeBase, NodeConfigContext};
use crate::node::error::NodeError;
use crate::node::types::{MetricsSettings, NodeRole, SyncMode};
use crate::settings::TopologySettings;
use std::sync::Arc;

/// Account funding the spam transactions. Only funded in the devnet genesis.
pub const SPAMMER_ADDRESS: &str = "NQ40 GCAA U3UX 8BKD GUN0 PG3T 17HA 4X5H TXVE";

/// Flag passing the transactions-per-block target to `nimiq-spammer`.
pub const TPB_FLAG: &str = "-t";

#[derive(Debug, Clone)]
pub struct Spammer {
    base: NodeBase,
    tpb: u32,
}

impl Spammer {
    pub fn new(
        name: impl Into<String>,
        listen_port: u16,
        settings: Arc<TopologySettings>,
        tpb: u32,
        sync_mode: SyncMode,
        metrics: Option<MetricsSettings>,
    ) -> Result<Self, NodeError> {
        let name = name.into();
        if tpb == 0 {
            return Err(NodeError::invalid(
                &name,
                NodeRole::Spammer,
                "transactions per block must be positive",
            ));
        }

        let exec_extra_args = vec![TPB_FLAG.to_string(), tpb.to_string()];
        let base = NodeBase::new(
            NodeRole::Spammer,
            name,
            listen_port,
            settings,
            sync_mode,
            metrics,
            exec_extra_args,
        )?;
        Ok(Self { base, tpb })
    }

    /// Funding address of the spam transactions
    pub fn address(&self) -> &'static str {
        SPAMMER_ADDRESS
    }

    /// Transactions per block the binary is asked to send
    pub fn tpb(&self) -> u32 {
        self.tpb
    }
}

impl Node for Spammer {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn config_context<'a>(&'a self, seed_addresses: &'a [String]) -> NodeConfigContext<'a> {
        NodeConfigContext {
            spammer: Some(true),
            ..self.base.config_context(seed_addresses)
        }
    }
}
