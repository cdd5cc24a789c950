//! # Node Registry
//!
//! After every node has been rendered the orchestrator writes a JSON registry
//! (`nodes.json` in the configuration directory). It is the hand-off to the
//! tooling that launches the devnet: for each node it lists the binary to
//! run, the arguments to pass and where configuration, state and logs live.
//!
//! ```json
//! {
//!   "nodes": [
//!     {
//!       "name": "spammer1",
//!       "role": "spammer",
//!       "listen_port": 9200,
//!       "listen_address": "/ip4/127.0.0.1/tcp/9200/ws",
//!       "sync_mode": "history",
//!       "binary": "/opt/nimiq/target/debug/nimiq-spammer",
//!       "config_path": "/tmp/devnet/conf/spammer1/client.toml",
//!       "state_path": "/tmp/devnet/state/spammer1/state",
//!       "log_file": "/tmp/devnet/logs/spammer1.log",
//!       "exec_args": ["-c", "/tmp/devnet/conf/spammer1/client.toml", "-t", "50"],
//!       "address": "NQ40 GCAA U3UX 8BKD GUN0 PG3T 17HA 4X5H TXVE"
//!     }
//!   ]
//! }
//! ```

use crate::node::{DevnetNode, Node, NodeRole, SyncMode};
use crate::utils::binary::resolve_binary_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the registry inside the configuration directory.
pub const REGISTRY_FILE: &str = "nodes.json";

/// Launch information for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    pub role: NodeRole,
    pub listen_port: u16,
    pub listen_address: String,
    pub sync_mode: SyncMode,
    /// Binary to launch
    pub binary: PathBuf,
    pub config_path: PathBuf,
    pub state_path: PathBuf,
    pub log_file: PathBuf,
    /// Full argument list for `binary`
    pub exec_args: Vec<String>,
    /// Account address tied to the node (validator or spammer funding address)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NodeInfo {
    pub fn from_node(node: &DevnetNode) -> Self {
        let base = node.base();
        let config_path = base.conf_toml();

        let mut exec_args = vec!["-c".to_string(), config_path.to_string_lossy().into_owned()];
        exec_args.extend(node.exec_extra_args().iter().cloned());

        Self {
            name: base.name().to_string(),
            role: base.role(),
            listen_port: base.listen_port(),
            listen_address: base.listen_address(),
            sync_mode: base.sync_mode(),
            binary: resolve_binary_path(base.settings(), base.role().binary()),
            config_path,
            state_path: base.state_dir(),
            log_file: base.log_file(),
            exec_args,
            address: node.address().map(str::to_string),
        }
    }
}

/// Registry of all nodes in the devnet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRegistry {
    pub nodes: Vec<NodeInfo>,
}

impl NodeRegistry {
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a DevnetNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(NodeInfo::from_node).collect(),
        }
    }

    /// Write the registry as pretty-printed JSON, replacing any previous file.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    pub fn get(&self, name: &str) -> Option<&NodeInfo> {
        self.nodes.iter().find(|node| node.name == name)
    }
}
