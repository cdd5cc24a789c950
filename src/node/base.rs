//! Shared node state and the configuration rendering algorithm.
//!
//! Every role variant wraps a [`NodeBase`] and implements [`Node`]. The
//! default [`Node::render`] assembles a [`NodeConfigContext`] from the base
//! state, lets the variant specialize it, renders `node_conf.toml.j2` and
//! replaces the node's configuration file with the result.

use crate::node::error::NodeError;
use crate::node::types::{MetricsSettings, NodeRole, SyncMode};
use crate::node::validator::ValidatorKeys;
use crate::settings::{LokiConfig, TopologySettings};
use crate::template::{TemplateEngine, TemplateError, NODE_CONF_TEMPLATE};
use crate::utils::validation::validate_node_name;
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Minimum number of peers every node waits for before syncing.
pub const MIN_PEERS: usize = 3;

/// File name of the rendered node configuration.
pub const CONF_TOML_FILE: &str = "client.toml";

/// Variables handed to `node_conf.toml.j2`.
///
/// Optional role and observability keys are skipped entirely when unset so
/// templates can tell "absent" apart from "present but empty". `loki` is the
/// exception: it is always present and `null` when log shipping is disabled.
#[derive(Debug, Clone, Serialize)]
pub struct NodeConfigContext<'a> {
    pub min_peers: usize,
    pub port: u16,
    pub state_path: String,
    pub sync_mode: SyncMode,
    pub seed_addresses: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<&'a MetricsSettings>,
    pub loki: Option<LokiConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spammer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<&'a ValidatorKeys>,
}

/// Identity and settings common to all node roles
#[derive(Debug, Clone)]
pub struct NodeBase {
    name: String,
    role: NodeRole,
    listen_port: u16,
    settings: Arc<TopologySettings>,
    sync_mode: SyncMode,
    metrics: Option<MetricsSettings>,
    exec_extra_args: Vec<String>,
}

impl NodeBase {
    /// Build the shared part of a node.
    ///
    /// Only structural checks happen here: the name must be usable as a path
    /// component and the port must be non-zero. Uniqueness across the topology
    /// is checked by the orchestrator.
    pub fn new(
        role: NodeRole,
        name: impl Into<String>,
        listen_port: u16,
        settings: Arc<TopologySettings>,
        sync_mode: SyncMode,
        metrics: Option<MetricsSettings>,
        exec_extra_args: Vec<String>,
    ) -> Result<Self, NodeError> {
        let name = name.into();
        validate_node_name(&name).map_err(|reason| NodeError::invalid(&name, role, reason))?;
        if listen_port == 0 {
            return Err(NodeError::invalid(&name, role, "listen port must be non-zero"));
        }

        Ok(Self {
            name,
            role,
            listen_port,
            settings,
            sync_mode,
            metrics,
            exec_extra_args,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn listen_port(&self) -> u16 {
        self.listen_port
    }

    pub fn settings(&self) -> &TopologySettings {
        &self.settings
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    pub fn metrics(&self) -> Option<&MetricsSettings> {
        self.metrics.as_ref()
    }

    pub fn exec_extra_args(&self) -> &[String] {
        &self.exec_extra_args
    }

    /// `<state_dir>/<name>/state`
    pub fn state_dir(&self) -> PathBuf {
        self.settings.state_dir().join(&self.name).join("state")
    }

    /// `<conf_dir>/<name>`
    pub fn conf_dir(&self) -> PathBuf {
        self.settings.conf_dir().join(&self.name)
    }

    /// `<conf_dir>/<name>/client.toml`
    pub fn conf_toml(&self) -> PathBuf {
        self.conf_dir().join(CONF_TOML_FILE)
    }

    /// `<logs_dir>/<name>.log`
    pub fn log_file(&self) -> PathBuf {
        self.settings.logs_dir().join(format!("{}.log", self.name))
    }

    /// Multiaddress other nodes use to reach this one
    pub fn listen_address(&self) -> String {
        format!(
            "/ip4/{}/tcp/{}/ws",
            self.settings.listen_host(),
            self.listen_port
        )
    }

    /// Variables shared by every role.
    pub fn config_context<'a>(&'a self, seed_addresses: &'a [String]) -> NodeConfigContext<'a> {
        let loki = self
            .settings
            .loki()
            .map(|loki| loki.format_for_config_file().with_node(&self.name));

        NodeConfigContext {
            min_peers: MIN_PEERS,
            port: self.listen_port,
            state_path: self.state_dir().to_string_lossy().into_owned(),
            sync_mode: self.sync_mode,
            seed_addresses: seed_addresses.iter().map(String::as_str).collect(),
            metrics: self.metrics.as_ref(),
            loki,
            spammer: None,
            validator: None,
        }
    }

    /// Render `template` with `context` and replace `path` with the output.
    ///
    /// The file is only opened once rendering succeeded, so a missing template
    /// or a bad context never leaves an empty file behind.
    pub fn render_to_file<C: Serialize>(
        &self,
        engine: &dyn TemplateEngine,
        template: &str,
        context: &C,
        path: &Path,
    ) -> Result<(), NodeError> {
        let content = self.render_template(engine, template, context)?;
        self.write_file(template, path, &content)
    }

    /// Render `template` with `context` without touching the filesystem.
    pub fn render_template<C: Serialize>(
        &self,
        engine: &dyn TemplateEngine,
        template: &str,
        context: &C,
    ) -> Result<String, NodeError> {
        let context = serde_json::to_value(context).map_err(|e| NodeError::Render {
            name: self.name.clone(),
            role: self.role,
            template: template.to_string(),
            message: e.to_string(),
        })?;

        engine
            .render(template, &context)
            .map_err(|e| self.template_error(e))
    }

    /// Replace `path` with the already rendered `content` of `template`.
    pub fn write_file(&self, template: &str, path: &Path, content: &str) -> Result<(), NodeError> {
        std::fs::write(path, content).map_err(|source| NodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Rendered {} for {} node '{}' to {:?}", template, self.role, self.name, path);
        Ok(())
    }

    fn template_error(&self, err: TemplateError) -> NodeError {
        match err {
            TemplateError::NotFound(template) => NodeError::TemplateNotFound {
                name: self.name.clone(),
                role: self.role,
                template,
            },
            TemplateError::Render { template, message } => NodeError::Render {
                name: self.name.clone(),
                role: self.role,
                template,
                message,
            },
        }
    }
}

/// Capability contract every devnet participant implements.
pub trait Node {
    /// Shared node state
    fn base(&self) -> &NodeBase;

    /// Template variables for this node, specialized per role.
    fn config_context<'a>(&'a self, seed_addresses: &'a [String]) -> NodeConfigContext<'a> {
        self.base().config_context(seed_addresses)
    }

    /// Write this node's configuration file.
    ///
    /// `seed_addresses` is the topology-wide seed list; it is the same for
    /// every node of a topology.
    fn render(&self, engine: &dyn TemplateEngine, seed_addresses: &[String]) -> Result<(), NodeError> {
        let base = self.base();
        let context = self.config_context(seed_addresses);
        let path = base.conf_toml();
        base.render_to_file(engine, NODE_CONF_TEMPLATE, &context, &path)?;
        info!("Generated configuration for {} node '{}': {:?}", base.role(), base.name(), path);
        Ok(())
    }

    fn name(&self) -> &str {
        self.base().name()
    }

    fn role(&self) -> NodeRole {
        self.base().role()
    }

    fn listen_port(&self) -> u16 {
        self.base().listen_port()
    }

    fn sync_mode(&self) -> SyncMode {
        self.base().sync_mode()
    }

    fn metrics(&self) -> Option<&MetricsSettings> {
        self.base().metrics()
    }

    fn exec_extra_args(&self) -> &[String] {
        self.base().exec_extra_args()
    }

    fn state_dir(&self) -> PathBuf {
        self.base().state_dir()
    }

    fn conf_toml(&self) -> PathBuf {
        self.base().conf_toml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LokiSettings;
    use std::collections::BTreeMap;

    fn settings() -> Arc<TopologySettings> {
        Arc::new(TopologySettings::new("/opt/nimiq", "/tmp/devnet"))
    }

    fn base(name: &str, port: u16) -> Result<NodeBase, NodeError> {
        NodeBase::new(NodeRole::Full, name, port, settings(), SyncMode::History, None, Vec::new())
    }

    #[test]
    fn test_paths_derive_from_name() {
        let node = base("full1", 9000).unwrap();
        assert_eq!(node.state_dir(), PathBuf::from("/tmp/devnet/full1/state"));
        assert_eq!(node.conf_toml(), PathBuf::from("/tmp/devnet/full1/client.toml"));
        assert_eq!(node.log_file(), PathBuf::from("/tmp/devnet/logs/full1.log"));
        assert_eq!(node.listen_address(), "/ip4/127.0.0.1/tcp/9000/ws");
    }

    #[test]
    fn test_rejects_structurally_invalid_input() {
        assert!(matches!(base("", 9000), Err(NodeError::InvalidNode { .. })));
        assert!(matches!(base("../escape", 9000), Err(NodeError::InvalidNode { .. })));
        assert!(matches!(base("full1", 0), Err(NodeError::InvalidNode { .. })));
    }

    #[test]
    fn test_context_omits_absent_metrics() {
        let node = base("full1", 9000).unwrap();
        let seeds = vec!["/ip4/10.0.0.1/tcp/9000/ws".to_string()];
        let value = serde_json::to_value(node.config_context(&seeds)).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["min_peers"], 3);
        assert_eq!(object["sync_mode"], "history");
        assert!(!object.contains_key("metrics"));
        assert!(!object.contains_key("spammer"));
        assert!(!object.contains_key("validator"));
        assert!(object["loki"].is_null());
    }

    #[test]
    fn test_context_tags_loki_with_node_name() {
        let settings = TopologySettings::new("/opt/nimiq", "/tmp/devnet").with_loki(LokiSettings::new(
            "http://loki:3100",
            BTreeMap::new(),
            BTreeMap::new(),
        ));
        let node = NodeBase::new(
            NodeRole::Full,
            "full7",
            9007,
            Arc::new(settings),
            SyncMode::Full,
            Some(MetricsSettings::new("127.0.0.1", 9600)),
            Vec::new(),
        )
        .unwrap();

        let value = serde_json::to_value(node.config_context(&[])).unwrap();
        assert_eq!(value["loki"]["extra_fields"]["nimiq_node"], "full7");
        assert_eq!(value["metrics"]["port"], 9600);
        assert!(node.settings().loki().unwrap().extra_fields().is_empty());
    }
}
