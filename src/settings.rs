//! Topology-wide settings shared by every node.
//!
//! A single [`TopologySettings`] value is built before any node exists and is
//! then handed to each node behind an `Arc`. Nothing mutates it afterwards, so
//! nodes can read it during rendering without any locking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key under which each node stamps its own name into the Loki extra fields.
pub const LOKI_NODE_FIELD: &str = "nimiq_node";

/// Default host used in listen and seed multiaddresses.
pub const DEFAULT_LISTEN_HOST: &str = "127.0.0.1";

/// Centralized log shipping (Loki) settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LokiSettings {
    /// Loki push URL
    pub url: String,
    /// Labels attached to every stream
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Extra fields attached to every log line
    #[serde(default)]
    pub extra_fields: BTreeMap<String, String>,
}

impl LokiSettings {
    pub fn new(
        url: impl Into<String>,
        labels: BTreeMap<String, String>,
        extra_fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            url: url.into(),
            labels,
            extra_fields,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn extra_fields(&self) -> &BTreeMap<String, String> {
        &self.extra_fields
    }

    /// Produce the `loki` block expected by the node configuration template.
    ///
    /// The returned value is an independent copy: callers enrich it (each node
    /// adds its own name) without affecting the shared settings.
    pub fn format_for_config_file(&self) -> LokiConfig {
        LokiConfig {
            url: self.url.clone(),
            labels: self.labels.clone(),
            extra_fields: self.extra_fields.clone(),
        }
    }
}

/// Loki block as it appears in a rendered node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LokiConfig {
    pub url: String,
    pub labels: BTreeMap<String, String>,
    pub extra_fields: BTreeMap<String, String>,
}

impl LokiConfig {
    /// Tag every log line shipped by this configuration with `node`.
    pub fn with_node(mut self, node: &str) -> Self {
        self.extra_fields
            .insert(LOKI_NODE_FIELD.to_string(), node.to_string());
        self
    }
}

/// General topology settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySettings {
    /// Checkout of the node software; binaries are resolved below `target/`
    pub nimiq_dir: PathBuf,
    /// Root directory of the generated configuration files
    pub conf_dir: PathBuf,
    /// Root directory of the node state (databases, peer keys)
    pub state_dir: PathBuf,
    /// Directory receiving the node log files
    pub logs_dir: PathBuf,
    /// Run binaries built in release mode
    #[serde(default)]
    pub release: bool,
    /// Host part of listen and seed multiaddresses
    #[serde(default = "default_listen_host")]
    pub listen_host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loki: Option<LokiSettings>,
}

fn default_listen_host() -> String {
    DEFAULT_LISTEN_HOST.to_string()
}

impl TopologySettings {
    /// Settings with every output directory below `work_dir`.
    pub fn new(nimiq_dir: impl Into<PathBuf>, work_dir: impl AsRef<Path>) -> Self {
        let work_dir = work_dir.as_ref();
        Self {
            nimiq_dir: nimiq_dir.into(),
            conf_dir: work_dir.to_path_buf(),
            state_dir: work_dir.to_path_buf(),
            logs_dir: work_dir.join("logs"),
            release: false,
            listen_host: default_listen_host(),
            loki: None,
        }
    }

    pub fn with_loki(mut self, loki: LokiSettings) -> Self {
        self.loki = Some(loki);
        self
    }

    pub fn with_release(mut self, release: bool) -> Self {
        self.release = release;
        self
    }

    pub fn nimiq_dir(&self) -> &Path {
        &self.nimiq_dir
    }

    pub fn conf_dir(&self) -> &Path {
        &self.conf_dir
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn release(&self) -> bool {
        self.release
    }

    pub fn listen_host(&self) -> &str {
        &self.listen_host
    }

    /// Logging sink settings, `None` when log shipping is disabled.
    pub fn loki(&self) -> Option<&LokiSettings> {
        self.loki.as_ref()
    }
}
