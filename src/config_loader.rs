use crate::config::TopologyConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;

/// Load, parse and validate a topology file
pub fn load_config(config_path: &Path) -> Result<TopologyConfig> {
    info!("Loading topology from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open topology file '{}'", config_path.display()))?;

    let config: TopologyConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse topology file '{}'", config_path.display()))?;

    config.validate()?;

    for (role, count) in config.role_counts() {
        info!("Topology declares {} {} node(s)", count, role);
    }
    if config.settings.loki.is_none() {
        info!("No Loki settings, nodes will only log to their log files");
    }
    if !config.nodes.iter().any(|node| node.role() == crate::node::NodeRole::Seed)
        && config.extra_seed_addresses.is_empty()
    {
        warn!("Topology has no seed nodes and no extra seed addresses, nodes will not find peers");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_topology() {
        let yaml = r#"
settings:
  nimiq_dir: /opt/nimiq
  conf_dir: /tmp/devnet/conf
  state_dir: /tmp/devnet/state
  logs_dir: /tmp/devnet/logs
  release: true
nodes:
  - role: seed
    name: seed1
    listen_port: 8443
  - role: full
    name: full1
    listen_port: 8444
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert!(config.settings.release);
        assert_eq!(config.nodes.len(), 2);
    }

    #[test]
    fn test_load_rejects_invalid_topology() {
        let yaml = r#"
settings:
  nimiq_dir: /opt/nimiq
  conf_dir: /tmp/devnet/conf
  state_dir: /tmp/devnet/state
  logs_dir: /tmp/devnet/logs
nodes:
  - role: full
    name: full1
    listen_port: 8444
  - role: full
    name: full1
    listen_port: 8445
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate node name"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_config(Path::new("/nonexistent/topology.yaml")).is_err());
    }
}
