use std::fs;
use std::io::Write;
use std::path::Path;

use nimiq_devnet::config_loader::load_config;
use nimiq_devnet::node::{Node, NodeRole, SPAMMER_ADDRESS};
use nimiq_devnet::orchestrator::Topology;
use nimiq_devnet::registry::NodeRegistry;
use nimiq_devnet::template::JinjaTemplates;
use tempfile::NamedTempFile;

fn topology_yaml(work_dir: &Path) -> String {
    format!(
        r#"
settings:
  nimiq_dir: /opt/nimiq
  conf_dir: {dir}/conf
  state_dir: {dir}/state
  logs_dir: {dir}/logs
  loki:
    url: http://localhost:3100
    labels:
      environment: devnet
nodes:
  - role: seed
    name: seed1
    listen_port: 8443
  - role: seed
    name: seed2
    listen_port: 8444
  - role: validator
    name: validator1
    listen_port: 9100
    keys:
      validator_address: "NQ20 TSB0 DFSM UH9C 15GQ GAGJ TTE4 D3MA 859E"
      signing_key: "041580cc67e66e9e08b68fd9e4c9deb68737168fbe7488de2638c2e906c2f5ad"
      voting_key: "99237809f3b37bd0878854d2b5b66e4cc00ba1a1d64377c374f2b6d1bf3dec78"
      fee_key: "9e5e3ab1d4b3cc8b7fe0b9d6e3c4c0d0e5cb9d3a5bd3b3d1c5a1d7c0b4e3a2f1"
      voting_public_key: "b1d0a3f2c4e5"
      reward_address: "NQ07 0000 0000 0000 0000 0000 0000 0000 0000"
  - role: spammer
    name: spammer1
    listen_port: 9200
    tpb: 50
    metrics:
      host: 127.0.0.1
      port: 9500
  - role: light
    name: light1
    listen_port: 9300
"#,
        dir = work_dir.display()
    )
}

fn load(work_dir: &Path) -> Topology {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", topology_yaml(work_dir)).unwrap();
    let config = load_config(file.path()).unwrap();
    Topology::from_config(&config).unwrap()
}

#[test]
fn test_generate_full_topology() {
    let dir = tempfile::tempdir().unwrap();
    let topology = load(dir.path());
    let templates = JinjaTemplates::builtin().unwrap();

    let summary = topology.generate(&templates).unwrap();

    // One TOML per node, the validator YAML and the genesis
    assert_eq!(summary.files.len(), 7);
    for file in &summary.files {
        assert!(file.exists(), "{:?} was not written", file);
    }
    assert_eq!(
        summary.seed_addresses,
        vec!["/ip4/127.0.0.1/tcp/8443/ws", "/ip4/127.0.0.1/tcp/8444/ws"]
    );

    for node in topology.nodes() {
        assert!(node.state_dir().is_dir());
        let content = fs::read_to_string(node.conf_toml()).unwrap();
        assert!(content.contains(&format!("\"nimiq_node\" = \"{}\"", node.name())));
        assert_eq!(content.contains("spammer = true"), node.role() == NodeRole::Spammer);
    }
    assert!(dir.path().join("logs").is_dir());

    let seed1 = fs::read_to_string(topology.node("seed1").unwrap().conf_toml()).unwrap();
    assert!(!seed1.contains("/ip4/127.0.0.1/tcp/8443/ws"));
    assert!(seed1.contains("/ip4/127.0.0.1/tcp/8444/ws"));

    let light1 = fs::read_to_string(topology.node("light1").unwrap().conf_toml()).unwrap();
    assert!(light1.contains("/ip4/127.0.0.1/tcp/8443/ws"));
    assert!(light1.contains("/ip4/127.0.0.1/tcp/8444/ws"));
    assert!(light1.contains("sync_mode = \"light\""));
}

#[test]
fn test_genesis_stakes_validators_and_funds_spammer() {
    let dir = tempfile::tempdir().unwrap();
    let topology = load(dir.path());
    let templates = JinjaTemplates::builtin().unwrap();

    let summary = topology.generate(&templates).unwrap();
    assert_eq!(summary.genesis_path, dir.path().join("conf").join("dev-albatross.toml"));

    let genesis = fs::read_to_string(&summary.genesis_path).unwrap();
    assert_eq!(genesis.matches("[[stakes]]").count(), 1);
    assert!(genesis.contains("staker_address = \"NQ20 TSB0 DFSM UH9C 15GQ GAGJ TTE4 D3MA 859E\""));
    assert!(genesis.contains("validator_key = \"b1d0a3f2c4e5\""));
    assert!(genesis.contains(&format!("address = \"{}\"", SPAMMER_ADDRESS)));
}

#[test]
fn test_registry_describes_every_node() {
    let dir = tempfile::tempdir().unwrap();
    let topology = load(dir.path());
    let templates = JinjaTemplates::builtin().unwrap();

    let summary = topology.generate(&templates).unwrap();
    assert_eq!(summary.registry_path, dir.path().join("conf").join("nodes.json"));

    let registry: NodeRegistry =
        serde_json::from_str(&fs::read_to_string(&summary.registry_path).unwrap()).unwrap();
    assert_eq!(registry.nodes.len(), topology.nodes().len());

    let spammer = registry.get("spammer1").unwrap();
    assert_eq!(spammer.role, NodeRole::Spammer);
    assert_eq!(spammer.exec_args[0], "-c");
    assert!(spammer.exec_args.ends_with(&["-t".to_string(), "50".to_string()]));
    assert!(spammer.binary.ends_with("target/debug/nimiq-spammer"));

    let validator = registry.get("validator1").unwrap();
    assert_eq!(validator.address.as_deref(), Some("NQ20 TSB0 DFSM UH9C 15GQ GAGJ TTE4 D3MA 859E"));
    assert_eq!(validator.exec_args.len(), 2);
}

#[test]
fn test_generation_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let topology = load(dir.path());
    let templates = JinjaTemplates::builtin().unwrap();

    let first = topology.generate(&templates).unwrap();
    let before: Vec<String> = first
        .files
        .iter()
        .map(|file| fs::read_to_string(file).unwrap())
        .collect();

    let second = topology.generate(&templates).unwrap();
    let after: Vec<String> = second
        .files
        .iter()
        .map(|file| fs::read_to_string(file).unwrap())
        .collect();

    assert_eq!(before, after);
}

#[test]
fn test_missing_template_aborts_generation() {
    let dir = tempfile::tempdir().unwrap();
    let template_dir = tempfile::tempdir().unwrap();
    let topology = load(dir.path());

    let templates = JinjaTemplates::from_dir(template_dir.path());
    let err = topology.generate(&templates).unwrap_err();

    assert!(err.to_string().contains("seed1"));
    assert!(!topology.node("seed1").unwrap().conf_toml().exists());
    assert!(!dir.path().join("conf").join("nodes.json").exists());
}
