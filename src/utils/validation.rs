//! Topology validation utilities.
//!
//! Structural checks on node names and the topology-wide uniqueness rules
//! for names and listen ports.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Node names become path components and Loki field values
static NODE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("Invalid node name regex"));

/// Validate a node name
///
/// Names must start with an ASCII letter or digit and may otherwise contain
/// letters, digits, `.`, `_` and `-`.
///
/// # Examples
/// ```
/// use nimiq_devnet::utils::validation::validate_node_name;
///
/// assert!(validate_node_name("validator1").is_ok());
/// assert!(validate_node_name("spammer-0").is_ok());
/// assert!(validate_node_name("").is_err());
/// assert!(validate_node_name("../etc").is_err());
/// ```
pub fn validate_node_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name cannot be empty".to_string());
    }
    if !NODE_NAME.is_match(name) {
        return Err(format!(
            "name '{}' may only contain letters, digits, '.', '_' and '-' and must start with a letter or digit",
            name
        ));
    }
    Ok(())
}

/// Validate that node names and listen ports are unique
///
/// # Arguments
/// * `nodes` - `(name, listen_port)` of every node in the topology
///
/// # Returns
/// * `Ok(())` if every name and every port is used once
/// * `Err(String)` naming the first duplicate otherwise
pub fn validate_unique_nodes<'a, I>(nodes: I) -> Result<(), String>
where
    I: IntoIterator<Item = (&'a str, u16)>,
{
    let mut names = HashSet::new();
    let mut ports = HashSet::new();

    for (name, port) in nodes {
        if !names.insert(name) {
            return Err(format!("duplicate node name '{}'", name));
        }
        if !ports.insert(port) {
            return Err(format!("listen port {} of node '{}' is already in use", port, name));
        }
    }

    Ok(())
}

/// Validate a seed multiaddress of the form `/ip4/<host>/tcp/<port>/...`
pub fn validate_seed_address(address: &str) -> Result<(), String> {
    let parts: Vec<&str> = address.split('/').collect();
    // Leading '/' yields an empty first segment
    if parts.len() < 5 || !parts[0].is_empty() {
        return Err(format!("seed address '{}' is not a multiaddress", address));
    }

    match parts[1] {
        "ip4" => {
            if parts[2].parse::<std::net::Ipv4Addr>().is_err() {
                return Err(format!("invalid IPv4 address in seed address '{}'", address));
            }
        }
        "ip6" => {
            if parts[2].parse::<std::net::Ipv6Addr>().is_err() {
                return Err(format!("invalid IPv6 address in seed address '{}'", address));
            }
        }
        "dns" | "dns4" | "dns6" => {
            if parts[2].is_empty() {
                return Err(format!("empty host in seed address '{}'", address));
            }
        }
        other => {
            return Err(format!("unsupported protocol '{}' in seed address '{}'", other, address));
        }
    }

    if parts[3] != "tcp" || parts[4].parse::<u16>().map_or(true, |port| port == 0) {
        return Err(format!("seed address '{}' needs a non-zero tcp port", address));
    }

    Ok(())
}
