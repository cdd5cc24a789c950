//! # nimiq-devnet - Configuration generator for local Nimiq devnets
//!
//! This library renders the per-node configuration files of a disposable,
//! locally simulated Albatross network. Every node of the topology (seed,
//! validator, full, light, spammer) gets a `client.toml` reflecting its role,
//! listen port, sync mode, seed list and optional observability hookups.
//!
//! ## Architecture
//!
//! - `settings`: topology-wide settings shared by every node (directories,
//!   release flag, Loki log shipping)
//! - `node`: the node roles, their shared contract and the rendering algorithm
//! - `template`: the templating capability and its `minijinja` backend
//! - `config` / `config_loader`: YAML topology files
//! - `orchestrator`: builds the nodes, computes seed addresses and renders
//!   the whole topology
//! - `genesis`: the devnet genesis staking the validators
//! - `registry`: the `nodes.json` hand-off for the launch tooling
//! - `utils`: binary resolution and validation helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nimiq_devnet::{config_loader, orchestrator::Topology, template::JinjaTemplates};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("topology.yaml"))?;
//! let topology = Topology::from_config(&config)?;
//! let templates = JinjaTemplates::builtin()?;
//! let summary = topology.generate(&templates)?;
//! println!("registry written to {:?}", summary.registry_path);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Rendering a single node
//!
//! ```rust,no_run
//! use nimiq_devnet::node::{Node, Spammer, SyncMode};
//! use nimiq_devnet::settings::TopologySettings;
//! use nimiq_devnet::template::JinjaTemplates;
//! use std::sync::Arc;
//!
//! let settings = Arc::new(TopologySettings::new("/opt/nimiq", "/tmp/devnet"));
//! let spammer = Spammer::new("spammer-0", 9001, settings, 50, SyncMode::History, None)?;
//! let seeds = vec!["/ip4/127.0.0.1/tcp/8443/ws".to_string()];
//! spammer.render(&JinjaTemplates::builtin()?, &seeds)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Core types report `thiserror` errors ([`node::NodeError`],
//! [`template::TemplateError`], [`config::ValidationError`]); the loader and
//! the orchestrator wrap them into `color_eyre` reports with context. Nothing
//! is retried: the first failure aborts generation.

pub mod config;
pub mod config_loader;
pub mod genesis;
pub mod node;
pub mod orchestrator;
pub mod registry;
pub mod settings;
pub mod template;
pub mod utils;
