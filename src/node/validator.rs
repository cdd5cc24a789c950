//! Devnet validator node.
//!
//! Key material is generated outside of this crate and handed in as
//! [`ValidatorKeys`]. Besides the node configuration a validator also gets a
//! YAML file with its keys for the deployment tooling.

use crate::node::base::{Node, NodeBase, NodeConfigContext};
use crate::node::error::NodeError;
use crate::node::types::{MetricsSettings, NodeRole, SyncMode};
use crate::settings::TopologySettings;
use crate::template::{TemplateEngine, NODE_CONF_TEMPLATE, VALIDATOR_YAML_TEMPLATE};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// File name of the rendered validator deployment variables.
pub const CONF_YAML_FILE: &str = "validator.yml";

/// Keys and addresses identifying a validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorKeys {
    /// Staking address of the validator
    pub validator_address: String,
    /// Schnorr private key signing validator transactions
    pub signing_key: String,
    /// BLS private key used for voting
    pub voting_key: String,
    /// Private key of the reward (fee) address
    pub fee_key: String,
    /// BLS public key matching `voting_key`, staked in the genesis
    pub voting_public_key: String,
    /// Address receiving the block rewards
    pub reward_address: String,
}

#[derive(Serialize)]
struct ValidatorYamlContext<'a> {
    validator: &'a ValidatorKeys,
}

#[derive(Debug, Clone)]
pub struct Validator {
    base: NodeBase,
    keys: ValidatorKeys,
}

impl Validator {
    pub fn new(
        name: impl Into<String>,
        listen_port: u16,
        settings: Arc<TopologySettings>,
        keys: ValidatorKeys,
        sync_mode: SyncMode,
        metrics: Option<MetricsSettings>,
    ) -> Result<Self, NodeError> {
        let name = name.into();
        if sync_mode == SyncMode::Light {
            return Err(NodeError::invalid(
                &name,
                NodeRole::Validator,
                "validators can't use light sync mode",
            ));
        }
        for (field, value) in [
            ("validator_address", &keys.validator_address),
            ("signing_key", &keys.signing_key),
            ("voting_key", &keys.voting_key),
            ("fee_key", &keys.fee_key),
            ("voting_public_key", &keys.voting_public_key),
            ("reward_address", &keys.reward_address),
        ] {
            if value.trim().is_empty() {
                return Err(NodeError::invalid(
                    &name,
                    NodeRole::Validator,
                    format!("{} cannot be empty", field),
                ));
            }
        }

        let base = NodeBase::new(
            NodeRole::Validator,
            name,
            listen_port,
            settings,
            sync_mode,
            metrics,
            Vec::new(),
        )?;
        Ok(Self { base, keys })
    }

    pub fn keys(&self) -> &ValidatorKeys {
        &self.keys
    }

    pub fn address(&self) -> &str {
        &self.keys.validator_address
    }

    /// `<conf_dir>/<name>/validator.yml`
    pub fn conf_yaml(&self) -> PathBuf {
        self.base.conf_dir().join(CONF_YAML_FILE)
    }
}

impl Node for Validator {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn config_context<'a>(&'a self, seed_addresses: &'a [String]) -> NodeConfigContext<'a> {
        NodeConfigContext {
            validator: Some(&self.keys),
            ..self.base.config_context(seed_addresses)
        }
    }

    /// Write `client.toml` and `validator.yml`.
    ///
    /// Both templates are rendered before either file is written, so a
    /// failure in the second one leaves the first file untouched as well.
    fn render(&self, engine: &dyn TemplateEngine, seed_addresses: &[String]) -> Result<(), NodeError> {
        let conf = self
            .base
            .render_template(engine, NODE_CONF_TEMPLATE, &self.config_context(seed_addresses))?;
        let yaml = self.base.render_template(
            engine,
            VALIDATOR_YAML_TEMPLATE,
            &ValidatorYamlContext { validator: &self.keys },
        )?;

        let conf_toml = self.base.conf_toml();
        let conf_yaml = self.conf_yaml();
        self.base.write_file(NODE_CONF_TEMPLATE, &conf_toml, &conf)?;
        self.base.write_file(VALIDATOR_YAML_TEMPLATE, &conf_yaml, &yaml)?;

        info!(
            "Generated configuration for validator '{}': {:?}, {:?}",
            self.base.name(),
            conf_toml,
            conf_yaml
        );
        Ok(())
    }
}
