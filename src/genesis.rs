//! Devnet genesis.
//!
//! The generator writes `dev-albatross.toml` next to the node configuration.
//! It stakes every validator of the topology and funds the spammer account,
//! so the devnet can produce blocks and the spammer has coins to send. The
//! file is meant to be copied into the client sources before they are built.

use crate::node::{DevnetNode, ValidatorKeys, SPAMMER_ADDRESS};
use crate::template::{TemplateEngine, TemplateError, GENESIS_TEMPLATE};
use serde::Serialize;

/// File name of the rendered genesis configuration.
pub const GENESIS_FILE: &str = "dev-albatross.toml";

pub const GENESIS_NAME: &str = "dev-albatross";
pub const SEED_MESSAGE: &str = "Albatross DevNet";
pub const GENESIS_SIGNING_KEY: &str = "230cf5070e9362108e3549360b84be23826c23839124b917629fb525db3baece";

/// Fixed so that repeated runs produce the same genesis block.
pub const GENESIS_TIMESTAMP: &str = "2019-05-10T23:56:52.776772644+00:00";

/// Stake of every validator, in Luna.
pub const VALIDATOR_STAKE: u64 = 100_000_000;

/// Balance of the spammer funding account, in Luna.
pub const SPAMMER_BALANCE: u64 = 1_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stake {
    pub staker_address: String,
    pub reward_address: String,
    pub validator_key: String,
    pub balance: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub address: String,
    pub balance: u64,
}

/// Variables handed to `genesis.toml.j2`
#[derive(Debug, Clone, Serialize)]
pub struct Genesis {
    pub name: &'static str,
    pub seed_message: &'static str,
    pub signing_key: &'static str,
    pub timestamp: &'static str,
    pub stakes: Vec<Stake>,
    pub accounts: Vec<Account>,
}

impl Genesis {
    /// Stake each validator in declaration order and fund the spammer
    /// account if the topology runs a spammer.
    pub fn from_nodes(nodes: &[DevnetNode]) -> Self {
        let stakes = nodes
            .iter()
            .filter_map(|node| match node {
                DevnetNode::Validator(validator) => Some(Stake::from(validator.keys())),
                _ => None,
            })
            .collect();

        let mut accounts = Vec::new();
        if nodes.iter().any(|node| matches!(node, DevnetNode::Spammer(_))) {
            accounts.push(Account {
                address: SPAMMER_ADDRESS.to_string(),
                balance: SPAMMER_BALANCE,
            });
        }

        Self {
            name: GENESIS_NAME,
            seed_message: SEED_MESSAGE,
            signing_key: GENESIS_SIGNING_KEY,
            timestamp: GENESIS_TIMESTAMP,
            stakes,
            accounts,
        }
    }

    pub fn render(&self, engine: &dyn TemplateEngine) -> Result<String, TemplateError> {
        let context = serde_json::to_value(self).map_err(|e| TemplateError::Render {
            template: GENESIS_TEMPLATE.to_string(),
            message: e.to_string(),
        })?;
        engine.render(GENESIS_TEMPLATE, &context)
    }
}

impl From<&ValidatorKeys> for Stake {
    fn from(keys: &ValidatorKeys) -> Self {
        Self {
            staker_address: keys.validator_address.clone(),
            reward_address: keys.reward_address.clone(),
            validator_key: keys.voting_public_key.clone(),
            balance: VALIDATOR_STAKE,
        }
    }
}
