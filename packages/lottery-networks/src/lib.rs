//! Deployment parameters of the lottery per network

use cosmwasm_std::{coin, HexBinary, StdError};
use lottery::msg::InstantiateMsg;
use thiserror::Error;

/// Networks without a real VRF coordinator. A mock coordinator is deployed there.
pub const DEVELOPMENT_CHAINS: &[&str] = &["testing", "localnet"];

const DEFAULT_KEY_HASH: &str = "787d74caea10b2b357790d5b5247c2f63d1d91572a9846f780606e4d953677ae";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub name: &'static str,
    pub chain_id: &'static str,
    /// Hex encoded VRF key hash (32 bytes)
    pub key_hash: &'static str,
    pub callback_gas_limit: u64,
    /// Used as the request confirmations of the lottery
    pub block_confirmations: u16,
    /// Round duration in seconds
    pub interval: u64,
    pub minimum_entry_fee: u128,
    pub fee_denom: &'static str,
    /// Known coordinator deployment
    pub coordinator: Option<&'static str>,
    /// Known subscription of the deployer
    pub subscription_id: Option<u64>,
}

pub const NETWORKS: &[Network] = &[
    Network {
        name: "testing",
        // chain ID of cosmwasm-std's and cw-multi-test's mock environment
        chain_id: "cosmos-testnet-14002",
        key_hash: DEFAULT_KEY_HASH,
        callback_gas_limit: 500_000,
        block_confirmations: 1,
        interval: 10,
        minimum_entry_fee: 1_000,
        fee_denom: "ucosm",
        coordinator: None,
        subscription_id: None,
    },
    Network {
        name: "localnet",
        chain_id: "localnet",
        key_hash: DEFAULT_KEY_HASH,
        callback_gas_limit: 500_000,
        block_confirmations: 1,
        interval: 60,
        minimum_entry_fee: 1_000,
        fee_denom: "ustake",
        coordinator: None,
        subscription_id: None,
    },
    Network {
        name: "testnet",
        chain_id: "uni-6",
        key_hash: DEFAULT_KEY_HASH,
        callback_gas_limit: 500_000,
        // about 15 minutes
        block_confirmations: 150,
        interval: 3600,
        minimum_entry_fee: 1_000,
        fee_denom: "ujunox",
        coordinator: None,
        subscription_id: None,
    },
];

#[derive(Error, Debug, PartialEq)]
pub enum NetworkError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unknown chain ID: {chain_id}")]
    UnknownChain { chain_id: String },

    #[error("No coordinator known for network {network}")]
    MissingCoordinator { network: String },

    #[error("No subscription known for network {network}")]
    MissingSubscription { network: String },

    #[error("Key hash must be 32 bytes long")]
    InvalidKeyHash,
}

pub fn network_by_chain_id(chain_id: &str) -> Result<&'static Network, NetworkError> {
    NETWORKS
        .iter()
        .find(|network| network.chain_id == chain_id)
        .ok_or_else(|| NetworkError::UnknownChain {
            chain_id: chain_id.to_string(),
        })
}

pub fn network_by_name(name: &str) -> Option<&'static Network> {
    NETWORKS.iter().find(|network| network.name == name)
}

pub fn is_development_chain(name: &str) -> bool {
    DEVELOPMENT_CHAINS.contains(&name)
}

impl Network {
    pub fn is_development(&self) -> bool {
        is_development_chain(self.name)
    }

    pub fn key_hash(&self) -> Result<HexBinary, NetworkError> {
        let key_hash = HexBinary::from_hex(self.key_hash)?;
        if key_hash.len() != 32 {
            return Err(NetworkError::InvalidKeyHash);
        }
        Ok(key_hash)
    }

    /// Builds the lottery instantiation for this network.
    ///
    /// `coordinator` and `subscription_id` override the known values. On development
    /// chains these come from the freshly deployed mock coordinator.
    pub fn instantiate_msg(
        &self,
        coordinator: Option<&str>,
        subscription_id: Option<u64>,
    ) -> Result<InstantiateMsg, NetworkError> {
        let coordinator = coordinator.or(self.coordinator).ok_or_else(|| {
            NetworkError::MissingCoordinator {
                network: self.name.to_string(),
            }
        })?;
        let subscription_id = subscription_id.or(self.subscription_id).ok_or_else(|| {
            NetworkError::MissingSubscription {
                network: self.name.to_string(),
            }
        })?;
        Ok(InstantiateMsg {
            manager: None,
            coordinator: coordinator.to_string(),
            subscription_id,
            key_hash: self.key_hash()?,
            request_confirmations: Some(self.block_confirmations),
            callback_gas_limit: self.callback_gas_limit,
            interval: self.interval,
            minimum_entry_fee: coin(self.minimum_entry_fee, self.fee_denom),
            request_timeout: None,
        })
    }
}
