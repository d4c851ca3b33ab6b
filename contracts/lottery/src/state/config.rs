use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, HexBinary};
use cw_storage_plus::Item;

use super::TopKey;

/// Set once during instantiation, never changed afterwards
#[cw_serde]
pub struct Config {
    /// May replace a randomness request that timed out
    pub manager: Addr,
    /// The VRF coordinator. The only address allowed to deliver randomness.
    pub coordinator: Addr,
    /// The coordinator subscription paying for the randomness
    pub subscription_id: u64,
    /// The VRF key to request randomness with
    pub key_hash: HexBinary,
    pub request_confirmations: u16,
    /// Gas available to the fulfillment callback
    pub callback_gas_limit: u64,
    /// Minimum number of seconds a round stays open
    pub interval: u64,
    /// Minimum payment to enter. The denom is also the denom of the pot.
    pub minimum_entry_fee: Coin,
    /// Seconds after which the manager may replace a pending request
    pub request_timeout: u64,
}

pub const CONFIG: Item<Config> = Item::new(TopKey::Config.as_str());
