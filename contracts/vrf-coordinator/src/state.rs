use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, StdResult, Storage, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    /// The flat fee a subscription pays per fulfilled request
    pub base_fee: Uint128,
}

#[cw_serde]
pub struct Subscription {
    pub owner: Addr,
    /// Bookkeeping balance. Funding does not move tokens.
    pub balance: Uint128,
    /// Contracts allowed to request randomness on this subscription
    pub consumers: Vec<Addr>,
    /// Number of requests made in total
    pub request_count: u64,
}

/// A request waiting for fulfillment
#[cw_serde]
pub struct Request {
    pub consumer: Addr,
    pub subscription_id: u64,
    pub key_hash: HexBinary,
    pub request_confirmations: u16,
    pub callback_gas_limit: u64,
    pub num_words: u32,
    pub height: u64,
    pub time: Timestamp,
}

/// Top level storage key. Values must not conflict.
/// Each key is only one byte long to ensure we use the smallest possible storage keys.
#[repr(u8)]
pub enum TopKey {
    Config = b'c',
    Subscriptions = b's',
    LastSubscriptionId = b'S',
    Requests = b'r',
    LastRequestId = b'R',
}

impl TopKey {
    const fn as_str(&self) -> &str {
        let array_ref = unsafe { std::mem::transmute::<_, &[u8; 1]>(self) };
        match core::str::from_utf8(array_ref) {
            Ok(a) => a,
            Err(_) => panic!("Non-utf8 enum value found. Use a-z, A-Z and 0-9"),
        }
    }
}

pub const CONFIG: Item<Config> = Item::new(TopKey::Config.as_str());

pub const SUBSCRIPTIONS: Map<u64, Subscription> = Map::new(TopKey::Subscriptions.as_str());
const LAST_SUBSCRIPTION_ID: Item<u64> = Item::new(TopKey::LastSubscriptionId.as_str());

/// Requests by request ID. Fulfilled requests are removed.
pub const REQUESTS: Map<u64, Request> = Map::new(TopKey::Requests.as_str());
const LAST_REQUEST_ID: Item<u64> = Item::new(TopKey::LastRequestId.as_str());

/// Creates a new subscription ID. IDs start at 1.
pub fn next_subscription_id(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = LAST_SUBSCRIPTION_ID.may_load(storage)?.unwrap_or_default() + 1;
    LAST_SUBSCRIPTION_ID.save(storage, &id)?;
    Ok(id)
}

/// Creates a new request ID. IDs start at 1.
pub fn next_request_id(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = LAST_REQUEST_ID.may_load(storage)?.unwrap_or_default() + 1;
    LAST_REQUEST_ID.save(storage, &id)?;
    Ok(id)
}
