use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Timestamp;
use cw_storage_plus::Item;

use super::TopKey;

#[cw_serde]
#[derive(Copy, Eq, Default)]
pub enum LotteryState {
    /// Accepting entries
    #[default]
    Open,
    /// Waiting for randomness. No entries, no further requests.
    Calculating,
}

impl fmt::Display for LotteryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotteryState::Open => f.write_str("open"),
            LotteryState::Calculating => f.write_str("calculating"),
        }
    }
}

/// The one randomness request the lottery waits for
#[cw_serde]
pub struct PendingRequest {
    pub request_id: u64,
    pub requested_at: Timestamp,
}

pub const LOTTERY_STATE: Item<LotteryState> = Item::new(TopKey::LotteryState.as_str());

/// Start of the current round
pub const LAST_TIMESTAMP: Item<Timestamp> = Item::new(TopKey::LastTimestamp.as_str());

/// Set while the state is calculating and the coordinator accepted the request
pub const PENDING_REQUEST: Item<PendingRequest> = Item::new(TopKey::PendingRequest.as_str());
