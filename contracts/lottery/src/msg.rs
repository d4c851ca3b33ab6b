use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin, HexBinary, Timestamp, Uint128, Uint256};

use crate::state::{Config, LotteryState, PendingRequest, Winner};

#[cw_serde]
pub struct InstantiateMsg {
    /// Address allowed to replace a timed out randomness request.
    /// Defaults to the sender.
    pub manager: Option<String>,
    /// Address of the VRF coordinator
    pub coordinator: String,
    /// The coordinator subscription this lottery is a consumer of
    pub subscription_id: u64,
    /// 32 byte VRF key hash
    pub key_hash: HexBinary,
    /// Defaults to [`DEFAULT_REQUEST_CONFIRMATIONS`](crate::contract::DEFAULT_REQUEST_CONFIRMATIONS)
    pub request_confirmations: Option<u16>,
    pub callback_gas_limit: u64,
    /// Minimum duration of a round in seconds
    pub interval: u64,
    pub minimum_entry_fee: Coin,
    /// Defaults to [`DEFAULT_REQUEST_TIMEOUT`](crate::contract::DEFAULT_REQUEST_TIMEOUT)
    pub request_timeout: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Enter the current round. Send at least the minimum entry fee.
    EnterLottery {},
    /// Starts the draw if upkeep is needed. Callable by anyone.
    PerformUpkeep { perform_data: Binary },
    /// Called by the coordinator. Wire compatible with [`vrf_protocol::ConsumerExecuteMsg`].
    RawFulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
    /// Replaces a pending randomness request that was not fulfilled in time.
    /// Only the manager can do this.
    RetryRandomnessRequest {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Get the config state
    #[returns(ConfigResponse)]
    Config {},
    #[returns(LotteryStateResponse)]
    LotteryState {},
    /// Entries of the current round in order of entering
    #[returns(ParticipantsResponse)]
    Participants {
        offset: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(ParticipantCountResponse)]
    ParticipantCount {},
    /// Winners in ascending order (oldest first)
    #[returns(WinnersResponse)]
    WinnersAsc {
        offset: Option<u32>,
        limit: Option<u32>,
    },
    /// Winners in descending order (newest first)
    #[returns(WinnersResponse)]
    WinnersDesc {
        offset: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(RecentWinnerResponse)]
    RecentWinner {},
    /// Start of the current round
    #[returns(TimestampResponse)]
    LastTimestamp {},
    /// Current block time
    #[returns(TimestampResponse)]
    CurrentTimestamp {},
    #[returns(PendingRequestResponse)]
    PendingRequest {},
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep { check_data: Binary },
    /// The amount the next winner receives
    #[returns(PotResponse)]
    Pot {},
}

// We define a custom struct for each query response
pub type ConfigResponse = Config;

#[cw_serde]
pub struct LotteryStateResponse {
    pub state: LotteryState,
}

#[cw_serde]
pub struct ParticipantsResponse {
    pub participants: Vec<Addr>,
}

#[cw_serde]
pub struct ParticipantCountResponse {
    pub count: u32,
}

#[cw_serde]
pub struct WinnersResponse {
    pub winners: Vec<Winner>,
}

#[cw_serde]
pub struct RecentWinnerResponse {
    pub winner: Option<Winner>,
}

#[cw_serde]
pub struct TimestampResponse {
    pub timestamp: Timestamp,
}

#[cw_serde]
pub struct PendingRequestResponse {
    pub pending: Option<PendingRequest>,
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    /// The check data, to be passed to `PerformUpkeep`
    pub perform_data: Binary,
}

#[cw_serde]
pub struct PotResponse {
    pub amount: Uint128,
    pub denom: String,
}
