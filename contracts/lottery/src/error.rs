use thiserror::Error;

use cosmwasm_std::{Coin, StdError, Timestamp, Uint128};

use crate::state::LotteryState;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Key hash must be 32 bytes long")]
    InvalidKeyHash,

    // Entering
    #[error("Entry fee not enough. Required: {required}")]
    FeeNotEnough { required: Coin },

    #[error("Lottery is closed")]
    Closed,

    // Upkeep
    #[error(
        "Upkeep not needed (balance: {balance}, participants: {participants}, state: {state})"
    )]
    UpkeepNotNeeded {
        balance: Uint128,
        participants: u32,
        state: LotteryState,
    },

    #[error("Coordinator response did not contain a request ID")]
    MissingRequestId,

    #[error("A randomness request is already pending")]
    RequestAlreadyPending,

    #[error("Lottery is not waiting for randomness")]
    NotCalculating,

    #[error("Pending request can only be replaced after {retry_after}")]
    RequestNotTimedOut { retry_after: Timestamp },

    // Fulfillment
    #[error("Only coordinator can fulfill. Have: {have}, want: {want}")]
    OnlyCoordinatorCanFulfill { have: String, want: String },

    #[error("Request {request_id} is not the pending request")]
    InvalidRequest { request_id: u64 },

    #[error("No random words received")]
    NoRandomWords,

    #[error("No participants to pick a winner from")]
    NoParticipants,

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Unknown reply ID: {id}")]
    InvalidReplyId { id: u64 },
}
