use thiserror::Error;

use cosmwasm_std::StdError;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Subscription {subscription_id} does not exist")]
    InvalidSubscription { subscription_id: u64 },

    #[error("Only the subscription owner can do this")]
    MustBeSubOwner,

    #[error("Sender is not a consumer of subscription {subscription_id}")]
    InvalidConsumer { subscription_id: u64 },

    #[error("Subscription has too many consumers")]
    TooManyConsumers,

    #[error("Funding amount must not be zero")]
    ZeroFunding,

    #[error("Subscription balance too low to pay for the fulfillment")]
    InsufficientBalance,

    #[error("Number of words must be between 1 and {max}")]
    InvalidNumWords { max: u32 },

    #[error("Callback gas limit {have} exceeds the maximum of {want}")]
    GasLimitTooBig { have: u64, want: u64 },

    #[error("Request confirmations {have} exceed the maximum of {want}")]
    InvalidRequestConfirmations { have: u16, want: u16 },

    #[error("Request {request_id} is unknown or already fulfilled")]
    InvalidRequest { request_id: u64 },

    #[error("Consumer does not match the one that made the request")]
    ConsumerMismatch,

    #[error("Expected {want} words, got {have}")]
    WrongNumberOfWords { have: usize, want: u32 },
}
