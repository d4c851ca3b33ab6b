use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Uint128, Uint256};
use vrf_protocol::RandomWordsRequest;

use crate::state::{Config, Request, Subscription};

#[cw_serde]
pub struct InstantiateMsg {
    /// The flat fee a subscription pays per fulfilled request
    pub base_fee: Uint128,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Creates a subscription owned by the sender
    CreateSubscription {},
    /// Adds to the bookkeeping balance of a subscription
    FundSubscription {
        subscription_id: u64,
        amount: Uint128,
    },
    AddConsumer {
        subscription_id: u64,
        /// Address of the consumer contract
        consumer: String,
    },
    RemoveConsumer {
        subscription_id: u64,
        /// Address of the consumer contract
        consumer: String,
    },
    /// Called by consumers. Wire compatible with [`vrf_protocol::CoordinatorExecuteMsg`].
    RequestRandomWords(RandomWordsRequest),
    /// Delivers pseudo-random words derived from the request to the consumer
    FulfillRandomWords { request_id: u64, consumer: String },
    /// Delivers the given words to the consumer
    FulfillRandomWordsWithOverride {
        request_id: u64,
        consumer: String,
        words: Vec<Uint256>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Get the config state
    #[returns(ConfigResponse)]
    Config {},
    #[returns(SubscriptionResponse)]
    Subscription { subscription_id: u64 },
    /// Gets a request that is waiting for fulfillment
    #[returns(RequestResponse)]
    Request { request_id: u64 },
}

// We define a custom struct for each query response
pub type ConfigResponse = Config;

#[cw_serde]
pub struct SubscriptionResponse {
    pub subscription: Option<Subscription>,
}

#[cw_serde]
pub struct RequestResponse {
    pub request: Option<Request>,
}
