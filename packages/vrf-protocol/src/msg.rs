use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Binary, HexBinary, StdResult, Uint256};

/// Parameters of a randomness request
#[cw_serde]
pub struct RandomWordsRequest {
    /// Identifies the VRF key (and with it the gas lane) to use
    pub key_hash: HexBinary,
    /// The subscription that pays for the fulfillment
    pub subscription_id: u64,
    /// How many blocks the oracle waits before it answers
    pub request_confirmations: u16,
    /// Gas limit for the `RawFulfillRandomWords` callback into the consumer
    pub callback_gas_limit: u64,
    /// Number of 256 bit words to deliver
    pub num_words: u32,
}

/// The part of the coordinator interface consumers call.
/// The actual coordinator includes this variant in its larger ExecuteMsg enum.
#[cw_serde]
pub enum CoordinatorExecuteMsg {
    /// Requests randomness. The request ID is emitted in the
    /// `random_words_requested` event of the same transaction.
    RequestRandomWords(RandomWordsRequest),
}

/// This should be de/serialized under `RawFulfillRandomWords` in a consumer's ExecuteMsg
#[cw_serde]
pub enum ConsumerExecuteMsg {
    RawFulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}

impl ConsumerExecuteMsg {
    pub fn fulfill(request_id: u64, random_words: Vec<Uint256>) -> StdResult<Binary> {
        to_json_binary(&ConsumerExecuteMsg::RawFulfillRandomWords {
            request_id,
            random_words,
        })
    }
}
