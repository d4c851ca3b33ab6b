mod events;
mod msg;

pub use events::{
    request_id_from_events, ATTR_CONSUMER, ATTR_PAYMENT, ATTR_REQUEST_ID, ATTR_SUBSCRIPTION_ID,
    EVENT_TYPE_RANDOM_WORDS_FULFILLED, EVENT_TYPE_RANDOM_WORDS_REQUESTED,
    EVENT_TYPE_SUBSCRIPTION_CREATED,
};
pub use msg::{ConsumerExecuteMsg, CoordinatorExecuteMsg, RandomWordsRequest};

/// Upper bound for `num_words` in a single request
pub const MAX_NUM_WORDS: u32 = 500;

/// Upper bound for the gas a consumer may reserve for its callback
pub const MAX_CALLBACK_GAS_LIMIT: u64 = 2_500_000;

/// Upper bound for the confirmations a consumer may wait for
pub const MAX_REQUEST_CONFIRMATIONS: u16 = 200;

/// Maximum number of consumers per subscription
pub const MAX_CONSUMERS: usize = 100;
