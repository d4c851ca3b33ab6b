//! Stable event types and attributes of the coordinator.
//!
//! Consumers parse these from submessage responses, so change them very carefully.

use cosmwasm_std::Event;

pub const EVENT_TYPE_SUBSCRIPTION_CREATED: &str = "subscription_created";
pub const EVENT_TYPE_RANDOM_WORDS_REQUESTED: &str = "random_words_requested";
pub const EVENT_TYPE_RANDOM_WORDS_FULFILLED: &str = "random_words_fulfilled";

pub const ATTR_REQUEST_ID: &str = "request_id";
pub const ATTR_SUBSCRIPTION_ID: &str = "subscription_id";
pub const ATTR_CONSUMER: &str = "consumer";
pub const ATTR_PAYMENT: &str = "payment";

/// Finds the request ID emitted by the coordinator in a list of events.
///
/// Custom events of a contract show up with a `wasm-` prefix once the chain
/// processed them, so both spellings are accepted.
pub fn request_id_from_events(events: &[Event]) -> Option<u64> {
    events
        .iter()
        .filter(|ev| {
            let ty = ev.ty.strip_prefix("wasm-").unwrap_or(&ev.ty);
            ty == EVENT_TYPE_RANDOM_WORDS_REQUESTED
        })
        .flat_map(|ev| ev.attributes.iter())
        .find(|a| a.key == ATTR_REQUEST_ID)
        .and_then(|a| a.value.parse().ok())
}
