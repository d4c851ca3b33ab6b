use cosmwasm_std::Event;
use lottery::attributes::{
    ATTR_PARTICIPANT, ATTR_PRIZE, ATTR_REQUEST_ID, ATTR_WINNER, EVENT_TYPE_ENTERED,
    EVENT_TYPE_REQUESTED_WINNER, EVENT_TYPE_WINNER_SELECTED,
};

/// Event type without the `wasm-` prefix the chain adds to custom events
pub(crate) fn normalized_type(event: &Event) -> &str {
    event.ty.strip_prefix("wasm-").unwrap_or(&event.ty)
}

fn attr<'a>(event: &'a Event, key: &str) -> Option<&'a str> {
    event
        .attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.as_str())
}

/// The request ID of the first `requested_lottery_winner` event
pub fn requested_winner_request_id(events: &[Event]) -> Option<u64> {
    events
        .iter()
        .filter(|ev| normalized_type(ev) == EVENT_TYPE_REQUESTED_WINNER)
        .find_map(|ev| attr(ev, ATTR_REQUEST_ID))
        .and_then(|value| value.parse().ok())
}

/// The participant of a `lottery_entered` event
pub fn entered_participant(event: &Event) -> Option<String> {
    if normalized_type(event) != EVENT_TYPE_ENTERED {
        return None;
    }
    attr(event, ATTR_PARTICIPANT).map(ToOwned::to_owned)
}

/// Typed view of a `winner_selected` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerSelected {
    pub winner: String,
    /// Coin string like `2000ucosm`
    pub prize: String,
    pub request_id: u64,
}

impl WinnerSelected {
    pub fn from_event(event: &Event) -> Option<Self> {
        if normalized_type(event) != EVENT_TYPE_WINNER_SELECTED {
            return None;
        }
        Some(Self {
            winner: attr(event, ATTR_WINNER)?.to_owned(),
            prize: attr(event, ATTR_PRIZE)?.to_owned(),
            request_id: attr(event, ATTR_REQUEST_ID)?.parse().ok()?,
        })
    }
}
