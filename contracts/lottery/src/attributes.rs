//! Stable event attributes
//!
//! The attributes here should only be changed very carefully as it is likely that clients rely on them.

/// Which entry point/message type was executed
pub const ATTR_ACTION: &str = "action";

/// Emitted when someone entered the lottery
pub const EVENT_TYPE_ENTERED: &str = "lottery_entered";
pub const ATTR_PARTICIPANT: &str = "participant";

/// Emitted when randomness for the draw was requested
pub const EVENT_TYPE_REQUESTED_WINNER: &str = "requested_lottery_winner";
pub const ATTR_REQUEST_ID: &str = "request_id";

/// Emitted when the winner was picked and paid
pub const EVENT_TYPE_WINNER_SELECTED: &str = "winner_selected";
pub const ATTR_WINNER: &str = "winner";
pub const ATTR_PRIZE: &str = "prize";
