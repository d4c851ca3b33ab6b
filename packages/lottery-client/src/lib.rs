//! Off-chain actors around the lottery contract: the keeper that triggers
//! draws and an event bus for clients that react to lottery events.

mod events;
mod keeper;
mod listener;

pub use events::{entered_participant, requested_winner_request_id, WinnerSelected};
pub use keeper::{Keeper, KeeperStats, PollOutcome, PollStage, UpkeepTarget};
pub use listener::{EventBus, SubscriptionId};
