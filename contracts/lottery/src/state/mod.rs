mod config;
mod participants;
mod round;
mod winners;

pub use config::{Config, CONFIG};
pub use participants::{
    participant_at, participants_clear, participants_len, participants_push, participants_range,
};
pub use round::{LotteryState, PendingRequest, LAST_TIMESTAMP, LOTTERY_STATE, PENDING_REQUEST};
pub use winners::{recent_winner, winners_add, winners_asc, winners_desc, winners_len, Winner};

/// Top level storage key. Values must not conflict.
/// Each key is only one byte long to ensure we use the smallest possible storage keys.
#[repr(u8)]
pub enum TopKey {
    Config = b'c',
    LotteryState = b's',
    LastTimestamp = b't',
    PendingRequest = b'r',
    Participants = b'p',
    Round = b'n',
    Winners = b'w',
}

impl TopKey {
    const fn as_str(&self) -> &str {
        let array_ref = unsafe { std::mem::transmute::<_, &[u8; 1]>(self) };
        match core::str::from_utf8(array_ref) {
            Ok(a) => a,
            Err(_) => panic!("Non-utf8 enum value found. Use a-z, A-Z and 0-9"),
        }
    }
}
