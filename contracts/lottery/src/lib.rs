pub mod attributes;
pub mod contract;
pub mod draw;
pub mod error;
pub mod msg;
pub mod state;
pub mod upkeep;
