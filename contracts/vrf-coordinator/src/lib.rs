pub mod attributes;
pub mod contract;
pub mod error;
pub mod msg;
pub mod randomness;
pub mod state;
