use std::fmt;

use cosmwasm_std::{Binary, Event};
use lottery::msg::CheckUpkeepResponse;

use crate::events::requested_winner_request_id;

/// A lottery the keeper can talk to, e.g. a contract in a test chain or a live chain client.
pub trait UpkeepTarget {
    type Error: fmt::Display;

    /// Runs the read-only upkeep check
    fn check_upkeep(&mut self, check_data: &Binary) -> Result<CheckUpkeepResponse, Self::Error>;

    /// Executes `PerformUpkeep` and returns the events of the transaction
    fn perform_upkeep(&mut self, perform_data: Binary) -> Result<Vec<Event>, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStage {
    Check,
    Perform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The lottery does not need a draw right now
    NotNeeded,
    /// A draw was started
    Performed {
        /// Randomness request ID if the lottery reported one
        request_id: Option<u64>,
    },
    /// Talking to the lottery failed. Retried on the next poll.
    Failed { stage: PollStage, error: String },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeeperStats {
    pub polls: u64,
    pub performed: u64,
    pub failures: u64,
}

/// Checks the lottery on every poll and starts a draw when needed.
///
/// The keeper is not trusted by the contract. The contract repeats the check
/// when the upkeep is performed, so a stale check at worst leads to a failed
/// perform (e.g. when a different keeper was faster).
#[derive(Debug, Default, Clone)]
pub struct Keeper {
    check_data: Binary,
    stats: KeeperStats,
}

impl Keeper {
    pub fn new(check_data: Binary) -> Self {
        Self {
            check_data,
            stats: KeeperStats::default(),
        }
    }

    pub fn stats(&self) -> KeeperStats {
        self.stats
    }

    pub fn poll<T: UpkeepTarget>(&mut self, target: &mut T) -> PollOutcome {
        self.stats.polls += 1;

        let check = match target.check_upkeep(&self.check_data) {
            Ok(check) => check,
            Err(err) => return self.failed(PollStage::Check, err),
        };
        if !check.upkeep_needed {
            return PollOutcome::NotNeeded;
        }

        match target.perform_upkeep(check.perform_data) {
            Ok(events) => {
                self.stats.performed += 1;
                PollOutcome::Performed {
                    request_id: requested_winner_request_id(&events),
                }
            }
            Err(err) => self.failed(PollStage::Perform, err),
        }
    }

    /// Polls up to `max_polls` times until a draw was started.
    /// `between_polls` is called after every poll that did not start a draw,
    /// which is where time passes.
    pub fn run_until_performed<T: UpkeepTarget>(
        &mut self,
        target: &mut T,
        max_polls: usize,
        mut between_polls: impl FnMut(&mut T),
    ) -> Option<PollOutcome> {
        for _ in 0..max_polls {
            let outcome = self.poll(target);
            if matches!(outcome, PollOutcome::Performed { .. }) {
                return Some(outcome);
            }
            between_polls(target);
        }
        None
    }

    fn failed(&mut self, stage: PollStage, err: impl fmt::Display) -> PollOutcome {
        self.stats.failures += 1;
        PollOutcome::Failed {
            stage,
            error: err.to_string(),
        }
    }
}
