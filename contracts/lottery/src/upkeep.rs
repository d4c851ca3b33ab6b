use cosmwasm_std::{Deps, Env, StdResult, Timestamp, Uint128};

use crate::state::{participants_len, Config, LotteryState, LAST_TIMESTAMP, LOTTERY_STATE};

/// The inputs of the upkeep decision at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpkeepStatus {
    pub state: LotteryState,
    /// Seconds since the current round started
    pub elapsed: u64,
    pub participants: u32,
    /// Contract balance in the entry fee denom
    pub balance: Uint128,
}

impl UpkeepStatus {
    pub fn load(deps: Deps, env: &Env, config: &Config) -> StdResult<Self> {
        let state = LOTTERY_STATE.load(deps.storage)?;
        let last_timestamp = LAST_TIMESTAMP.load(deps.storage)?;
        let participants = participants_len(deps.storage)?;
        let balance = deps
            .querier
            .query_balance(
                env.contract.address.as_str(),
                &config.minimum_entry_fee.denom,
            )?
            .amount;
        Ok(Self {
            state,
            elapsed: seconds_between(last_timestamp, env.block.time),
            participants,
            balance,
        })
    }

    /// True if a draw should be started
    pub fn upkeep_needed(&self, interval: u64) -> bool {
        self.state == LotteryState::Open
            && self.elapsed >= interval
            && self.participants > 0
            && !self.balance.is_zero()
    }
}

fn seconds_between(from: Timestamp, to: Timestamp) -> u64 {
    to.seconds().saturating_sub(from.seconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> UpkeepStatus {
        UpkeepStatus {
            state: LotteryState::Open,
            elapsed: 10,
            participants: 1,
            balance: Uint128::new(1000),
        }
    }

    #[test]
    fn upkeep_needed_requires_all_conditions() {
        assert!(ready().upkeep_needed(10));
        assert!(ready().upkeep_needed(9));
        assert!(!ready().upkeep_needed(11));

        let calculating = UpkeepStatus {
            state: LotteryState::Calculating,
            ..ready()
        };
        assert!(!calculating.upkeep_needed(10));

        let empty = UpkeepStatus {
            participants: 0,
            ..ready()
        };
        assert!(!empty.upkeep_needed(10));

        let broke = UpkeepStatus {
            balance: Uint128::zero(),
            ..ready()
        };
        assert!(!broke.upkeep_needed(10));

        let early = UpkeepStatus {
            elapsed: 0,
            ..ready()
        };
        assert!(!early.upkeep_needed(10));
        assert!(early.upkeep_needed(0));
    }

    #[test]
    fn seconds_between_works() {
        let a = Timestamp::from_seconds(100);
        assert_eq!(seconds_between(a, a), 0);
        assert_eq!(seconds_between(a, a.plus_seconds(5)), 5);
        assert_eq!(seconds_between(a, a.plus_nanos(999_999_999)), 0);
        // clock going backwards is not elapsed time
        assert_eq!(seconds_between(a.plus_seconds(5), a), 0);
    }
}
