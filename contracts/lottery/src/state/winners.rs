use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, StdResult, Storage, Timestamp};
use cw_storage_plus::Deque;

use super::TopKey;

#[cw_serde]
pub struct Winner {
    pub address: Addr,
    /// The pot paid out to the winner
    pub prize: Coin,
    /// The randomness request that picked this winner
    pub request_id: u64,
    /// Block time of the draw
    pub time: Timestamp,
}

/// Append-only list of all winners, oldest first
const WINNERS: Deque<Winner> = Deque::new(TopKey::Winners.as_str());

pub fn winners_add(storage: &mut dyn Storage, winner: &Winner) -> StdResult<()> {
    WINNERS.push_back(storage, winner)
}

pub fn winners_len(storage: &dyn Storage) -> StdResult<u32> {
    WINNERS.len(storage)
}

pub fn recent_winner(storage: &dyn Storage) -> StdResult<Option<Winner>> {
    WINNERS.back(storage)
}

pub fn winners_asc(storage: &dyn Storage, offset: usize, limit: usize) -> StdResult<Vec<Winner>> {
    WINNERS.iter(storage)?.skip(offset).take(limit).collect()
}

pub fn winners_desc(storage: &dyn Storage, offset: usize, limit: usize) -> StdResult<Vec<Winner>> {
    WINNERS.iter(storage)?.rev().skip(offset).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::{coin, testing::MockStorage};

    fn make_winner(n: u64) -> Winner {
        Winner {
            address: Addr::unchecked(format!("winner{n}")),
            prize: coin(n.into(), "ucosm"),
            request_id: n,
            time: Timestamp::from_seconds(n),
        }
    }

    #[test]
    fn winners_work() {
        let mut storage = MockStorage::new();
        assert_eq!(winners_len(&storage).unwrap(), 0);
        assert_eq!(recent_winner(&storage).unwrap(), None);

        for n in 1..=5 {
            winners_add(&mut storage, &make_winner(n)).unwrap();
        }
        assert_eq!(winners_len(&storage).unwrap(), 5);
        assert_eq!(recent_winner(&storage).unwrap(), Some(make_winner(5)));

        let asc = winners_asc(&storage, 0, 2).unwrap();
        assert_eq!(asc, vec![make_winner(1), make_winner(2)]);
        let asc = winners_asc(&storage, 3, 10).unwrap();
        assert_eq!(asc, vec![make_winner(4), make_winner(5)]);

        let desc = winners_desc(&storage, 0, 2).unwrap();
        assert_eq!(desc, vec![make_winner(5), make_winner(4)]);
        let desc = winners_desc(&storage, 4, 2).unwrap();
        assert_eq!(desc, vec![make_winner(1)]);
        let desc = winners_desc(&storage, 5, 2).unwrap();
        assert_eq!(desc, vec![]);
    }
}
