use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdResult, Storage};
use cw_storage_plus::{Bound, Item, Map};

use super::TopKey;

/// The round entries are currently collected for
#[cw_serde]
#[derive(Default)]
struct Round {
    id: u32,
    entries: u32,
}

const ROUND: Item<Round> = Item::new(TopKey::Round.as_str());

/// One element per entry, keyed by (round, position). The same address can show up
/// multiple times in a round.
const PARTICIPANTS: Map<(u32, u32), Addr> = Map::new(TopKey::Participants.as_str());

fn current_round(storage: &dyn Storage) -> StdResult<Round> {
    Ok(ROUND.may_load(storage)?.unwrap_or_default())
}

pub fn participants_push(storage: &mut dyn Storage, participant: &Addr) -> StdResult<()> {
    let mut round = current_round(storage)?;
    PARTICIPANTS.save(storage, (round.id, round.entries), participant)?;
    round.entries += 1;
    ROUND.save(storage, &round)
}

pub fn participants_len(storage: &dyn Storage) -> StdResult<u32> {
    Ok(current_round(storage)?.entries)
}

pub fn participant_at(storage: &dyn Storage, index: u32) -> StdResult<Option<Addr>> {
    let round = current_round(storage)?;
    if index >= round.entries {
        return Ok(None);
    }
    PARTICIPANTS.may_load(storage, (round.id, index))
}

/// Entries of the current round in order of entering, starting at position `offset`
pub fn participants_range(
    storage: &dyn Storage,
    offset: u32,
    limit: usize,
) -> StdResult<Vec<Addr>> {
    let round = current_round(storage)?;
    PARTICIPANTS
        .prefix(round.id)
        .range(storage, Some(Bound::inclusive(offset)), None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, participant)| participant))
        .collect()
}

/// Starts a new round with no entries. Constant cost regardless of the number of entries,
/// entries of earlier rounds stay in storage and are never read again.
pub fn participants_clear(storage: &mut dyn Storage) -> StdResult<()> {
    let round = current_round(storage)?;
    ROUND.save(
        storage,
        &Round {
            id: round.id.wrapping_add(1),
            entries: 0,
        },
    )
}
