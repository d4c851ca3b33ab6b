use cosmwasm_std::Uint256;

/// Maps a random word to an index in `0..participants`.
///
/// Panics if `participants` is 0.
pub fn winner_index(random_word: Uint256, participants: u32) -> u32 {
    let index = random_word % Uint256::from(participants);
    // index < participants, so only the lowest 4 bytes can be non-zero
    let bytes = index.to_be_bytes();
    u32::from_be_bytes([bytes[28], bytes[29], bytes[30], bytes[31]])
}
