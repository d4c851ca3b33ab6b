use cosmwasm_std::{Addr, Uint256};
use sha2::{Digest, Sha256};

/// Derives `num_words` pseudo-random words for a request.
///
/// This is deterministic on purpose: the same request always produces the same words,
/// which keeps tests reproducible. It is not a verifiable randomness source.
pub fn derive_random_words(request_id: u64, consumer: &Addr, num_words: u32) -> Vec<Uint256> {
    let mut hasher = Sha256::new();
    hasher.update(request_id.to_be_bytes());
    hasher.update(consumer.as_bytes());
    let seed: [u8; 32] = hasher.finalize().into();

    nois::sub_randomness(seed)
        .take(num_words as usize)
        .map(Uint256::from_be_bytes)
        .collect()
}
