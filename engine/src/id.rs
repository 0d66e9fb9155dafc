//! Client-side identifier generation.
//!
//! Ids look like `1706745600000-k3x9qa`: the creation timestamp followed by a
//! short random base36 suffix. Collisions are practically impossible on one
//! device; nothing here tries to be unique across devices.

use crate::{Timestamp, TodoId};
use rand::Rng;

const SUFFIX_LEN: usize = 6;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh id for a record created at `now`.
pub fn generate_id(now: Timestamp) -> TodoId {
    generate_id_with(&mut rand::thread_rng(), now)
}

/// Generate an id drawing the suffix from `rng`.
pub fn generate_id_with<R: Rng + ?Sized>(rng: &mut R, now: Timestamp) -> TodoId {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{now}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn id_format() {
        let id = generate_id(1_706_745_600_000);
        let (millis, suffix) = id.split_once('-').unwrap();

        assert_eq!(millis, "1706745600000");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = generate_id_with(&mut StdRng::seed_from_u64(7), 1000);
        let b = generate_id_with(&mut StdRng::seed_from_u64(7), 1000);
        assert_eq!(a, b);
    }

    #[test]
    fn same_millisecond_ids_differ() {
        let ids: HashSet<_> = (0..200).map(|_| generate_id(1000)).collect();
        assert_eq!(ids.len(), 200);
    }
}
