//! Deterministic hashing used across the crate: web-candidate ids and
//! mock-embedding seeds (§3, §4.2).

/// Derives a deterministic candidate id for a web search result, in the
/// `web:<hex>` form the coordinator and citation rendering rely on to tell
/// web-sourced candidates apart from stored chunks.
#[inline]
pub fn web_source_id(url: &str) -> String {
    format!("web:{}", blake3::hash(url.as_bytes()).to_hex())
}

/// Derives a deterministic seed for the mock embedding generator from a
/// piece of text. Two calls with the same text always produce the same
/// seed, which is what makes the mock embedding client's output stable
/// across a process's cache and test runs.
#[inline]
pub fn embedding_seed(text: &str) -> u64 {
    let hash = blake3::hash(text.as_bytes());
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn web_source_id_format_and_determinism() {
        let id1 = web_source_id("https://example.com/a");
        let id2 = web_source_id("https://example.com/a");
        let id3 = web_source_id("https://example.com/b");

        assert!(id1.starts_with("web:"));
        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn embedding_seed_determinism() {
        assert_eq!(embedding_seed("same text"), embedding_seed("same text"));
        assert_ne!(embedding_seed("same text"), embedding_seed("other text"));
    }

    #[test]
    fn embedding_seed_distinct_for_near_duplicate_inputs() {
        let seeds: HashSet<u64> = ["a", "A", "a ", " a"].iter().map(|s| embedding_seed(s)).collect();
        assert_eq!(seeds.len(), 4);
    }
}
