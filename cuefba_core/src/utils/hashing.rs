//! Utility functions for deriving stable suffixes from ids
use std::hash::{DefaultHasher, Hash, Hasher};

pub(crate) fn calculate_hash<T: Hash + ?Sized>(t: &T) -> u64 {
    let mut s = DefaultHasher::new();
    t.hash(&mut s);
    s.finish()
}

/// First five hex digits of the hash of `t`, used to make reverse variable ids unique
pub(crate) fn short_hex_hash<T: Hash + ?Sized>(t: &T) -> String {
    let mut hex = format!("{:016x}", calculate_hash(t));
    hex.truncate(5);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_is_stable() {
        assert_eq!(short_hex_hash("PFK"), short_hex_hash("PFK"));
        assert_eq!(short_hex_hash("PFK").len(), 5);
        assert_ne!(short_hex_hash("PFK"), short_hex_hash("PGK"));
    }
}
