//! Key hashing for ring placement.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Maps a string key to a position on the ring.
///
/// Implementations must be deterministic across calls and processes so that
/// rings built independently from the same node set agree on ownership.
/// Positions never have the top bit set.
pub trait KeyHasher: Send + Sync + 'static {
    /// Hash a key to a ring position.
    fn hash(&self, key: &str) -> u64;

    /// Returns the name of this hasher.
    fn name(&self) -> &'static str;
}

/// First eight bytes of a SHA-256 digest, big-endian, sign bit cleared.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl KeyHasher for Sha256Hasher {
    fn hash(&self, key: &str) -> u64 {
        let digest = Sha256::digest(key.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix) & i64::MAX as u64
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

/// Byte-at-a-time multiply/rotate mix using the Murmur3 x64 constants.
///
/// Much cheaper than a digest, with weaker dispersion on short keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Murmur64Hasher;

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

impl KeyHasher for Murmur64Hasher {
    fn hash(&self, key: &str) -> u64 {
        let mut h: u64 = 0;
        for &b in key.as_bytes() {
            // Bytes are mixed in sign-extended.
            h ^= b as i8 as i64 as u64;
            h = h.wrapping_mul(C1);
            h = h.rotate_left(31);
            h = h.wrapping_mul(C2);
        }
        h & i64::MAX as u64
    }

    fn name(&self) -> &'static str {
        "murmur64"
    }
}

/// Hasher selected by name, for rings built from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    #[default]
    Sha256,
    Murmur64,
}

impl KeyHasher for HasherKind {
    fn hash(&self, key: &str) -> u64 {
        match self {
            HasherKind::Sha256 => Sha256Hasher.hash(key),
            HasherKind::Murmur64 => Murmur64Hasher.hash(key),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            HasherKind::Sha256 => Sha256Hasher.name(),
            HasherKind::Murmur64 => Murmur64Hasher.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_is_deterministic() {
        let hasher = Sha256Hasher;
        assert_eq!(hasher.hash("NodeA#0"), hasher.hash("NodeA#0"));
        assert_ne!(hasher.hash("NodeA#0"), hasher.hash("NodeA#1"));
    }

    #[test]
    fn test_sha256_known_prefix() {
        // sha256("") = e3b0c44298fc1c14...
        assert_eq!(Sha256Hasher.hash(""), 0xe3b0_c442_98fc_1c14 & i64::MAX as u64);
    }

    #[test]
    fn test_top_bit_always_clear() {
        for i in 0..1_000 {
            let key = format!("user:{i}");
            assert_eq!(Sha256Hasher.hash(&key) >> 63, 0);
            assert_eq!(Murmur64Hasher.hash(&key) >> 63, 0);
        }
    }

    #[test]
    fn test_murmur_empty_key_is_zero() {
        assert_eq!(Murmur64Hasher.hash(""), 0);
    }

    fn mix(h: u64, v: u64) -> u64 {
        (h ^ v).wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
    }

    #[test]
    fn test_murmur_ascii_matches_manual_mix() {
        let expected = mix(mix(0, b'a' as u64), b'b' as u64) & i64::MAX as u64;
        assert_eq!(Murmur64Hasher.hash("ab"), expected);
    }

    #[test]
    fn test_murmur_sign_extends_high_bytes() {
        // "é" is 0xC3 0xA9 in UTF-8.
        let signed = mix(mix(0, 0xFFFF_FFFF_FFFF_FFC3), 0xFFFF_FFFF_FFFF_FFA9) & i64::MAX as u64;
        let unsigned = mix(mix(0, 0xC3), 0xA9) & i64::MAX as u64;
        assert_eq!(Murmur64Hasher.hash("é"), signed);
        assert_ne!(signed, unsigned);
    }

    #[test]
    fn test_hasher_names() {
        assert_eq!(Sha256Hasher.name(), "sha256");
        assert_eq!(Murmur64Hasher.name(), "murmur64");
        assert_eq!(HasherKind::default().name(), "sha256");
    }

    #[test]
    fn test_hasher_kind_dispatch() {
        assert_eq!(HasherKind::Sha256.hash("k"), Sha256Hasher.hash("k"));
        assert_eq!(HasherKind::Murmur64.hash("k"), Murmur64Hasher.hash("k"));
    }
}
