//! # Stable Hashing
//!
//! Fixed, platform-independent hashes used to route out-of-vocabulary words
//! to buckets, and to derive per-example seeds.
//!
//! The values of these functions are part of the data format: OOV bucket
//! assignment and secret insertion decisions depend on them.

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash a byte slice with 64-bit FNV-1a.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
        (h ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

/// Map a byte slice to one of `num_buckets` buckets.
///
/// ## Panics
/// Panics if `num_buckets` is zero.
pub fn hash_bucket(
    bytes: &[u8],
    num_buckets: usize,
) -> usize {
    assert!(num_buckets > 0, "num_buckets must be positive");
    (fnv1a_64(bytes) % num_buckets as u64) as usize
}

/// Map a byte slice to a 32-bit seed; `fnv1a_64(bytes) mod 2^32`.
pub fn hash_seed32(bytes: &[u8]) -> u32 {
    fnv1a_64(bytes) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a_64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a_64(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_hash_bucket_range() {
        for word in ["", "z", "unknown", "stackoverflow"] {
            assert_eq!(hash_bucket(word.as_bytes(), 1), 0);
            assert!(hash_bucket(word.as_bytes(), 7) < 7);
        }
    }

    #[test]
    fn test_hash_seed32_truncates() {
        assert_eq!(hash_seed32(b"a"), 0x8601_ec8c);
    }
}
