//! Cohort-salted bloom mapping
//!
//! Positions come from one MD5 digest over `cohort (4 bytes, big-endian) || value`.
//! Byte `i` of the digest, reduced modulo `k_bloombits`, is hash function `i`.
//! No client secret is involved, so every client in a cohort maps a value to
//! the same positions.

use md5::{Digest, Md5};

use crate::error::ConfigError;

/// Bytes in the MD5 digest, i.e. the maximum number of hash functions
pub const BLOOM_DIGEST_BYTES: usize = 16;

/// Maps `(value, cohort)` to bloom filter bit positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CohortBloomMapper {
    h_hashes: usize,
    k_bloombits: usize,
}

impl CohortBloomMapper {
    /// Create a mapper for `h_hashes` positions in a `k_bloombits` filter
    pub fn new(h_hashes: usize, k_bloombits: usize) -> Result<Self, ConfigError> {
        if h_hashes == 0 {
            return Err(ConfigError::ZeroHashes);
        }
        if h_hashes > BLOOM_DIGEST_BYTES {
            return Err(ConfigError::TooManyHashes {
                h_hashes,
                max: BLOOM_DIGEST_BYTES,
            });
        }
        if k_bloombits == 0 {
            return Err(ConfigError::ZeroBloomBits);
        }
        // Positions are packed into a u32 filter
        if k_bloombits > 32 {
            return Err(ConfigError::BloomTooWide {
                k_bloombits,
                max: 32,
            });
        }
        Ok(Self {
            h_hashes,
            k_bloombits,
        })
    }

    /// Compute the `h_hashes` positions for a value.
    ///
    /// Positions may repeat; the order follows the digest bytes.
    pub fn positions(&self, value: &[u8], cohort: u32) -> Vec<usize> {
        let digest = cohort_digest(value, cohort);
        digest[..self.h_hashes]
            .iter()
            .map(|&byte| byte as usize % self.k_bloombits)
            .collect()
    }

    /// Bloom filter with one bit set per position.
    ///
    /// Colliding positions set the same bit once.
    pub fn bloom_bits(&self, value: &[u8], cohort: u32) -> u32 {
        self.positions(value, cohort)
            .into_iter()
            .fold(0u32, |bloom, pos| bloom | (1u32 << pos))
    }
}

fn cohort_digest(value: &[u8], cohort: u32) -> [u8; BLOOM_DIGEST_BYTES] {
    let mut hasher = Md5::new();
    hasher.update(cohort.to_be_bytes());
    hasher.update(value);

    let mut digest = [0u8; BLOOM_DIGEST_BYTES];
    digest.copy_from_slice(&hasher.finalize());
    digest
}
