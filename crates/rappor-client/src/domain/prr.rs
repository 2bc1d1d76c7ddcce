//! Permanent randomized response (PRR)
//!
//! The PRR masks come from `HMAC-SHA256(secret, value)`. For bit `i`, digest
//! byte `i` supplies:
//! - low bit: the uniform coin `u_i`
//! - upper 7 bits: an integer in `[0, 128)`; `n_i = 1` iff it is below `f * 128`
//!
//! `prr = (bloom & !noise) | (uniform & noise)`
//!
//! The masks depend only on `(secret, value)`, so a client reporting the same
//! value always produces the same PRR.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::ConfigError;

type HmacSha256 = Hmac<Sha256>;

/// Bytes in the HMAC-SHA256 digest, i.e. the maximum filter width
pub const PRR_DIGEST_BYTES: usize = 32;

/// Per-(secret, value) masks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrrMasks {
    /// Fair-coin bits used where noise is applied
    pub uniform: u32,
    /// Bits where the bloom bit is replaced by the uniform bit
    pub noise: u32,
}

impl PrrMasks {
    /// Apply the masks to a bloom filter
    pub fn apply(&self, bloom_bits: u32) -> u32 {
        (bloom_bits & !self.noise) | (self.uniform & self.noise)
    }
}

/// Derives PRR bits from a client secret.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrrGenerator {
    f_prob: f64,
    k_bloombits: usize,
}

impl PrrGenerator {
    pub fn new(f_prob: f64, k_bloombits: usize) -> Result<Self, ConfigError> {
        if k_bloombits == 0 {
            return Err(ConfigError::ZeroBloomBits);
        }
        if k_bloombits > PRR_DIGEST_BYTES {
            return Err(ConfigError::BloomTooWide {
                k_bloombits,
                max: PRR_DIGEST_BYTES,
            });
        }
        if !f_prob.is_finite() || !(0.0..=1.0).contains(&f_prob) {
            return Err(ConfigError::InvalidProbability {
                name: "f_prob",
                value: f_prob,
            });
        }
        Ok(Self {
            f_prob,
            k_bloombits,
        })
    }

    /// Derive the uniform and noise masks for `value` under `secret`
    pub fn masks(&self, secret: &[u8], value: &[u8]) -> PrrMasks {
        let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
        mac.update(value);
        let digest = mac.finalize().into_bytes();

        let threshold = self.f_prob * 128.0;
        let mut uniform = 0u32;
        let mut noise = 0u32;

        for (i, &byte) in digest.iter().take(self.k_bloombits).enumerate() {
            uniform |= ((byte & 0x01) as u32) << i;

            let rand128 = byte >> 1;
            if (rand128 as f64) < threshold {
                noise |= 1u32 << i;
            }
        }

        PrrMasks { uniform, noise }
    }

    /// Compute the PRR for `bloom_bits`
    pub fn compute(&self, secret: &[u8], value: &[u8], bloom_bits: u32) -> u32 {
        self.masks(secret, value).apply(bloom_bits)
    }
}
