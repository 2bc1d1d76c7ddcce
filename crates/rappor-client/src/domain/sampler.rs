//! Secure Bernoulli bit sampling
//!
//! Each bit is an independent draw from `[0, 1000)` compared against
//! `floor(prob_one * 1000)`, so probabilities resolve to three decimal
//! digits. Bit `i` of the result is draw `i`.

use crate::error::{ConfigError, EntropyError, RapporError};
use crate::ports::EntropySource;

/// Widest mask the sampler produces
pub const MAX_SAMPLE_BITS: usize = 32;

const RESOLUTION: u32 = 1000;

/// Draws n-bit masks whose bits are 1 with a fixed probability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecureBitSampler {
    n_bits: usize,
    threshold: u32,
}

impl SecureBitSampler {
    /// Create a sampler for `n_bits`-wide masks with `P(bit = 1) = prob_one`
    pub fn new(n_bits: usize, prob_one: f64) -> Result<Self, ConfigError> {
        if n_bits > MAX_SAMPLE_BITS {
            return Err(ConfigError::SampleTooWide {
                n_bits,
                max: MAX_SAMPLE_BITS,
            });
        }
        if !prob_one.is_finite() || !(0.0..=1.0).contains(&prob_one) {
            return Err(ConfigError::InvalidProbability {
                name: "prob_one",
                value: prob_one,
            });
        }
        Ok(Self {
            n_bits,
            // Truncation is the documented precision
            threshold: (prob_one * RESOLUTION as f64) as u32,
        })
    }

    /// Draw threshold out of 1000
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Draw one mask; one entropy request per bit
    pub fn sample<E: EntropySource + ?Sized>(&self, entropy: &E) -> Result<u32, EntropyError> {
        let mut mask = 0u32;
        for i in 0..self.n_bits {
            if entropy.uniform_below(RESOLUTION)? < self.threshold {
                mask |= 1u32 << i;
            }
        }
        Ok(mask)
    }
}

/// One-shot form of `SecureBitSampler::new(n_bits, prob_one)?.sample(entropy)`
pub fn sample_bits<E: EntropySource + ?Sized>(
    entropy: &E,
    n_bits: usize,
    prob_one: f64,
) -> Result<u32, RapporError> {
    Ok(SecureBitSampler::new(n_bits, prob_one)?.sample(entropy)?)
}
