//! Instantaneous randomized response (IRR)
//!
//! `irr = (p_gen & !prr) | (q_gen & prr)`
//!
//! Where the PRR bit is 0 the reported bit is 1 with probability `p`; where
//! it is 1, with probability `q`. The IRR is the value put on the wire.

use super::parameters::ParameterSet;
use super::sampler::SecureBitSampler;
use crate::error::RapporError;
use crate::ports::EntropySource;

/// A pair of `k`-bit masks drawn with `p_prob` and `q_prob`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionMasks {
    pub p_gen: u32,
    pub q_gen: u32,
}

impl SessionMasks {
    /// Draw a fresh pair for `params`
    pub fn sample<E: EntropySource + ?Sized>(
        params: &ParameterSet,
        entropy: &E,
    ) -> Result<Self, RapporError> {
        let p_gen = SecureBitSampler::new(params.k_bloombits(), params.p_prob())?.sample(entropy)?;
        let q_gen = SecureBitSampler::new(params.k_bloombits(), params.q_prob())?.sample(entropy)?;
        Ok(Self { p_gen, q_gen })
    }

    /// Apply this pair to a PRR
    pub fn apply(&self, prr_bits: u32) -> u32 {
        compute_irr(prr_bits, self.p_gen, self.q_gen)
    }
}

/// Combine a PRR with the two masks
pub fn compute_irr(prr_bits: u32, p_gen: u32, q_gen: u32) -> u32 {
    (p_gen & !prr_bits) | (q_gen & prr_bits)
}
