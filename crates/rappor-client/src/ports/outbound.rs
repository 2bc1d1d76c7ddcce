//! Outbound Ports (Driven Ports)
//!
//! The encoder never reaches for a global RNG: entropy arrives through
//! `EntropySource`, which lets tests inject a seeded CSPRNG and lets many
//! encoders share one source.

use crate::error::EntropyError;

/// Cryptographically secure byte source (Driven Port)
///
/// Implementations must be safe to call from many threads at once, either by
/// being stateless or by serializing each draw internally.
///
/// A failure is surfaced as `EntropyError`; implementations must never fall
/// back to a weaker generator.
pub trait EntropySource: Send + Sync {
    /// Fill `dest` entirely with secure random bytes
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError>;

    /// Uniform integer in `[0, bound)`.
    ///
    /// Rejection sampling over 32-bit words keeps every residue equally likely.
    /// `rand::Rng::gen_range` is not used because it panics on a failed draw
    /// instead of returning `EntropyError`.
    fn uniform_below(&self, bound: u32) -> Result<u32, EntropyError> {
        if bound <= 1 {
            return Ok(0);
        }
        // Largest multiple of `bound` representable in a u32 draw
        let zone = u32::MAX - (u32::MAX % bound + 1) % bound;
        loop {
            let mut word = [0u8; 4];
            self.fill_bytes(&mut word)?;
            let draw = u32::from_le_bytes(word);
            if draw <= zone {
                return Ok(draw % bound);
            }
        }
    }
}
