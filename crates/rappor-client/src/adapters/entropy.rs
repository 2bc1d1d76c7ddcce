//! Entropy Source Adapters

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use std::sync::Mutex;

use crate::error::EntropyError;
use crate::ports::EntropySource;

/// Production entropy from the operating system.
///
/// Stateless; safe to share between any number of encoders and threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl OsEntropy {
    pub fn new() -> Self {
        Self
    }
}

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.try_fill_bytes(dest).map_err(EntropyError::from)
    }
}

/// Seeded CSPRNG for deterministic tests and benchmarks.
///
/// Draws are serialized through a mutex, so a shared instance hands out one
/// reproducible stream regardless of which thread asks.
///
/// # Example
///
/// ```
/// use rappor_client::{EntropySource, SeededEntropy};
///
/// let a = SeededEntropy::from_seed(7);
/// let b = SeededEntropy::from_seed(7);
/// assert_eq!(a.uniform_below(1000).unwrap(), b.uniform_below(1000).unwrap());
/// ```
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    /// Create a source whose stream is fully determined by `seed`
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| EntropyError("seeded generator lock poisoned".to_string()))?;
        rng.try_fill_bytes(dest).map_err(EntropyError::from)
    }
}

/// Source that always fails.
///
/// Stands in for a host without usable entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEntropy;

impl EntropySource for UnavailableEntropy {
    fn fill_bytes(&self, _dest: &mut [u8]) -> Result<(), EntropyError> {
        Err(EntropyError("no entropy available".to_string()))
    }
}
