//! Adapters Layer (Driven Adapters)
//!
//! Implementations of `EntropySource`:
//!
//! - `OsEntropy` - operating system CSPRNG, the production source
//! - `SeededEntropy` - seeded ChaCha CSPRNG for reproducible runs
//! - `UnavailableEntropy` - always fails, for exercising error paths

pub mod entropy;

pub use entropy::{OsEntropy, SeededEntropy, UnavailableEntropy};
