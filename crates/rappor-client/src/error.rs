//! Error types for the RAPPOR client

use thiserror::Error;

/// Static misconfiguration. Fix the parameters and reconstruct.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Too many hash functions: {h_hashes} > {max} digest bytes")]
    TooManyHashes { h_hashes: usize, max: usize },

    #[error("Bloom filter too wide: {k_bloombits} bits > {max} digest bytes")]
    BloomTooWide { k_bloombits: usize, max: usize },

    #[error("k_bloombits cannot be 0")]
    ZeroBloomBits,

    #[error("h_hashes cannot be 0")]
    ZeroHashes,

    #[error("m_cohorts cannot be 0")]
    ZeroCohorts,

    #[error("Invalid probability {name}={value} (must be finite and within [0, 1])")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Cohort {cohort} outside [0, {m_cohorts})")]
    CohortOutOfRange { cohort: u32, m_cohorts: u32 },

    #[error("Bits {bits:#x} do not fit in a {k_bloombits}-bit report")]
    BitsOutOfRange { bits: u32, k_bloombits: usize },

    #[error("Sample width {n_bits} exceeds {max} bits")]
    SampleTooWide { n_bits: usize, max: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// The secure random source could not produce bytes.
///
/// Not retried: it means the host cannot supply entropy at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Secure entropy source unavailable: {0}")]
pub struct EntropyError(pub String);

impl From<rand::Error> for EntropyError {
    fn from(err: rand::Error) -> Self {
        Self(err.to_string())
    }
}

/// Errors from rendering or parsing a report as a bit string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitStringError {
    #[error("Width {width} exceeds {max} bits")]
    WidthTooLarge { width: usize, max: usize },

    #[error("Value {value} does not fit in {width} bits")]
    ValueOutOfRange { value: u32, width: usize },

    #[error("Expected {expected} digits, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid digit {digit:?} at position {position}")]
    InvalidDigit { digit: char, position: usize },
}

/// Top-level error returned by encoder construction and encoding
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RapporError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Entropy(#[from] EntropyError),
}
