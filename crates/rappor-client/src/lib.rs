//! # RAPPOR Client
//!
//! Client-side encoder for RAPPOR (Randomized Aggregatable Privacy-Preserving
//! Ordinal Response). One client turns one private categorical value into one
//! noised `k`-bit report.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure encoding logic, no I/O
//!   - `ParameterSet`: Validated parameters and their JSON interchange record
//!   - `CohortBloomMapper`: `md5(cohort_be32 || value)` -> bloom positions
//!   - `PrrGenerator`: `hmac_sha256(secret, value)` -> permanent response
//!   - `SessionMasks` / `compute_irr`: instantaneous response
//!   - `SecureBitSampler`: Bernoulli masks at three-digit precision
//!   - `bitstring`: MSB-first rendering of reports
//!
//! - **Ports Layer** (`ports/`): `EntropySource` driven port
//!
//! - **Adapters Layer** (`adapters/`): `OsEntropy`, `SeededEntropy`,
//!   `UnavailableEntropy`
//!
//! - **Service Layer** (`service/`): `Encoder`, the per-client pipeline
//!
//! ## Invariants
//!
//! - `h_hashes <= 16` and `k_bloombits <= 32`; violations are a
//!   `ConfigError`, never a truncation
//! - The PRR for a given `(secret, value)` never changes
//! - Every report lies in `[0, 2^k_bloombits)`
//! - Entropy failures surface as `EntropyError`; no weaker fallback
//!
//! ## Usage Example
//!
//! ```
//! use rappor_client::{Encoder, ParameterSet};
//!
//! let params = ParameterSet::default(); // k=16, h=2, m=64, p=0.5, q=0.75, f=0.5
//! let encoder = Encoder::new(params, 3, "client-secret")?;
//!
//! let report = encoder.encode("foo")?;
//! assert!(report < 1 << 16);
//! # Ok::<(), rappor_client::RapporError>(())
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{OsEntropy, SeededEntropy, UnavailableEntropy};
pub use domain::{
    compute_irr, format_bits, parse_bits, sample_bits, CohortBloomMapper, ParameterRecord,
    ParameterSet, ParameterSetBuilder, PrrGenerator, PrrMasks, SecureBitSampler, SessionMasks,
};
pub use error::{BitStringError, ConfigError, EntropyError, RapporError};
pub use metrics::{EncoderMetrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::EntropySource;
pub use service::{ClientSecret, EncodeTrace, Encoder, SessionPolicy};
