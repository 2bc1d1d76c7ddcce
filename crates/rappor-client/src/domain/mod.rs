//! Domain Layer - Pure encoding logic
//!
//! This layer contains:
//! - Parameter validation and the interchange record
//! - Cohort-salted bloom mapping
//! - Permanent randomized response (keyed, deterministic)
//! - Instantaneous randomized response (fresh masks)
//! - Secure bit sampling against an injected entropy port
//! - Bit-string rendering
//!
//! RULES:
//! - No I/O operations
//! - No global state; randomness only through `EntropySource`

pub mod bitstring;
pub mod hash_functions;
pub mod irr;
pub mod parameters;
pub mod prr;
pub mod sampler;

pub use bitstring::{format_bits, parse_bits};
pub use hash_functions::{CohortBloomMapper, BLOOM_DIGEST_BYTES};
pub use irr::{compute_irr, SessionMasks};
pub use parameters::{ParameterRecord, ParameterSet, ParameterSetBuilder};
pub use prr::{PrrGenerator, PrrMasks, PRR_DIGEST_BYTES};
pub use sampler::{sample_bits, SecureBitSampler, MAX_SAMPLE_BITS};
