//! Encoding parameters and their interchange record
//!
//! A `ParameterSet` is validated once at construction and is immutable
//! afterwards. The same values must be handed to whatever decodes the
//! reports, so the set serializes to a flat record with fixed field names.
//!
//! # Example
//!
//! ```
//! use rappor_client::ParameterSetBuilder;
//!
//! let params = ParameterSetBuilder::new()
//!     .k_bloombits(32)
//!     .h_hashes(2)
//!     .m_cohorts(128)
//!     .build()
//!     .expect("valid parameters");
//!
//! let json = params.to_json().unwrap();
//! assert!(json.contains("\"k_bloombits\":32"));
//! ```

use serde::{Deserialize, Serialize};

use super::hash_functions::BLOOM_DIGEST_BYTES;
use super::prr::PRR_DIGEST_BYTES;
use crate::error::{ConfigError, EntropyError};
use crate::ports::EntropySource;

/// Validated RAPPOR encoding parameters.
///
/// Invariants:
/// - `1 <= h_hashes <= 16` (bytes in the bloom digest)
/// - `1 <= k_bloombits <= 32` (bytes in the PRR digest)
/// - `m_cohorts >= 1`
/// - `p_prob`, `q_prob`, `f_prob` finite and within `[0, 1]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "ParameterRecord", try_from = "ParameterRecord")]
pub struct ParameterSet {
    k_bloombits: usize,
    h_hashes: usize,
    m_cohorts: u32,
    p_prob: f64,
    q_prob: f64,
    f_prob: f64,
}

/// Plain interchange record shared with the decoding pipeline.
///
/// Field names are part of the wire contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub k_bloombits: usize,
    pub h_hashes: usize,
    pub m_cohorts: u32,
    pub p_prob: f64,
    pub q_prob: f64,
    pub f_prob: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            k_bloombits: 16,
            h_hashes: 2,
            m_cohorts: 64,
            p_prob: 0.5,
            q_prob: 0.75,
            f_prob: 0.5,
        }
    }
}

impl ParameterSet {
    /// Create a new parameter set with validation
    pub fn new(
        k_bloombits: usize,
        h_hashes: usize,
        m_cohorts: u32,
        p_prob: f64,
        q_prob: f64,
        f_prob: f64,
    ) -> Result<Self, ConfigError> {
        let params = Self {
            k_bloombits,
            h_hashes,
            m_cohorts,
            p_prob,
            q_prob,
            f_prob,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check digest-length limits and probability ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k_bloombits == 0 {
            return Err(ConfigError::ZeroBloomBits);
        }
        if self.k_bloombits > PRR_DIGEST_BYTES {
            return Err(ConfigError::BloomTooWide {
                k_bloombits: self.k_bloombits,
                max: PRR_DIGEST_BYTES,
            });
        }

        if self.h_hashes == 0 {
            return Err(ConfigError::ZeroHashes);
        }
        if self.h_hashes > BLOOM_DIGEST_BYTES {
            return Err(ConfigError::TooManyHashes {
                h_hashes: self.h_hashes,
                max: BLOOM_DIGEST_BYTES,
            });
        }

        if self.m_cohorts == 0 {
            return Err(ConfigError::ZeroCohorts);
        }

        check_probability("p_prob", self.p_prob)?;
        check_probability("q_prob", self.q_prob)?;
        check_probability("f_prob", self.f_prob)?;

        Ok(())
    }

    /// Size of the bloom filter, and of every report, in bits
    pub fn k_bloombits(&self) -> usize {
        self.k_bloombits
    }

    /// Number of bloom hash functions
    pub fn h_hashes(&self) -> usize {
        self.h_hashes
    }

    /// Number of cohorts clients are spread over
    pub fn m_cohorts(&self) -> u32 {
        self.m_cohorts
    }

    /// P(report bit = 1) where the PRR bit is 0
    pub fn p_prob(&self) -> f64 {
        self.p_prob
    }

    /// P(report bit = 1) where the PRR bit is 1
    pub fn q_prob(&self) -> f64 {
        self.q_prob
    }

    /// Fraction of bloom bits replaced by the PRR's uniform coin
    pub fn f_prob(&self) -> f64 {
        self.f_prob
    }

    /// Mask covering exactly `k_bloombits` low bits
    pub fn report_mask(&self) -> u32 {
        low_bits_mask(self.k_bloombits)
    }

    /// Draw a uniformly random cohort in `[0, m_cohorts)` for a new client
    pub fn assign_cohort<E: EntropySource + ?Sized>(&self, entropy: &E) -> Result<u32, EntropyError> {
        entropy.uniform_below(self.m_cohorts)
    }

    /// Serialize to the JSON interchange record
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// Parse and validate a JSON interchange record
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let record: ParameterRecord =
            serde_json::from_str(json).map_err(|e| ConfigError::Serialization(e.to_string()))?;
        Self::try_from(record)
    }
}

/// `width` low bits set; `width` must be at most 32
pub(crate) fn low_bits_mask(width: usize) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidProbability { name, value });
    }
    Ok(())
}

impl From<ParameterSet> for ParameterRecord {
    fn from(params: ParameterSet) -> Self {
        Self {
            k_bloombits: params.k_bloombits,
            h_hashes: params.h_hashes,
            m_cohorts: params.m_cohorts,
            p_prob: params.p_prob,
            q_prob: params.q_prob,
            f_prob: params.f_prob,
        }
    }
}

impl TryFrom<ParameterRecord> for ParameterSet {
    type Error = ConfigError;

    fn try_from(record: ParameterRecord) -> Result<Self, Self::Error> {
        ParameterSet::new(
            record.k_bloombits,
            record.h_hashes,
            record.m_cohorts,
            record.p_prob,
            record.q_prob,
            record.f_prob,
        )
    }
}

/// Builder for ParameterSet with validation
///
/// Unset fields fall back to `ParameterSet::default()`.
#[derive(Default)]
pub struct ParameterSetBuilder {
    k_bloombits: Option<usize>,
    h_hashes: Option<usize>,
    m_cohorts: Option<u32>,
    p_prob: Option<f64>,
    q_prob: Option<f64>,
    f_prob: Option<f64>,
}

impl ParameterSetBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bloom filter size in bits (1..=32)
    pub fn k_bloombits(mut self, bits: usize) -> Self {
        self.k_bloombits = Some(bits);
        self
    }

    /// Set the number of hash functions (1..=16)
    pub fn h_hashes(mut self, hashes: usize) -> Self {
        self.h_hashes = Some(hashes);
        self
    }

    /// Set the number of cohorts
    pub fn m_cohorts(mut self, cohorts: u32) -> Self {
        self.m_cohorts = Some(cohorts);
        self
    }

    pub fn p_prob(mut self, p: f64) -> Self {
        self.p_prob = Some(p);
        self
    }

    pub fn q_prob(mut self, q: f64) -> Self {
        self.q_prob = Some(q);
        self
    }

    pub fn f_prob(mut self, f: f64) -> Self {
        self.f_prob = Some(f);
        self
    }

    /// Build the ParameterSet, validating all fields
    pub fn build(self) -> Result<ParameterSet, ConfigError> {
        let defaults = ParameterSet::default();

        ParameterSet::new(
            self.k_bloombits.unwrap_or(defaults.k_bloombits),
            self.h_hashes.unwrap_or(defaults.h_hashes),
            self.m_cohorts.unwrap_or(defaults.m_cohorts),
            self.p_prob.unwrap_or(defaults.p_prob),
            self.q_prob.unwrap_or(defaults.q_prob),
            self.f_prob.unwrap_or(defaults.f_prob),
        )
    }
}
