//! RAPPOR Encoder
//!
//! Orchestrates one client's pipeline:
//!
//! ```text
//! value -> CohortBloomMapper -> bloom -> PrrGenerator -> prr -> IRR masks -> irr
//! ```
//!
//! ## Session randomness
//!
//! The IRR masks `(p_gen, q_gen)` bound what a single report leaks only if
//! they are fresh for every report. `SessionPolicy::PerReport` (the default)
//! draws a new pair on every call. `SessionPolicy::FixedPerEncoder` draws one
//! pair at construction and reuses it: repeated reports of the same value are
//! then identical, so an observer learns nothing new from the second report,
//! but reports of *different* values are correlated through the shared
//! masks. Choose it only when that correlation is acceptable.

use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::adapters::OsEntropy;
use crate::domain::{CohortBloomMapper, ParameterSet, PrrGenerator, SessionMasks};
use crate::error::{ConfigError, EntropyError, RapporError};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::EntropySource;

/// Bytes drawn by `ClientSecret::generate`
pub const GENERATED_SECRET_BYTES: usize = 32;

/// When the IRR masks are drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPolicy {
    /// Fresh `(p_gen, q_gen)` for every report
    #[default]
    PerReport,
    /// One `(p_gen, q_gen)` for the lifetime of the encoder
    FixedPerEncoder,
}

/// A client's long-lived PRR key. Never transmitted, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ClientSecret(Vec<u8>);

impl ClientSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Draw a fresh random secret
    pub fn generate<E: EntropySource + ?Sized>(entropy: &E) -> Result<Self, EntropyError> {
        let mut bytes = vec![0u8; GENERATED_SECRET_BYTES];
        entropy.fill_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(<redacted>)")
    }
}

impl From<&str> for ClientSecret {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes())
    }
}

impl From<String> for ClientSecret {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes())
    }
}

impl From<&[u8]> for ClientSecret {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret)
    }
}

impl From<Vec<u8>> for ClientSecret {
    fn from(secret: Vec<u8>) -> Self {
        Self(secret)
    }
}

/// Intermediate values of one encoding, for diagnostics and tests only
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeTrace {
    pub bloom_bits: u32,
    pub prr_bits: u32,
    pub irr_bits: u32,
}

/// Turns values into transmittable reports for one client.
///
/// Parameters, cohort and secret are fixed at construction. The encoder is
/// `Send + Sync`; `encode` takes `&self` and may run on many threads at once.
pub struct Encoder<E: EntropySource = OsEntropy> {
    params: ParameterSet,
    cohort: u32,
    secret: ClientSecret,
    mapper: CohortBloomMapper,
    prr: PrrGenerator,
    policy: SessionPolicy,
    fixed_session: Option<SessionMasks>,
    entropy: Arc<E>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl Encoder<OsEntropy> {
    /// Encoder drawing fresh IRR masks from the OS for every report
    pub fn new(
        params: ParameterSet,
        cohort: u32,
        secret: impl Into<ClientSecret>,
    ) -> Result<Self, RapporError> {
        Self::with_entropy(
            params,
            cohort,
            secret,
            SessionPolicy::PerReport,
            Arc::new(OsEntropy::new()),
        )
    }
}

impl<E: EntropySource> Encoder<E> {
    /// Encoder with an explicit entropy source and session policy.
    ///
    /// With `FixedPerEncoder` the masks are drawn here, so an entropy failure
    /// surfaces from construction.
    pub fn with_entropy(
        params: ParameterSet,
        cohort: u32,
        secret: impl Into<ClientSecret>,
        policy: SessionPolicy,
        entropy: Arc<E>,
    ) -> Result<Self, RapporError> {
        check_client_config(&params, cohort)?;

        let fixed_session = match policy {
            SessionPolicy::PerReport => None,
            SessionPolicy::FixedPerEncoder => {
                warn_fixed_session(&params);
                Some(SessionMasks::sample(&params, entropy.as_ref())?)
            }
        };
        Self::build(params, cohort, secret.into(), policy, fixed_session, entropy)
    }

    /// Encoder pinned to caller-supplied IRR masks (`FixedPerEncoder`)
    pub fn with_session_masks(
        params: ParameterSet,
        cohort: u32,
        secret: impl Into<ClientSecret>,
        masks: SessionMasks,
        entropy: Arc<E>,
    ) -> Result<Self, RapporError> {
        check_client_config(&params, cohort)?;

        let mask = params.report_mask();
        for bits in [masks.p_gen, masks.q_gen] {
            if bits & !mask != 0 {
                return Err(ConfigError::BitsOutOfRange {
                    bits,
                    k_bloombits: params.k_bloombits(),
                }
                .into());
            }
        }
        warn_fixed_session(&params);
        Self::build(
            params,
            cohort,
            secret.into(),
            SessionPolicy::FixedPerEncoder,
            Some(masks),
            entropy,
        )
    }

    fn build(
        params: ParameterSet,
        cohort: u32,
        secret: ClientSecret,
        policy: SessionPolicy,
        fixed_session: Option<SessionMasks>,
        entropy: Arc<E>,
    ) -> Result<Self, RapporError> {
        let mapper = CohortBloomMapper::new(params.h_hashes(), params.k_bloombits())?;
        let prr = PrrGenerator::new(params.f_prob(), params.k_bloombits())?;

        debug!(
            k_bloombits = params.k_bloombits(),
            h_hashes = params.h_hashes(),
            m_cohorts = params.m_cohorts(),
            cohort,
            ?policy,
            "RAPPOR encoder created"
        );

        Ok(Self {
            params,
            cohort,
            secret,
            mapper,
            prr,
            policy,
            fixed_session,
            entropy,
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Route metrics events to `metrics`
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn cohort(&self) -> u32 {
        self.cohort
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// Bit width of every report
    pub fn report_width(&self) -> usize {
        self.params.k_bloombits()
    }

    /// Encode `value` into a report in `[0, 2^k_bloombits)`
    pub fn encode<V: AsRef<[u8]>>(&self, value: V) -> Result<u32, RapporError> {
        Ok(self.encode_with_trace(value)?.irr_bits)
    }

    /// Encode `value`, exposing the bloom and PRR stages as well
    pub fn encode_with_trace<V: AsRef<[u8]>>(&self, value: V) -> Result<EncodeTrace, RapporError> {
        let start = Instant::now();
        let value = value.as_ref();

        let bloom_bits = self.mapper.bloom_bits(value, self.cohort);
        let prr_bits = self.prr.compute(self.secret.as_bytes(), value, bloom_bits);
        let irr_bits = self.session()?.apply(prr_bits);

        self.metrics.record_report(start.elapsed());
        Ok(EncodeTrace {
            bloom_bits,
            prr_bits,
            irr_bits,
        })
    }

    /// Encode a bloom filter the caller already built.
    ///
    /// The PRR is keyed on the 4-byte big-endian encoding of `bloom_bits`.
    pub fn encode_bits(&self, bloom_bits: u32) -> Result<u32, RapporError> {
        if bloom_bits & !self.params.report_mask() != 0 {
            return Err(ConfigError::BitsOutOfRange {
                bits: bloom_bits,
                k_bloombits: self.params.k_bloombits(),
            }
            .into());
        }

        let start = Instant::now();
        let prr_bits = self
            .prr
            .compute(self.secret.as_bytes(), &bloom_bits.to_be_bytes(), bloom_bits);
        let irr_bits = self.session()?.apply(prr_bits);

        self.metrics.record_report(start.elapsed());
        Ok(irr_bits)
    }

    /// Encode many values in parallel.
    ///
    /// Output order matches input order. Fails as a whole on the first error.
    pub fn encode_batch<V>(&self, values: &[V]) -> Result<Vec<u32>, RapporError>
    where
        V: AsRef<[u8]> + Sync,
    {
        values.par_iter().map(|value| self.encode(value)).collect()
    }

    fn session(&self) -> Result<SessionMasks, RapporError> {
        if let Some(masks) = self.fixed_session {
            return Ok(masks);
        }

        match SessionMasks::sample(&self.params, self.entropy.as_ref()) {
            Ok(masks) => {
                self.metrics.record_session_sampled();
                Ok(masks)
            }
            Err(err) => {
                if matches!(err, RapporError::Entropy(_)) {
                    self.metrics.record_entropy_failure();
                    warn!(error = %err, "entropy source failed while sampling IRR masks");
                }
                Err(err)
            }
        }
    }
}

/// Parameter and cohort checks, run before any entropy is drawn
fn check_client_config(params: &ParameterSet, cohort: u32) -> Result<(), RapporError> {
    params.validate()?;
    if cohort >= params.m_cohorts() {
        return Err(ConfigError::CohortOutOfRange {
            cohort,
            m_cohorts: params.m_cohorts(),
        }
        .into());
    }
    Ok(())
}

fn warn_fixed_session(params: &ParameterSet) {
    warn!(
        k_bloombits = params.k_bloombits(),
        "IRR masks fixed for encoder lifetime; reports of different values share noise"
    );
}

impl<E: EntropySource> fmt::Debug for Encoder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("params", &self.params)
            .field("cohort", &self.cohort)
            .field("secret", &self.secret)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
