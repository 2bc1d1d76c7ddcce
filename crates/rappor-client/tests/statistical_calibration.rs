//! # Statistical Calibration Tests for the RAPPOR client
//!
//! These tests check that the noise each layer adds has the advertised rate.
//!
//! ## Test Categories
//!
//! 1. **PRR calibration** - noise and uniform masks from HMAC-SHA256
//! 2. **IRR calibration** - report bit frequency given the PRR bit
//! 3. **End-to-end calibration** - the full encoder with `f = 0`
//!
//! All randomness comes from seeded CSPRNG streams so the tests are
//! reproducible; tolerances are several standard deviations wide.

use rappor_client::{
    compute_irr, Encoder, EntropySource, ParameterSet, ParameterSetBuilder, PrrGenerator,
    SeededEntropy, SessionMasks, SessionPolicy,
};
use std::sync::Arc;

const TRIALS: usize = 10_000;
const TOLERANCE: f64 = 0.02;

// =============================================================================
// TEST HELPERS
// =============================================================================

fn random_bytes(entropy: &SeededEntropy, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    entropy.fill_bytes(&mut bytes).unwrap();
    bytes
}

fn assert_close(observed: f64, expected: f64, what: &str) {
    assert!(
        (observed - expected).abs() <= TOLERANCE,
        "{}: observed {:.4}, expected {:.4} +/- {}",
        what,
        observed,
        expected,
        TOLERANCE
    );
}

fn calibration_params(p: f64, q: f64, f: f64) -> ParameterSet {
    ParameterSetBuilder::new()
        .k_bloombits(32)
        .h_hashes(2)
        .m_cohorts(64)
        .p_prob(p)
        .q_prob(q)
        .f_prob(f)
        .build()
        .unwrap()
}

// =============================================================================
// PRR CALIBRATION
// =============================================================================

#[test]
fn test_prr_noise_fraction_half() {
    let prr = PrrGenerator::new(0.5, 32).unwrap();
    let entropy = SeededEntropy::from_seed(0x5eed_0001);

    let mut noise_bits = 0u64;
    let mut uniform_ones = 0u64;
    for _ in 0..TRIALS {
        let key = random_bytes(&entropy, 16);
        let value = random_bytes(&entropy, 8);
        let masks = prr.masks(&key, &value);
        noise_bits += masks.noise.count_ones() as u64;
        uniform_ones += masks.uniform.count_ones() as u64;
    }

    let total = (TRIALS * 32) as f64;
    assert_close(noise_bits as f64 / total, 0.5, "substituted bit fraction");
    assert_close(uniform_ones as f64 / total, 0.5, "uniform coin bias");
}

#[test]
fn test_prr_noise_fraction_tracks_f() {
    let entropy = SeededEntropy::from_seed(0x5eed_0002);

    for &f in &[0.25, 0.75] {
        let prr = PrrGenerator::new(f, 32).unwrap();
        let mut noise_bits = 0u64;
        for i in 0..TRIALS {
            let key = random_bytes(&entropy, 16);
            let masks = prr.masks(&key, format!("value_{}", i).as_bytes());
            noise_bits += masks.noise.count_ones() as u64;
        }
        assert_close(
            noise_bits as f64 / (TRIALS * 32) as f64,
            f,
            "substituted bit fraction",
        );
    }
}

#[test]
fn test_prr_substitution_keeps_half_of_set_bits() {
    // With f = 0.5, a set bloom bit survives with probability 1 - f/2 = 0.75
    let prr = PrrGenerator::new(0.5, 32).unwrap();
    let entropy = SeededEntropy::from_seed(0x5eed_0003);

    let mut ones = 0u64;
    for _ in 0..TRIALS {
        let key = random_bytes(&entropy, 16);
        ones += prr.compute(&key, b"foo", u32::MAX).count_ones() as u64;
    }
    assert_close(ones as f64 / (TRIALS * 32) as f64, 0.75, "P(prr=1 | bloom=1)");
}

// =============================================================================
// IRR CALIBRATION
// =============================================================================

#[test]
fn test_irr_frequency_when_prr_bit_zero() {
    let params = calibration_params(0.3, 0.8, 0.5);
    let entropy = SeededEntropy::from_seed(0x5eed_0004);

    let mut ones = 0u64;
    for _ in 0..TRIALS {
        let masks = SessionMasks::sample(&params, &entropy).unwrap();
        ones += compute_irr(0, masks.p_gen, masks.q_gen).count_ones() as u64;
    }
    assert_close(
        ones as f64 / (TRIALS * 32) as f64,
        params.p_prob(),
        "P(irr=1 | prr=0)",
    );
}

#[test]
fn test_irr_frequency_when_prr_bit_one() {
    let params = calibration_params(0.3, 0.8, 0.5);
    let entropy = SeededEntropy::from_seed(0x5eed_0005);

    let mut ones = 0u64;
    for _ in 0..TRIALS {
        let masks = SessionMasks::sample(&params, &entropy).unwrap();
        ones += compute_irr(u32::MAX, masks.p_gen, masks.q_gen).count_ones() as u64;
    }
    assert_close(
        ones as f64 / (TRIALS * 32) as f64,
        params.q_prob(),
        "P(irr=1 | prr=1)",
    );
}

#[test]
fn test_irr_single_bit_position() {
    // Track one bit position only, across independent draws
    let params = calibration_params(0.5, 0.75, 0.5);
    let entropy = SeededEntropy::from_seed(0x5eed_0006);

    let prr = 1u32 << 7;
    let mut set_on_one = 0usize;
    let mut set_on_zero = 0usize;
    for _ in 0..TRIALS {
        let irr = SessionMasks::sample(&params, &entropy).unwrap().apply(prr);
        set_on_one += ((irr >> 7) & 1) as usize;
        set_on_zero += ((irr >> 8) & 1) as usize;
    }
    assert_close(set_on_one as f64 / TRIALS as f64, 0.75, "bit 7 (prr=1)");
    assert_close(set_on_zero as f64 / TRIALS as f64, 0.5, "bit 8 (prr=0)");
}

// =============================================================================
// END-TO-END CALIBRATION
// =============================================================================

#[test]
fn test_encoder_report_frequencies_without_prr_noise() {
    // f = 0 makes PRR == bloom, so bloom bits report with q and the rest with p
    let params = calibration_params(0.2, 0.9, 0.0);
    let encoder = Encoder::with_entropy(
        params.clone(),
        5,
        "calibration-secret",
        SessionPolicy::PerReport,
        Arc::new(SeededEntropy::from_seed(0x5eed_0007)),
    )
    .unwrap();

    let bloom = encoder.encode_with_trace("foo").unwrap().bloom_bits;
    let bloom_width = bloom.count_ones() as usize;
    assert!(bloom_width >= 1);

    let mut ones_in_bloom = 0usize;
    let mut ones_outside = 0usize;
    for _ in 0..TRIALS {
        let trace = encoder.encode_with_trace("foo").unwrap();
        assert_eq!(trace.prr_bits, bloom);
        ones_in_bloom += (trace.irr_bits & bloom).count_ones() as usize;
        ones_outside += (trace.irr_bits & !bloom).count_ones() as usize;
    }

    assert_close(
        ones_in_bloom as f64 / (TRIALS * bloom_width) as f64,
        params.q_prob(),
        "bloom bits",
    );
    assert_close(
        ones_outside as f64 / (TRIALS * (32 - bloom_width)) as f64,
        params.p_prob(),
        "non-bloom bits",
    );
}
