//! Ports Layer
//!
//! Driven ports the encoder depends on. The only external dependency of the
//! pipeline is a source of secure randomness.

pub mod outbound;

pub use outbound::EntropySource;
