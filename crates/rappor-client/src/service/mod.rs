//! Service Layer
//!
//! The encoder orchestrates the domain stages for one client and owns the
//! session-randomness policy.

pub mod encoder;

pub use encoder::{ClientSecret, EncodeTrace, Encoder, SessionPolicy, GENERATED_SECRET_BYTES};
