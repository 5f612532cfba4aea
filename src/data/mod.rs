//! Synthetic zone-year generation.
//!
//! Real deployments feed the core an externally assembled weather/load
//! table. The `lc` binary instead generates a plausible zone-year so the
//! whole pipeline can run, and be tested, without any data dependency.

pub mod sample;

pub use sample::*;
