//! Mathematical utilities: ordinary least squares with diagnostics.

pub mod ols;

pub use ols::*;
