//! Input/output helpers.
//!
//! - coefficient / profile / stats CSV exports (`export`)
//! - model JSON read/write (`model`)

pub mod export;
pub mod model;

pub use export::*;
pub use model::*;
