//! Segmented model fitting.
//!
//! Responsibilities:
//!
//! - widen candidate breakpoints until a slot has enough observations
//! - fit the zone-wide dry-bulb/wet-bulb baseline
//! - fit heating/cooling segments per (hour, day-type) slot (parallel),
//!   with the ordered fallback chain for implausible coefficients

pub mod baseline;
pub mod breakpoint;
pub mod segment;

pub use baseline::*;
pub use breakpoint::*;
pub use segment::*;
