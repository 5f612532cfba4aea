//! `load-curves` library crate.
//!
//! The binary (`lc`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., batch drivers, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod energy;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod profile;
pub mod report;
