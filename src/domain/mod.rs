//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - hourly weather/load observations (`HourlyObservation`)
//! - the day-type partition (`DayType`) and slot keys (`SlotKey`)
//! - fit outputs (`SegmentFit`, `SegmentFitTable`, `DryBulbWetBulbFit`)
//! - evaluation/profile outputs (`EnergyComponents`, `ProfileRow`, `ProfileStats`)

pub mod types;

pub use types::*;
