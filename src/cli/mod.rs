//! Command-line parsing for the segmented load-curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the fitting/evaluation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lc", version, about = "Segmented Load-Temperature Curve Fitter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a zone model from a synthetic zone-year, print diagnostics, and
    /// optionally export coefficients/profile/stats.
    Fit(FitArgs),
    /// Synthesize an hourly profile from a previously exported model JSON.
    Profile(ProfileArgs),
}

/// Weather-generation options shared by both subcommands.
#[derive(Debug, Parser, Clone)]
pub struct WeatherArgs {
    /// Load zone name (tags outputs; also seeds generation).
    #[arg(short = 'z', long, default_value = "demo")]
    pub zone: String,

    /// Calendar year to generate.
    #[arg(short = 'y', long, default_value_t = 2019)]
    pub year: i32,

    /// Random seed for weather generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Annual mean dry-bulb temperature (deg C).
    #[arg(long, default_value_t = 12.0)]
    pub mean_temp: f64,

    /// Half-amplitude of the seasonal temperature swing (deg C).
    #[arg(long, default_value_t = 14.0)]
    pub seasonal_swing: f64,

    /// Half-amplitude of the diurnal temperature swing (deg C).
    #[arg(long, default_value_t = 5.0)]
    pub diurnal_swing: f64,

    /// Standard deviation of hourly temperature noise (deg C).
    #[arg(long, default_value_t = 2.5)]
    pub temp_noise: f64,

    /// Relative standard deviation of load noise.
    #[arg(long, default_value_t = 0.02)]
    pub load_noise: f64,
}

/// Options for `lc fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub weather: WeatherArgs,

    /// Seed for the heat-side breakpoint (deg C).
    #[arg(long, default_value_t = 10.0)]
    pub t_bpc_seed: f64,

    /// Seed for the cool-side breakpoint (deg C).
    #[arg(long, default_value_t = 18.3)]
    pub t_bph_seed: f64,

    /// Minimum observations per contributing day of the week.
    #[arg(long, default_value_t = 10)]
    pub daily_points: usize,

    /// Minimum dark-fraction range for the darkness slope to be fit.
    #[arg(long, default_value_t = 0.3)]
    pub dark_range_min: f64,

    /// Print the full per-slot coefficient table.
    #[arg(long)]
    pub table: bool,

    /// Export the wide per-hour coefficient CSV.
    #[arg(long, value_name = "CSV")]
    pub export_fits: Option<PathBuf>,

    /// Export the fitted model to JSON.
    #[arg(long = "export-model", value_name = "JSON")]
    pub export_model: Option<PathBuf>,

    /// Export the synthesized hourly profile CSV.
    #[arg(long, value_name = "CSV")]
    pub export_profile: Option<PathBuf>,

    /// Export the validation stats CSV.
    #[arg(long, value_name = "CSV")]
    pub export_stats: Option<PathBuf>,
}

/// Options for `lc profile`.
#[derive(Debug, Parser, Clone)]
pub struct ProfileArgs {
    /// Model JSON file produced by `lc fit --export-model`.
    #[arg(short = 'm', long, value_name = "JSON")]
    pub model: PathBuf,

    #[command(flatten)]
    pub weather: WeatherArgs,

    /// Also generate observed load for the target year and print validation
    /// stats against the synthesized profile.
    #[arg(long)]
    pub validate: bool,

    /// Export the synthesized hourly profile CSV.
    #[arg(long, value_name = "CSV")]
    pub export_profile: Option<PathBuf>,

    /// Export the validation stats CSV (requires --validate).
    #[arg(long, value_name = "CSV")]
    pub export_stats: Option<PathBuf>,
}
