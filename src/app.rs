//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the fit pipeline or a model-driven profile synthesis
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, FitArgs, ProfileArgs, WeatherArgs};
use crate::data::SampleConfig;
use crate::domain::FitterConfig;
use crate::error::FitError;
use crate::{io, profile, report};

pub mod pipeline;

/// Entry point for the `lc` binary.
pub fn run() -> Result<(), FitError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Profile(args) => handle_profile(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), FitError> {
    let sample_config = sample_config_from_args(&args.weather, true);
    let fitter_config = FitterConfig {
        t_bpc_seed_c: args.t_bpc_seed,
        t_bph_seed_c: args.t_bph_seed,
        daily_points: args.daily_points,
        dark_range_min: args.dark_range_min,
    };

    let run = pipeline::run_fit(&sample_config, &fitter_config)?;

    let summaries = report::summarize_fits(&run.outcome);
    println!(
        "{}",
        report::format::format_fit_summary(
            &run.sample.zone,
            run.sample.year,
            run.sample.weather.len(),
            &run.model.baseline,
            &summaries,
            &run.outcome.skipped,
        )
    );
    if args.table {
        println!("{}", report::format::format_fit_table(run.outcome.table.rows()));
    }
    println!("{}", report::format::format_profile_stats(&run.stats));

    if let Some(path) = &args.export_fits {
        io::write_fit_csv(path, &run.outcome.table)?;
    }
    if let Some(path) = &args.export_model {
        io::write_model_json(path, &run.model, &run.sample.zone, run.sample.year)?;
    }
    if let Some(path) = &args.export_profile {
        io::write_profile_csv(path, &run.profile)?;
    }
    if let Some(path) = &args.export_stats {
        io::write_stats_csv(path, &run.stats)?;
    }

    Ok(())
}

fn handle_profile(args: ProfileArgs) -> Result<(), FitError> {
    let model = io::read_model_json(&args.model)?.into_zone_model();

    let sample_config = sample_config_from_args(&args.weather, args.validate);
    let sample = crate::data::generate_sample(&sample_config)?;

    let rows = profile::synthesize(&sample.weather, &model)?;

    if args.validate {
        let actual = sample.actual_load().ok_or(FitError::InvalidConfig(
            "Validation requires a load-bearing sample.".to_string(),
        ))?;
        let stats = profile::validate(&rows, &actual)?;
        println!("{}", report::format::format_profile_stats(&stats));
        if let Some(path) = &args.export_stats {
            io::write_stats_csv(path, &stats)?;
        }
    } else if args.export_stats.is_some() {
        return Err(FitError::InvalidConfig(
            "--export-stats requires --validate.".to_string(),
        ));
    } else {
        let total: f64 = rows.iter().map(|r| r.total_load_mw).sum();
        println!(
            "Synthesized {} hours for zone '{}' ({}); avg load {:.1} MW",
            rows.len(),
            args.weather.zone,
            args.weather.year,
            total / rows.len().max(1) as f64,
        );
    }

    if let Some(path) = &args.export_profile {
        io::write_profile_csv(path, &rows)?;
    }

    Ok(())
}

fn sample_config_from_args(args: &WeatherArgs, with_load: bool) -> SampleConfig {
    SampleConfig {
        zone: args.zone.clone(),
        year: args.year,
        seed: args.seed,
        mean_temp_c: args.mean_temp,
        seasonal_swing_c: args.seasonal_swing,
        diurnal_swing_c: args.diurnal_swing,
        temp_noise_c: args.temp_noise,
        load_noise: args.load_noise,
        with_load,
    }
}
