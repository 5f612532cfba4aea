//! Shared fit-pipeline logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! sample generation -> baseline fit -> segment fits -> profile -> validation
//!
//! The CLI front-end can then focus on presentation and exports.

use crate::data::{SampleConfig, SampleData, generate_sample};
use crate::domain::{FitterConfig, ProfileRow, ProfileStats, ZoneModel};
use crate::error::FitError;
use crate::fit::{SegmentFitOutcome, fit_db_wb_baseline, fit_segments};
use crate::profile;

/// All computed outputs of a single `lc fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub sample: SampleData,
    pub outcome: SegmentFitOutcome,
    pub model: ZoneModel,
    pub profile: Vec<ProfileRow>,
    pub stats: ProfileStats,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(
    sample_config: &SampleConfig,
    fitter_config: &FitterConfig,
) -> Result<RunOutput, FitError> {
    // 1) Generate the synthetic zone-year (weather + observed load).
    let sample = generate_sample(sample_config)?;

    run_fit_with_sample(sample, fitter_config)
}

/// Execute the fitting pipeline on a pre-generated sample.
pub fn run_fit_with_sample(
    sample: SampleData,
    fitter_config: &FitterConfig,
) -> Result<RunOutput, FitError> {
    // 2) Wet-bulb baseline over the warm hours of the year.
    let baseline = fit_db_wb_baseline(&sample.weather, fitter_config)?;

    // 3) Per-slot segment fits.
    let outcome = fit_segments(&sample.weather, &baseline, fitter_config)?;

    let model = ZoneModel {
        baseline,
        fits: outcome.table.clone(),
    };

    // 4) Back-cast the fitting year and validate against observed load.
    let profile = profile::synthesize(&sample.weather, &model)?;
    let actual = sample.actual_load().ok_or(FitError::MissingLoad {
        hour: 0,
        day_type: crate::domain::DayType::Weekday,
    })?;
    let stats = profile::validate(&profile, &actual)?;

    Ok(RunOutput {
        sample,
        outcome,
        model,
        profile,
        stats,
    })
}
