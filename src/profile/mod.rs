//! Profile synthesis and validation.
//!
//! The synthesizer drives the energy evaluator over every hour of a target
//! weather year and sums the components into a total load. For the fitting
//! year (where observed load exists) the validator compares the synthesized
//! series against the actuals and reports summary fit-quality statistics.

use crate::domain::{HourlyObservation, ProfileRow, ProfileStats, ZoneModel};
use crate::energy::evaluate;
use crate::error::FitError;

/// Synthesize an hourly load profile for a weather year.
///
/// Hours are indexed in input order (UTC). Any hour whose slot has no fitted
/// row aborts the run with that hour's identity; skip-and-continue policy
/// belongs to the caller.
pub fn synthesize(weather: &[HourlyObservation], model: &ZoneModel) -> Result<Vec<ProfileRow>, FitError> {
    let mut rows = Vec::with_capacity(weather.len());
    for (hour_utc, w) in weather.iter().enumerate() {
        let energy = evaluate(w, &model.fits, &model.baseline)?;
        rows.push(ProfileRow {
            hour_utc,
            base_load_mw: energy.base_mw,
            heat_load_mw: energy.heat_mw,
            cool_load_mw: energy.cool_mw,
            total_load_mw: energy.total(),
        });
    }
    Ok(rows)
}

/// Compare a synthesized profile against observed load.
pub fn validate(profile: &[ProfileRow], actual: &[f64]) -> Result<ProfileStats, FitError> {
    if profile.len() != actual.len() {
        return Err(FitError::LengthMismatch {
            profile: profile.len(),
            actual: actual.len(),
        });
    }
    if profile.is_empty() {
        return Err(FitError::LengthMismatch {
            profile: 0,
            actual: 0,
        });
    }

    let n = profile.len() as f64;
    let mut mrae_sum = 0.0;
    let mut mrae_max = f64::NEG_INFINITY;
    let mut sq_sum = 0.0;
    let mut profile_sum = 0.0;
    let mut actual_sum = 0.0;
    let mut profile_max = f64::NEG_INFINITY;
    let mut actual_max = f64::NEG_INFINITY;

    for (row, &obs) in profile.iter().zip(actual.iter()) {
        let synth = row.total_load_mw;
        let rel = (synth - obs).abs() / obs;
        mrae_sum += rel;
        mrae_max = mrae_max.max(rel);
        sq_sum += (obs - synth) * (obs - synth);
        profile_sum += synth;
        actual_sum += obs;
        profile_max = profile_max.max(synth);
        actual_max = actual_max.max(obs);
    }

    let avg_actual = actual_sum / n;

    Ok(ProfileStats {
        mrae_avg: mrae_sum / n,
        mrae_max,
        nrmsd: (sq_sum / n).sqrt() / avg_actual,
        avg_profile_mw: profile_sum / n,
        avg_actual_mw: avg_actual,
        max_profile_mw: profile_max,
        max_actual_mw: actual_max,
    })
}
