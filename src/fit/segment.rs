//! Per-slot segmented model fitting.
//!
//! For each of the 24 hours × 2 day-types we fit:
//!
//! - a heating segment on the cold tail (`temp <= t_bpc` after widening),
//!   `load ~ temp + dark + 1`, with an ordered fallback chain for
//!   physically implausible coefficients
//! - a cooling segment on the warm tail (`temp >= t_bph` after widening),
//!   regressing the heating-residual load on dry-bulb temperature and the
//!   wet-bulb deviation
//!
//! The fallback chain is a model-selection sequence, not incidental
//! branching: every degrade step records which model it moved to and why,
//! so the terminal model is inspectable independently of the numbers.
//!
//! Slots are independent, so the 48-way loop runs on rayon; results are
//! re-ordered deterministically afterwards.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{
    DryBulbWetBulbFit, FitterConfig, HeatModelKind, HourlyObservation, SegmentFit,
    SegmentFitTable, SlotKey,
};
use crate::energy::evaluate_fit;
use crate::error::FitError;
use crate::fit::breakpoint::{Side, adjust};
use crate::math::fit_ols;

/// Why a heating-model stage was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    /// Load rose with temperature in the heating regime.
    PositiveHeatSlope,
    /// Load fell with darkness.
    NegativeDarkSlope,
    /// The dark fraction barely varies, so its slope is unidentifiable.
    LowDarkVariation,
}

/// One step of the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Degrade {
    pub to: HeatModelKind,
    pub reason: DegradeReason,
}

/// Accepted heating-segment model for one slot.
#[derive(Debug, Clone)]
pub struct HeatFit {
    pub s_heat: f64,
    pub s_dark: f64,
    pub i_heat: f64,
    pub s_heat_stderr: f64,
    pub s_dark_stderr: f64,
    pub r_squared: f64,
    pub n: usize,
    pub model: HeatModelKind,
    pub degrades: Vec<Degrade>,
}

#[derive(Debug, Clone)]
struct CoolFit {
    s_cool_db: f64,
    s_cool_wb: f64,
    i_cool: f64,
    s_cool_db_stderr: f64,
    s_cool_wb_stderr: f64,
    r_squared: f64,
    n: usize,
}

/// Output of fitting all 48 slots of a zone.
#[derive(Debug, Clone)]
pub struct SegmentFitOutcome {
    pub table: SegmentFitTable,
    /// Slots that could not be fit, and why (for diagnostics).
    pub skipped: Vec<(SlotKey, FitError)>,
    /// Fallback-chain steps taken per slot (empty for slots fit at full rank).
    pub degrades: Vec<(SlotKey, Vec<Degrade>)>,
}

/// Fit every (hour, day-type) slot of the zone.
///
/// A slot failure does not abort the others; it is collected into
/// `skipped`. Only a zone where *no* slot fits is an error.
pub fn fit_segments(
    obs: &[HourlyObservation],
    baseline: &DryBulbWetBulbFit,
    config: &FitterConfig,
) -> Result<SegmentFitOutcome, FitError> {
    config.validate()?;

    let results: Vec<(SlotKey, Result<(SegmentFit, Vec<Degrade>), FitError>)> = SlotKey::all()
        .par_iter()
        .map(|&key| {
            let rows: Vec<HourlyObservation> = obs
                .iter()
                .filter(|o| o.hour_local == key.hour && o.day_type() == key.day_type)
                .copied()
                .collect();
            (key, fit_slot(&rows, key, baseline, config))
        })
        .collect();

    let mut fitted = Vec::new();
    let mut skipped = Vec::new();
    let mut degrades = Vec::new();
    for (key, result) in results {
        match result {
            Ok((fit, steps)) => {
                fitted.push(fit);
                if !steps.is_empty() {
                    degrades.push((key, steps));
                }
            }
            Err(err) => skipped.push((key, err)),
        }
    }

    if fitted.is_empty() {
        return Err(FitError::NoFittableSlots);
    }

    Ok(SegmentFitOutcome {
        table: SegmentFitTable::new(fitted),
        skipped,
        degrades,
    })
}

/// Fit a single slot from its matching observations.
///
/// Returns the fit together with any fallback-chain steps taken.
pub fn fit_slot(
    rows: &[HourlyObservation],
    key: SlotKey,
    baseline: &DryBulbWetBulbFit,
    config: &FitterConfig,
) -> Result<(SegmentFit, Vec<Degrade>), FitError> {
    let need = config.min_count(key.day_type);
    if rows.len() < need {
        return Err(FitError::InsufficientData {
            hour: key.hour,
            day_type: key.day_type,
            have: rows.len(),
            need,
        });
    }
    if rows.iter().any(|r| r.load_mw.is_none()) {
        return Err(FitError::MissingLoad {
            hour: key.hour,
            day_type: key.day_type,
        });
    }

    let (heat_rows, t_bpc) = adjust(rows, need, config.t_bpc_seed_c, Side::Heat);
    let (cool_rows, t_bph) = adjust(rows, need, config.t_bph_seed_c, Side::Cool);

    // Widening in an extreme climate can push the bounds past each other.
    let t_bpc = t_bpc.min(t_bph);
    let mut t_bph = t_bph;

    let heat = fit_heat_segment(&heat_rows, key, config)?;
    let cool = fit_cool_segment(&cool_rows, &heat, t_bph, baseline, key)?;

    // The cooling regime cannot start below its own fit's zero crossing.
    let zero_crossing = -cool.i_cool / cool.s_cool_db;
    if zero_crossing.is_finite() && zero_crossing > t_bph {
        t_bph = zero_crossing;
    }

    let mut fit = SegmentFit {
        hour: key.hour,
        day_type: key.day_type,
        t_bpc,
        t_bph,
        s_heat: heat.s_heat,
        s_dark: heat.s_dark,
        i_heat: heat.i_heat,
        heat_model: heat.model,
        s_cool_db: cool.s_cool_db,
        s_cool_wb: cool.s_cool_wb,
        i_cool: cool.i_cool,
        s_heat_stderr: heat.s_heat_stderr,
        s_dark_stderr: heat.s_dark_stderr,
        n_heat: heat.n,
        r2_heat: heat.r_squared,
        s_cool_db_stderr: cool.s_cool_db_stderr,
        s_cool_wb_stderr: cool.s_cool_wb_stderr,
        n_cool: cool.n,
        r2_cool: cool.r_squared,
        mrae_heat: f64::NAN,
        mrae_cool: f64::NAN,
        mrae_mid: f64::NAN,
    };

    // Fit-quality diagnostics, evaluated through the same blended model the
    // evaluator uses.
    let cool_hi: Vec<HourlyObservation> = cool_rows
        .iter()
        .filter(|r| r.temp_c >= fit.t_bph)
        .copied()
        .collect();
    let mid: Vec<HourlyObservation> = rows
        .iter()
        .filter(|r| r.temp_c > fit.t_bpc && r.temp_c < fit.t_bph)
        .copied()
        .collect();

    fit.mrae_heat = mrae(&heat_rows, &fit, baseline);
    fit.mrae_cool = mrae(&cool_hi, &fit, baseline);
    fit.mrae_mid = mrae(&mid, &fit, baseline);

    Ok((fit, heat.degrades))
}

/// Mean relative absolute error of the blended model over `rows`.
/// NaN for an empty subset.
fn mrae(rows: &[HourlyObservation], fit: &SegmentFit, baseline: &DryBulbWetBulbFit) -> f64 {
    if rows.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = rows
        .iter()
        .map(|r| {
            let predicted =
                evaluate_fit(fit, baseline, r.temp_c, r.temp_c_wb, r.hourly_dark_frac).total();
            let actual = r.load_mw.unwrap_or(f64::NAN);
            (predicted - actual).abs() / actual
        })
        .sum();
    sum / rows.len() as f64
}

/// Fit the heating segment with the fallback chain.
///
/// Stage order:
/// 1. `load ~ temp + dark + 1`; a positive heating slope degrades to
/// 2. `load ~ dark + 1`; then, on either path, a negative darkness slope or
///    an under-varying dark fraction degrades to
/// 3. `load ~ temp + 1`; a positive heating slope there collapses to
/// 4. `load ~ 1` (mean load).
pub fn fit_heat_segment(
    rows: &[HourlyObservation],
    key: SlotKey,
    config: &FitterConfig,
) -> Result<HeatFit, FitError> {
    let degenerate = FitError::DegenerateFit {
        hour: key.hour,
        day_type: key.day_type,
        segment: "heating",
    };

    let y: Vec<f64> = rows.iter().map(|r| r.load_mw.unwrap_or(f64::NAN)).collect();
    let temp: Vec<f64> = rows.iter().map(|r| r.temp_c).collect();
    let dark: Vec<f64> = rows.iter().map(|r| r.hourly_dark_frac).collect();

    let full = fit_ols(&design(&[&temp[..], &dark[..]], rows.len()), &DVector::from_row_slice(&y))
        .ok_or_else(|| degenerate.clone())?;

    let mut out = HeatFit {
        s_heat: full.beta[0],
        s_dark: full.beta[1],
        i_heat: full.beta[2],
        s_heat_stderr: full.stderr[0],
        s_dark_stderr: full.stderr[1],
        r_squared: full.r_squared,
        n: full.n,
        model: HeatModelKind::TempDark,
        degrades: Vec::new(),
    };

    if out.s_heat > 0.0 {
        let refit = fit_ols(&design(&[&dark[..]], rows.len()), &DVector::from_row_slice(&y))
            .ok_or_else(|| degenerate.clone())?;
        out.s_heat = 0.0;
        out.s_dark = refit.beta[0];
        out.i_heat = refit.beta[1];
        out.s_heat_stderr = 0.0;
        out.s_dark_stderr = refit.stderr[0];
        out.r_squared = refit.r_squared;
        out.model = HeatModelKind::DarkOnly;
        out.degrades.push(Degrade {
            to: HeatModelKind::DarkOnly,
            reason: DegradeReason::PositiveHeatSlope,
        });
    }

    let dark_range = dark.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v))
        - dark.iter().fold(f64::INFINITY, |m, &v| m.min(v));

    if out.s_dark < 0.0 || dark_range < config.dark_range_min {
        let reason = if out.s_dark < 0.0 {
            DegradeReason::NegativeDarkSlope
        } else {
            DegradeReason::LowDarkVariation
        };
        let refit = fit_ols(&design(&[&temp[..]], rows.len()), &DVector::from_row_slice(&y))
            .ok_or_else(|| degenerate.clone())?;
        out.s_heat = refit.beta[0];
        out.s_dark = 0.0;
        out.i_heat = refit.beta[1];
        out.s_heat_stderr = refit.stderr[0];
        out.s_dark_stderr = 0.0;
        out.r_squared = refit.r_squared;
        out.model = HeatModelKind::TempOnly;
        out.degrades.push(Degrade {
            to: HeatModelKind::TempOnly,
            reason,
        });

        if out.s_heat > 0.0 {
            let refit = fit_ols(&design(&[], rows.len()), &DVector::from_row_slice(&y))
                .ok_or(degenerate)?;
            out.s_heat = 0.0;
            out.s_heat_stderr = 0.0;
            out.i_heat = refit.beta[0];
            out.r_squared = refit.r_squared;
            out.model = HeatModelKind::Constant;
            out.degrades.push(Degrade {
                to: HeatModelKind::Constant,
                reason: DegradeReason::PositiveHeatSlope,
            });
        }
    }

    Ok(out)
}

/// Fit the cooling segment on the heating-residual load.
fn fit_cool_segment(
    rows: &[HourlyObservation],
    heat: &HeatFit,
    t_bph: f64,
    baseline: &DryBulbWetBulbFit,
    key: SlotKey,
) -> Result<CoolFit, FitError> {
    // Residual after removing the heating model held at t_bph plus the
    // darkness contribution; what remains is attributable to cooling.
    let floor = heat.s_heat * t_bph + heat.i_heat;
    let y: Vec<f64> = rows
        .iter()
        .map(|r| r.load_mw.unwrap_or(f64::NAN) - floor - heat.s_dark * r.hourly_dark_frac)
        .collect();

    let temp: Vec<f64> = rows.iter().map(|r| r.temp_c).collect();
    let wb_diff: Vec<f64> = rows
        .iter()
        .map(|r| baseline.wb_diff(r.temp_c, r.temp_c_wb))
        .collect();

    let fit = fit_ols(
        &design(&[&temp[..], &wb_diff[..]], rows.len()),
        &DVector::from_row_slice(&y),
    )
    .ok_or(FitError::DegenerateFit {
        hour: key.hour,
        day_type: key.day_type,
        segment: "cooling",
    })?;

    Ok(CoolFit {
        s_cool_db: fit.beta[0],
        s_cool_wb: fit.beta[1],
        i_cool: fit.beta[2],
        s_cool_db_stderr: fit.stderr[0],
        s_cool_wb_stderr: fit.stderr[1],
        r_squared: fit.r_squared,
        n: fit.n,
    })
}

/// Build a design matrix from the given columns plus a trailing intercept.
fn design(columns: &[&[f64]], n: usize) -> DMatrix<f64> {
    let p = columns.len() + 1;
    let mut x = DMatrix::<f64>::zeros(n, p);
    for i in 0..n {
        for (j, col) in columns.iter().enumerate() {
            x[(i, j)] = col[i];
        }
        x[(i, p - 1)] = 1.0;
    }
    x
}
