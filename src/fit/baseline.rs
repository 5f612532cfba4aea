//! Zone-wide dry-bulb/wet-bulb baseline.
//!
//! Cooling load responds to humidity, proxied by how far the observed
//! wet-bulb temperature deviates from what the dry-bulb temperature alone
//! would predict. That prediction is a quadratic fit across the whole
//! fitting year, restricted to warm hours (`temp_c >= t_bpc_seed_c`) where
//! latent cooling load actually matters. Computed once per zone, before any
//! slot fit, and shared read-only afterwards.

use nalgebra::{DMatrix, DVector};

use crate::domain::{DryBulbWetBulbFit, FitterConfig, HourlyObservation};
use crate::error::FitError;
use crate::math::fit_ols;

/// Fit `temp_wb_expected = a·temp² + b·temp + c` by least squares.
pub fn fit_db_wb_baseline(
    obs: &[HourlyObservation],
    config: &FitterConfig,
) -> Result<DryBulbWetBulbFit, FitError> {
    let warm: Vec<&HourlyObservation> = obs
        .iter()
        .filter(|o| o.temp_c >= config.t_bpc_seed_c)
        .collect();

    // Three coefficients need more than three points to mean anything.
    if warm.len() < 4 {
        return Err(FitError::DegenerateBaseline { have: warm.len() });
    }

    let n = warm.len();
    let mut x = DMatrix::<f64>::zeros(n, 3);
    let mut y = DVector::<f64>::zeros(n);
    for (i, o) in warm.iter().enumerate() {
        x[(i, 0)] = o.temp_c * o.temp_c;
        x[(i, 1)] = o.temp_c;
        x[(i, 2)] = 1.0;
        y[i] = o.temp_c_wb;
    }

    let fit = fit_ols(&x, &y).ok_or(FitError::DegenerateBaseline { have: n })?;

    Ok(DryBulbWetBulbFit {
        a: fit.beta[0],
        b: fit.beta[1],
        c: fit.beta[2],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(temp_c: f64, temp_c_wb: f64) -> HourlyObservation {
        HourlyObservation {
            temp_c,
            temp_c_wb,
            hourly_dark_frac: 0.0,
            hour_local: 12,
            weekday: 2,
            holiday: false,
            load_mw: Some(50.0),
        }
    }

    #[test]
    fn recovers_exact_quadratic() {
        let (a, b, c) = (-0.01, 0.9, -1.5);
        let rows: Vec<_> = (10..35)
            .map(|t| {
                let t = t as f64;
                obs(t, a * t * t + b * t + c)
            })
            .collect();

        let fit = fit_db_wb_baseline(&rows, &FitterConfig::default()).unwrap();
        assert!((fit.a - a).abs() < 1e-8);
        assert!((fit.b - b).abs() < 1e-8);
        assert!((fit.c - c).abs() < 1e-7);

        // wb_diff vanishes on the curve itself.
        assert!(fit.wb_diff(20.0, fit.expected_wb(20.0)).abs() < 1e-9);
    }

    #[test]
    fn ignores_cold_hours() {
        // Cold hours carry garbage wet-bulb values; they sit below the seed
        // and must not influence the fit.
        let mut rows: Vec<_> = (10..40).map(|t| obs(t as f64, t as f64 - 2.0)).collect();
        rows.extend((-20..0).map(|t| obs(t as f64, 1000.0)));

        let fit = fit_db_wb_baseline(&rows, &FitterConfig::default()).unwrap();
        assert!((fit.expected_wb(20.0) - 18.0).abs() < 1e-6);
    }

    #[test]
    fn too_few_warm_hours_is_degenerate() {
        let rows: Vec<_> = (0..3).map(|t| obs(15.0 + t as f64, 13.0)).collect();
        let err = fit_db_wb_baseline(&rows, &FitterConfig::default()).unwrap_err();
        assert_eq!(err, FitError::DegenerateBaseline { have: 3 });
    }
}
