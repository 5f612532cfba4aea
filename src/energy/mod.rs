//! Energy evaluation: one hour's weather → (baseload, heating, cooling).
//!
//! Pure functions over an immutable `SegmentFitTable` and baseline fit, so
//! they are safe to call concurrently and bit-identical across calls.
//!
//! The decomposition for a slot with breakpoints `t_bpc <= t_bph`:
//!
//! - baseload: the heating model evaluated at `t_bph` — the floor load with
//!   no active heating or cooling
//! - heating: the heating slope unwound from `t_bph` down to the queried
//!   temperature (non-negative because `s_heat <= 0`)
//! - cooling: the full cooling fit above `t_bph`; inside the transition band
//!   a quadratic ramp of the cooling fit *anchored at* `t_bph`, so the curve
//!   is continuous at the breakpoint and reaches zero at `t_bpc`
//!
//! The transition term deliberately evaluates the cooling polynomial and the
//! wet-bulb deviation at the fixed `t_bph`, not at the queried temperature.

use crate::domain::{
    DryBulbWetBulbFit, EnergyComponents, HourlyObservation, SegmentFit, SegmentFitTable,
};
use crate::error::FitError;

/// Decompose one hour of weather using the fitted table.
///
/// The day-type is derived from the observation with the same rule used at
/// fit time. A missing slot row is an error carrying the slot identity.
pub fn evaluate(
    weather: &HourlyObservation,
    fits: &SegmentFitTable,
    baseline: &DryBulbWetBulbFit,
) -> Result<EnergyComponents, FitError> {
    let day_type = weather.day_type();
    let fit = fits
        .get(weather.hour_local, day_type)
        .ok_or(FitError::MissingFit {
            hour: weather.hour_local,
            day_type,
        })?;

    Ok(evaluate_fit(
        fit,
        baseline,
        weather.temp_c,
        weather.temp_c_wb,
        weather.hourly_dark_frac,
    ))
}

/// Evaluate a single fitted row. Also used by the fitter's own diagnostics.
pub fn evaluate_fit(
    fit: &SegmentFit,
    baseline: &DryBulbWetBulbFit,
    temp_c: f64,
    temp_c_wb: f64,
    dark_frac: f64,
) -> EnergyComponents {
    let base_mw = fit.s_heat * fit.t_bph + fit.s_dark * dark_frac + fit.i_heat;

    let heat_mw = if temp_c <= fit.t_bph {
        -fit.s_heat * (fit.t_bph - temp_c)
    } else {
        0.0
    };

    let mut cool_mw = 0.0;
    if temp_c >= fit.t_bph {
        let full = fit.s_cool_db * temp_c
            + fit.s_cool_wb * baseline.wb_diff(temp_c, temp_c_wb)
            + fit.i_cool;
        cool_mw += full.max(0.0);
    }
    if temp_c > fit.t_bpc && temp_c < fit.t_bph {
        let ramp = (temp_c - fit.t_bpc) / (fit.t_bph - fit.t_bpc);
        let at_bph = fit.s_cool_db * fit.t_bph
            + fit.s_cool_wb * baseline.wb_diff(fit.t_bph, temp_c_wb)
            + fit.i_cool;
        cool_mw += (ramp * ramp * at_bph).max(0.0);
    }

    EnergyComponents {
        base_mw,
        heat_mw,
        cool_mw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayType, HeatModelKind};

    fn fixture_fit() -> SegmentFit {
        SegmentFit {
            hour: 14,
            day_type: DayType::Weekday,
            t_bpc: 10.0,
            t_bph: 18.3,
            s_heat: -2.0,
            s_dark: 5.0,
            i_heat: 40.0,
            heat_model: HeatModelKind::TempDark,
            s_cool_db: 3.0,
            s_cool_wb: 1.5,
            i_cool: -20.0,
            s_heat_stderr: 0.0,
            s_dark_stderr: 0.0,
            n_heat: 50,
            r2_heat: 1.0,
            s_cool_db_stderr: 0.0,
            s_cool_wb_stderr: 0.0,
            n_cool: 50,
            r2_cool: 1.0,
            mrae_heat: 0.0,
            mrae_cool: 0.0,
            mrae_mid: f64::NAN,
        }
    }

    fn identity_baseline() -> DryBulbWetBulbFit {
        // Expected wet bulb equals dry bulb: wb_diff is the raw depression.
        DryBulbWetBulbFit {
            a: 0.0,
            b: 1.0,
            c: 0.0,
        }
    }

    fn weather(temp_c: f64, temp_c_wb: f64, dark_frac: f64) -> HourlyObservation {
        HourlyObservation {
            temp_c,
            temp_c_wb,
            hourly_dark_frac: dark_frac,
            hour_local: 14,
            weekday: 2,
            holiday: false,
            load_mw: None,
        }
    }

    #[test]
    fn warm_hour_decomposition_exact() {
        let fits = SegmentFitTable::new(vec![fixture_fit()]);
        let out = evaluate(&weather(25.0, 25.0, 0.1), &fits, &identity_baseline()).unwrap();

        // baseload = -2·18.3 + 5·0.1 + 40 = 3.9
        assert!((out.base_mw - 3.9).abs() < 1e-12);
        assert_eq!(out.heat_mw, 0.0);
        // cooling = 3·25 + 1.5·0 − 20 = 55
        assert!((out.cool_mw - 55.0).abs() < 1e-12);
        assert!((out.total() - 58.9).abs() < 1e-12);
    }

    #[test]
    fn cold_hour_has_heating_and_no_cooling() {
        let fits = SegmentFitTable::new(vec![fixture_fit()]);
        let out = evaluate(&weather(0.0, -1.0, 0.8), &fits, &identity_baseline()).unwrap();

        // heating = -s_heat·(t_bph − temp) = 2·18.3
        assert!((out.heat_mw - 36.6).abs() < 1e-12);
        assert_eq!(out.cool_mw, 0.0);
        assert!(out.heat_mw >= 0.0);
    }

    #[test]
    fn transition_band_ramps_quadratically() {
        let fit = fixture_fit();
        let baseline = identity_baseline();
        // Wet bulb chosen so the deviation at the t_bph anchor is zero.
        let mid = evaluate_fit(&fit, &baseline, 14.15, 18.3, 0.0);

        // Halfway through the band the ramp factor is 0.25 of the cooling
        // fit anchored at t_bph: 0.25·(3·18.3 + 0 − 20) = 0.25·34.9
        assert!((mid.cool_mw - 0.25 * 34.9).abs() < 1e-12);
    }

    #[test]
    fn continuous_at_warm_breakpoint() {
        let fit = fixture_fit();
        let baseline = identity_baseline();
        let just_below = evaluate_fit(&fit, &baseline, 18.3 - 1e-9, 18.0, 0.3);
        let at_bph = evaluate_fit(&fit, &baseline, 18.3, 18.0, 0.3);
        assert!((just_below.cool_mw - at_bph.cool_mw).abs() < 1e-6);
        assert!((just_below.total() - at_bph.total()).abs() < 1e-6);
    }

    #[test]
    fn cooling_and_heating_never_negative() {
        let fits = SegmentFitTable::new(vec![fixture_fit()]);
        let baseline = identity_baseline();
        let mut t = -30.0;
        while t <= 45.0 {
            let out = evaluate(&weather(t, t - 2.0, 0.5), &fits, &baseline).unwrap();
            assert!(out.heat_mw >= 0.0, "heating negative at {t}");
            assert!(out.cool_mw >= 0.0, "cooling negative at {t}");
            t += 0.25;
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let fits = SegmentFitTable::new(vec![fixture_fit()]);
        let baseline = identity_baseline();
        let w = weather(21.7, 19.2, 0.42);
        let a = evaluate(&w, &fits, &baseline).unwrap();
        let b = evaluate(&w, &fits, &baseline).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_slot_reports_identity() {
        let fits = SegmentFitTable::new(vec![fixture_fit()]);
        let mut w = weather(20.0, 18.0, 0.0);
        w.hour_local = 3;
        let err = evaluate(&w, &fits, &identity_baseline()).unwrap_err();
        assert_eq!(
            err,
            FitError::MissingFit {
                hour: 3,
                day_type: DayType::Weekday
            }
        );
    }
}
