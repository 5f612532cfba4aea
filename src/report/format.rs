//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fitting and evaluation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{DryBulbWetBulbFit, ProfileStats, SegmentFit, SlotKey};
use crate::error::FitError;
use crate::report::DayTypeSummary;

/// Format the full fit summary (dataset stats + baseline + per-day-type
/// segment diagnostics).
pub fn format_fit_summary(
    zone: &str,
    year: i32,
    n_obs: usize,
    baseline: &DryBulbWetBulbFit,
    summaries: &[DayTypeSummary],
    skipped: &[(SlotKey, FitError)],
) -> String {
    let mut out = String::new();

    out.push_str("=== lc - Segmented Load Curve Fit ===\n");
    out.push_str(&format!("Zone: {zone}\n"));
    out.push_str(&format!("Year: {year}\n"));
    out.push_str(&format!("Observations: n={n_obs}\n"));
    out.push_str(&format!(
        "Wet-bulb baseline: wb = {:.6}*t^2 + {:.6}*t + {:.6}\n",
        baseline.a, baseline.b, baseline.c
    ));

    out.push_str("\nSegment diagnostics:\n");
    for s in summaries {
        out.push_str(&format!(
            "  {:<5} slots={:<2} degraded={:<2} t_bpc=[{:.1}, {:.1}] t_bph=[{:.1}, {:.1}]\n",
            s.day_type.label(),
            s.slots,
            s.degraded_slots,
            s.t_bpc_range.0,
            s.t_bpc_range.1,
            s.t_bph_range.0,
            s.t_bph_range.1,
        ));
        out.push_str(&format!(
            "        MRAE heat={:.4} cool={:.4} mid={:.4}\n",
            s.mrae_heat_avg, s.mrae_cool_avg, s.mrae_mid_avg,
        ));
        if s.degrades_positive_heat + s.degrades_negative_dark + s.degrades_low_dark_variation > 0
        {
            out.push_str(&format!(
                "        degrades: positive-heat-slope={} negative-dark-slope={} low-dark-variation={}\n",
                s.degrades_positive_heat, s.degrades_negative_dark, s.degrades_low_dark_variation,
            ));
        }
    }

    for (key, reason) in skipped {
        out.push_str(&format!(
            "  (skipped h{:02} {}) {reason}\n",
            key.hour,
            key.day_type.label()
        ));
    }

    out
}

/// Format the per-slot coefficient table.
pub fn format_fit_table(rows: &[SegmentFit]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<4} {:<5} {:>7} {:>7} {:>8} {:>8} {:>8} {:<9} {:>8} {:>8} {:>9}\n",
        "hour", "day", "t_bpc", "t_bph", "s_heat", "s_dark", "i_heat", "model", "s_cl_db",
        "s_cl_wb", "i_cool"
    ));
    out.push_str(&format!(
        "{:-<4} {:-<5} {:-<7} {:-<7} {:-<8} {:-<8} {:-<8} {:-<9} {:-<8} {:-<8} {:-<9}\n",
        "", "", "", "", "", "", "", "", "", "", ""
    ));
    for fit in rows {
        out.push_str(&format!(
            "{:<4} {:<5} {:>7.2} {:>7.2} {:>8.3} {:>8.3} {:>8.2} {:<9} {:>8.3} {:>8.3} {:>9.2}\n",
            fit.hour,
            fit.day_type.label(),
            fit.t_bpc,
            fit.t_bph,
            fit.s_heat,
            fit.s_dark,
            fit.i_heat,
            fit.heat_model.display_name(),
            fit.s_cool_db,
            fit.s_cool_wb,
            fit.i_cool,
        ));
    }
    out
}

/// Format the profile-validation block.
pub fn format_profile_stats(stats: &ProfileStats) -> String {
    let mut out = String::new();
    out.push_str("Profile validation:\n");
    out.push_str(&format!("- MRAE avg : {:.2}%\n", 100.0 * stats.mrae_avg));
    out.push_str(&format!("- MRAE max : {:.2}%\n", 100.0 * stats.mrae_max));
    out.push_str(&format!("- NRMSD    : {:.2}%\n", 100.0 * stats.nrmsd));
    out.push_str(&format!(
        "- Profile  : avg={:.1} MW max={:.1} MW\n",
        stats.avg_profile_mw, stats.max_profile_mw
    ));
    out.push_str(&format!(
        "- Actual   : avg={:.1} MW max={:.1} MW\n",
        stats.avg_actual_mw, stats.max_actual_mw
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayType;

    #[test]
    fn fit_summary_mentions_zone_and_skips() {
        let baseline = DryBulbWetBulbFit {
            a: -0.002,
            b: 0.9,
            c: -1.5,
        };
        let summaries = vec![DayTypeSummary {
            day_type: DayType::Weekday,
            slots: 24,
            degraded_slots: 1,
            degrades_positive_heat: 1,
            degrades_negative_dark: 0,
            degrades_low_dark_variation: 0,
            t_bpc_range: (8.0, 10.0),
            t_bph_range: (18.3, 21.0),
            mrae_heat_avg: 0.01,
            mrae_cool_avg: 0.02,
            mrae_mid_avg: 0.03,
        }];
        let skipped = vec![(
            SlotKey {
                hour: 4,
                day_type: DayType::Weekend,
            },
            FitError::InsufficientData {
                hour: 4,
                day_type: DayType::Weekend,
                have: 3,
                need: 20,
            },
        )];

        let text = format_fit_summary("demo", 2019, 8760, &baseline, &summaries, &skipped);
        assert!(text.contains("Zone: demo"));
        assert!(text.contains("wk "));
        assert!(text.contains("positive-heat-slope=1"));
        assert!(text.contains("skipped h04 wknd"));
    }

    #[test]
    fn profile_stats_render_as_percentages() {
        let stats = ProfileStats {
            mrae_avg: 0.0512,
            mrae_max: 0.2,
            nrmsd: 0.07,
            avg_profile_mw: 100.0,
            max_profile_mw: 180.0,
            avg_actual_mw: 102.0,
            max_actual_mw: 185.0,
        };
        let text = format_profile_stats(&stats);
        assert!(text.contains("MRAE avg : 5.12%"));
        assert!(text.contains("avg=100.0 MW"));
    }
}
