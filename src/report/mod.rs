//! Reporting utilities: fit-table summaries and formatted terminal output.

pub mod format;

use crate::domain::{DayType, SegmentFitTable};
use crate::fit::{DegradeReason, SegmentFitOutcome};

/// Aggregate view of the fitted slots for one day type.
#[derive(Debug, Clone)]
pub struct DayTypeSummary {
    pub day_type: DayType,
    pub slots: usize,
    pub degraded_slots: usize,
    pub degrades_positive_heat: usize,
    pub degrades_negative_dark: usize,
    pub degrades_low_dark_variation: usize,
    pub t_bpc_range: (f64, f64),
    pub t_bph_range: (f64, f64),
    pub mrae_heat_avg: f64,
    pub mrae_cool_avg: f64,
    pub mrae_mid_avg: f64,
}

/// Summarize a fit outcome per day type.
pub fn summarize_fits(outcome: &SegmentFitOutcome) -> Vec<DayTypeSummary> {
    DayType::ALL
        .iter()
        .filter_map(|&day_type| summarize_day_type(&outcome.table, outcome, day_type))
        .collect()
}

fn summarize_day_type(
    table: &SegmentFitTable,
    outcome: &SegmentFitOutcome,
    day_type: DayType,
) -> Option<DayTypeSummary> {
    let rows: Vec<_> = table.rows().iter().filter(|f| f.day_type == day_type).collect();
    if rows.is_empty() {
        return None;
    }

    let mut summary = DayTypeSummary {
        day_type,
        slots: rows.len(),
        degraded_slots: 0,
        degrades_positive_heat: 0,
        degrades_negative_dark: 0,
        degrades_low_dark_variation: 0,
        t_bpc_range: (f64::INFINITY, f64::NEG_INFINITY),
        t_bph_range: (f64::INFINITY, f64::NEG_INFINITY),
        mrae_heat_avg: 0.0,
        mrae_cool_avg: 0.0,
        mrae_mid_avg: 0.0,
    };

    for fit in &rows {
        summary.t_bpc_range.0 = summary.t_bpc_range.0.min(fit.t_bpc);
        summary.t_bpc_range.1 = summary.t_bpc_range.1.max(fit.t_bpc);
        summary.t_bph_range.0 = summary.t_bph_range.0.min(fit.t_bph);
        summary.t_bph_range.1 = summary.t_bph_range.1.max(fit.t_bph);
        summary.mrae_heat_avg += nan_to_zero(fit.mrae_heat);
        summary.mrae_cool_avg += nan_to_zero(fit.mrae_cool);
        summary.mrae_mid_avg += nan_to_zero(fit.mrae_mid);
    }
    summary.mrae_heat_avg /= rows.len() as f64;
    summary.mrae_cool_avg /= rows.len() as f64;
    summary.mrae_mid_avg /= rows.len() as f64;

    for (key, degrades) in &outcome.degrades {
        if key.day_type != day_type || degrades.is_empty() {
            continue;
        }
        summary.degraded_slots += 1;
        for degrade in degrades {
            match degrade.reason {
                DegradeReason::PositiveHeatSlope => summary.degrades_positive_heat += 1,
                DegradeReason::NegativeDarkSlope => summary.degrades_negative_dark += 1,
                DegradeReason::LowDarkVariation => summary.degrades_low_dark_variation += 1,
            }
        }
    }

    Some(summary)
}

fn nan_to_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
