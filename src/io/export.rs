//! Export fitted coefficients, synthesized profiles, and validation stats
//! to CSV.
//!
//! The coefficient export is a wide table, one row per hour with weekday and
//! weekend columns side by side, which is the layout downstream profile
//! tooling expects. Rendering is separated from file writing so the layouts
//! stay testable.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{DayType, ProfileRow, ProfileStats, SegmentFit, SegmentFitTable};
use crate::error::FitError;

/// Write the wide per-hour coefficient CSV.
pub fn write_fit_csv(path: &Path, table: &SegmentFitTable) -> Result<(), FitError> {
    write_text(path, &render_fit_csv(table))
}

/// Write the synthesized hourly profile CSV.
pub fn write_profile_csv(path: &Path, rows: &[ProfileRow]) -> Result<(), FitError> {
    write_text(path, &render_profile_csv(rows))
}

/// Write the one-row validation stats CSV.
pub fn write_stats_csv(path: &Path, stats: &ProfileStats) -> Result<(), FitError> {
    write_text(path, &render_stats_csv(stats))
}

fn write_text(path: &Path, text: &str) -> Result<(), FitError> {
    let mut file = File::create(path).map_err(|e| {
        FitError::Export(format!("Failed to create '{}': {e}", path.display()))
    })?;
    file.write_all(text.as_bytes())
        .map_err(|e| FitError::Export(format!("Failed to write '{}': {e}", path.display())))
}

/// Per-day-type column group of the wide coefficient CSV.
const FIT_COLUMNS: [&str; 20] = [
    "t.bpc.{}.c",
    "t.bph.{}.c",
    "i.heat.{}",
    "s.heat.{}",
    "s.dark.{}",
    "i.cool.{}",
    "s.cool.{}.db",
    "s.cool.{}.wb",
    "s.heat.stderr.{}",
    "s.dark.stderr.{}",
    "n.heat.{}",
    "s.cool.db.stderr.{}",
    "s.cool.wb.stderr.{}",
    "n.cool.{}",
    "mrae.heat.{}.mw",
    "mrae.cool.{}.mw",
    "mrae.mid.{}.mw",
    "r2.heat.{}",
    "r2.cool.{}",
    "model.{}",
];

pub fn render_fit_csv(table: &SegmentFitTable) -> String {
    let mut out = String::from("hour");
    for day_type in DayType::ALL {
        for column in FIT_COLUMNS {
            out.push(',');
            out.push_str(&column.replace("{}", day_type.label()));
        }
    }
    out.push('\n');

    for hour in 0..24u8 {
        out.push_str(&hour.to_string());
        for day_type in DayType::ALL {
            match table.get(hour, day_type) {
                Some(fit) => push_fit_cells(&mut out, fit),
                // Unfit slot: keep the row shape, leave the group empty.
                None => out.push_str(&",".repeat(FIT_COLUMNS.len())),
            }
        }
        out.push('\n');
    }
    out
}

fn push_fit_cells(out: &mut String, fit: &SegmentFit) {
    let cells = [
        fmt(fit.t_bpc),
        fmt(fit.t_bph),
        fmt(fit.i_heat),
        fmt(fit.s_heat),
        fmt(fit.s_dark),
        fmt(fit.i_cool),
        fmt(fit.s_cool_db),
        fmt(fit.s_cool_wb),
        fmt(fit.s_heat_stderr),
        fmt(fit.s_dark_stderr),
        fit.n_heat.to_string(),
        fmt(fit.s_cool_db_stderr),
        fmt(fit.s_cool_wb_stderr),
        fit.n_cool.to_string(),
        fmt(fit.mrae_heat),
        fmt(fit.mrae_cool),
        fmt(fit.mrae_mid),
        fmt(fit.r2_heat),
        fmt(fit.r2_cool),
        fit.heat_model.display_name().to_string(),
    ];
    for cell in cells {
        out.push(',');
        out.push_str(&cell);
    }
}

// NaN diagnostics export as empty cells, not the string "NaN".
fn fmt(v: f64) -> String {
    if v.is_finite() { format!("{v:.6}") } else { String::new() }
}

pub fn render_profile_csv(rows: &[ProfileRow]) -> String {
    let mut out = String::from("hour_utc,base_load_mw,heat_load_mw,cool_load_mw,total_load_mw\n");
    for row in rows {
        out.push_str(&format!(
            "{},{:.4},{:.4},{:.4},{:.4}\n",
            row.hour_utc, row.base_load_mw, row.heat_load_mw, row.cool_load_mw, row.total_load_mw
        ));
    }
    out
}

pub fn render_stats_csv(stats: &ProfileStats) -> String {
    format!(
        "mrae_avg_%,mrae_max_%,nrmsd_%,avg_profile_load_mw,avg_actual_load_mw,max_profile_load_mw,max_actual_load_mw\n\
         {:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}\n",
        100.0 * stats.mrae_avg,
        100.0 * stats.mrae_max,
        100.0 * stats.nrmsd,
        stats.avg_profile_mw,
        stats.avg_actual_mw,
        stats.max_profile_mw,
        stats.max_actual_mw,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HeatModelKind;

    fn one_fit(hour: u8, day_type: DayType) -> SegmentFit {
        SegmentFit {
            hour,
            day_type,
            t_bpc: 10.0,
            t_bph: 18.3,
            s_heat: -2.0,
            s_dark: 5.0,
            i_heat: 40.0,
            heat_model: HeatModelKind::TempDark,
            s_cool_db: 3.0,
            s_cool_wb: 1.5,
            i_cool: -20.0,
            s_heat_stderr: 0.1,
            s_dark_stderr: 0.2,
            n_heat: 60,
            r2_heat: 0.99,
            s_cool_db_stderr: 0.05,
            s_cool_wb_stderr: 0.06,
            n_cool: 40,
            r2_cool: 0.98,
            mrae_heat: 0.01,
            mrae_cool: 0.02,
            mrae_mid: f64::NAN,
        }
    }

    #[test]
    fn fit_csv_has_24_rows_and_wide_header() {
        let table = SegmentFitTable::new(vec![one_fit(3, DayType::Weekday)]);
        let csv = render_fit_csv(&table);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 25);
        assert!(lines[0].starts_with("hour,t.bpc.wk.c,t.bph.wk.c,i.heat.wk"));
        assert!(lines[0].contains("t.bpc.wknd.c"));
        assert!(lines[0].contains("mrae.mid.wk.mw"));
        // Every row has the same cell count as the header.
        let width = lines[0].split(',').count();
        for line in &lines {
            assert_eq!(line.split(',').count(), width);
        }
    }

    #[test]
    fn fitted_and_missing_slots_render_correctly() {
        let table = SegmentFitTable::new(vec![one_fit(3, DayType::Weekday)]);
        let csv = render_fit_csv(&table);
        let row3 = csv.lines().nth(4).unwrap();
        assert!(row3.starts_with("3,10.000000,18.300000,40.000000,-2.000000"));
        // The weekend group of hour 3 is all empty cells.
        assert!(row3.ends_with(&",".repeat(FIT_COLUMNS.len())));
        // NaN transition diagnostic renders as an empty cell.
        assert!(row3.contains(",0.010000,0.020000,,0.990000,"));
        assert!(row3.contains("temp+dark"));
    }

    #[test]
    fn profile_csv_layout() {
        let rows = vec![ProfileRow {
            hour_utc: 0,
            base_load_mw: 3.9,
            heat_load_mw: 0.0,
            cool_load_mw: 55.0,
            total_load_mw: 58.9,
        }];
        let csv = render_profile_csv(&rows);
        assert_eq!(
            csv,
            "hour_utc,base_load_mw,heat_load_mw,cool_load_mw,total_load_mw\n\
             0,3.9000,0.0000,55.0000,58.9000\n"
        );
    }

    #[test]
    fn stats_csv_scales_ratios_to_percent() {
        let stats = ProfileStats {
            mrae_avg: 0.05,
            mrae_max: 0.2,
            nrmsd: 0.07,
            avg_profile_mw: 100.0,
            max_profile_mw: 180.0,
            avg_actual_mw: 102.0,
            max_actual_mw: 185.0,
        };
        let csv = render_stats_csv(&stats);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "mrae_avg_%,mrae_max_%,nrmsd_%,avg_profile_load_mw,avg_actual_load_mw,\
             max_profile_load_mw,max_actual_load_mw"
        );
        // Averages precede maxima, profile before actual within each pair.
        assert_eq!(
            lines[1],
            "5.0000,20.0000,7.0000,100.0000,102.0000,180.0000,185.0000"
        );
    }
}
