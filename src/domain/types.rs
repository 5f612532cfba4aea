//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for profile synthesis over other weather years

use serde::{Deserialize, Serialize};

/// One hour of zonal weather (and, for the fitting year, observed load).
///
/// The aggregation that produces these rows (population weighting of
/// sub-zone series, timezone localization) happens upstream; the core
/// consumes the already-assembled table.
#[derive(Debug, Clone, Copy)]
pub struct HourlyObservation {
    /// Dry-bulb temperature (°C).
    pub temp_c: f64,
    /// Wet-bulb temperature (°C).
    pub temp_c_wb: f64,
    /// Fraction of the hour after sunset / before sunrise, in [0, 1].
    pub hourly_dark_frac: f64,
    /// Local hour of day, 0..=23.
    pub hour_local: u8,
    /// Local day of week, 0 = Monday .. 6 = Sunday.
    pub weekday: u8,
    pub holiday: bool,
    /// Observed demand (MW). Present only for the fitting year.
    pub load_mw: Option<f64>,
}

impl HourlyObservation {
    pub fn day_type(&self) -> DayType {
        DayType::of(self.weekday, self.holiday)
    }
}

/// Weekday vs. weekend/holiday partition.
///
/// Fitting and evaluation must derive this identically, so the rule lives in
/// exactly one place (`DayType::of`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub const ALL: [DayType; 2] = [DayType::Weekday, DayType::Weekend];

    /// Partition rule: weekday = Mon..Fri and not a holiday.
    pub fn of(weekday: u8, holiday: bool) -> DayType {
        if weekday < 5 && !holiday {
            DayType::Weekday
        } else {
            DayType::Weekend
        }
    }

    /// Column-name token used in the wide coefficient CSV.
    pub fn label(self) -> &'static str {
        match self {
            DayType::Weekday => "wk",
            DayType::Weekend => "wknd",
        }
    }

    /// Number of days of the week contributing to this partition.
    pub fn days_per_week(self) -> usize {
        match self {
            DayType::Weekday => 5,
            DayType::Weekend => 2,
        }
    }
}

/// Identity of one of the 48 fitted slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub hour: u8,
    pub day_type: DayType,
}

impl SlotKey {
    /// All 48 slots in deterministic (hour, day-type) order.
    pub fn all() -> Vec<SlotKey> {
        let mut keys = Vec::with_capacity(48);
        for hour in 0..24u8 {
            for day_type in DayType::ALL {
                keys.push(SlotKey { hour, day_type });
            }
        }
        keys
    }
}

/// Quadratic relation from dry-bulb to expected wet-bulb temperature:
/// `temp_wb_expected = a·temp² + b·temp + c`.
///
/// Fit once per zone and shared read-only by every cooling-segment fit and
/// by evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DryBulbWetBulbFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl DryBulbWetBulbFit {
    pub fn expected_wb(&self, temp_c: f64) -> f64 {
        self.a * temp_c * temp_c + self.b * temp_c + self.c
    }

    /// Humidity-driven explanatory variable: how far the observed wet-bulb
    /// temperature sits above the dry-bulb expectation.
    pub fn wb_diff(&self, temp_c: f64, temp_c_wb: f64) -> f64 {
        temp_c_wb - self.expected_wb(temp_c)
    }
}

/// Terminal model of the heating-segment fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatModelKind {
    /// `load ~ temp + dark + 1`
    TempDark,
    /// `load ~ dark + 1` (heating slope dropped)
    DarkOnly,
    /// `load ~ temp + 1` (darkness effect dropped)
    TempOnly,
    /// `load ~ 1` (mean load)
    Constant,
}

impl HeatModelKind {
    pub fn display_name(self) -> &'static str {
        match self {
            HeatModelKind::TempDark => "temp+dark",
            HeatModelKind::DarkOnly => "dark-only",
            HeatModelKind::TempOnly => "temp-only",
            HeatModelKind::Constant => "constant",
        }
    }
}

/// Fitted coefficients and diagnostics for one (hour, day-type) slot.
///
/// Invariants, enforced by the fitter:
/// - `s_heat <= 0`, `s_dark >= 0`
/// - `t_bpc <= t_bph`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentFit {
    pub hour: u8,
    pub day_type: DayType,

    /// Colder bound of the transition band (°C).
    pub t_bpc: f64,
    /// Warmer bound of the transition band (°C); heating applies below it.
    pub t_bph: f64,

    pub s_heat: f64,
    pub s_dark: f64,
    pub i_heat: f64,
    pub heat_model: HeatModelKind,

    pub s_cool_db: f64,
    pub s_cool_wb: f64,
    pub i_cool: f64,

    pub s_heat_stderr: f64,
    pub s_dark_stderr: f64,
    pub n_heat: usize,
    pub r2_heat: f64,

    pub s_cool_db_stderr: f64,
    pub s_cool_wb_stderr: f64,
    pub n_cool: usize,
    pub r2_cool: f64,

    /// Mean relative absolute error on the heat-side subset.
    #[serde(default = "nan", skip_serializing_if = "is_nan")]
    pub mrae_heat: f64,
    /// Mean relative absolute error on the cool-side subset (`temp >= t_bph`).
    #[serde(default = "nan", skip_serializing_if = "is_nan")]
    pub mrae_cool: f64,
    /// Mean relative absolute error on the transition band. NaN if empty.
    #[serde(default = "nan", skip_serializing_if = "is_nan")]
    pub mrae_mid: f64,
}

// serde hooks: NaN diagnostics are omitted on write and restored on read,
// since JSON has no NaN literal.
fn nan() -> f64 {
    f64::NAN
}

fn is_nan(v: &f64) -> bool {
    v.is_nan()
}

/// Fitted rows for the 24 × 2 slots of one zone, in (hour, day-type) order.
///
/// Slots that failed to fit are simply absent; lookups report the miss.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentFitTable {
    rows: Vec<SegmentFit>,
}

impl SegmentFitTable {
    pub fn new(mut rows: Vec<SegmentFit>) -> SegmentFitTable {
        rows.sort_by_key(|r| (r.hour, r.day_type));
        SegmentFitTable { rows }
    }

    pub fn get(&self, hour: u8, day_type: DayType) -> Option<&SegmentFit> {
        self.rows
            .iter()
            .find(|r| r.hour == hour && r.day_type == day_type)
    }

    pub fn rows(&self) -> &[SegmentFit] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Immutable model parameters for one zone: everything evaluation needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneModel {
    pub baseline: DryBulbWetBulbFit,
    pub fits: SegmentFitTable,
}

/// On-disk JSON schema for a fitted zone model.
///
/// The "portable" representation of a fit: model parameters plus the run
/// metadata needed to interpret them later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub zone: String,
    pub year: i32,
    pub baseline: DryBulbWetBulbFit,
    pub fits: SegmentFitTable,
}

/// Energy decomposition for a single hour (MW).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyComponents {
    pub base_mw: f64,
    pub heat_mw: f64,
    pub cool_mw: f64,
}

impl EnergyComponents {
    pub fn total(&self) -> f64 {
        self.base_mw + self.heat_mw + self.cool_mw
    }
}

/// One synthesized hour of the output profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProfileRow {
    pub hour_utc: usize,
    pub base_load_mw: f64,
    pub heat_load_mw: f64,
    pub cool_load_mw: f64,
    pub total_load_mw: f64,
}

/// Fit-quality statistics of a synthesized profile against observed load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProfileStats {
    pub mrae_avg: f64,
    pub mrae_max: f64,
    /// Root-mean-square deviation divided by mean observed load.
    pub nrmsd: f64,
    pub avg_profile_mw: f64,
    pub avg_actual_mw: f64,
    pub max_profile_mw: f64,
    pub max_actual_mw: f64,
}

/// Fitting-time constants, passed explicitly so slot fits stay deterministic
/// and free of ambient state.
#[derive(Debug, Clone, Copy)]
pub struct FitterConfig {
    /// Seed for the heat-side breakpoint (colder transition bound), °C.
    pub t_bpc_seed_c: f64,
    /// Seed for the cool-side breakpoint (warmer transition bound), °C.
    pub t_bph_seed_c: f64,
    /// Minimum observations per contributing day of the week.
    pub daily_points: usize,
    /// Minimum observed range of the dark fraction for the darkness slope
    /// to be considered identifiable.
    pub dark_range_min: f64,
}

impl Default for FitterConfig {
    fn default() -> FitterConfig {
        FitterConfig {
            t_bpc_seed_c: 10.0,
            t_bph_seed_c: 18.3,
            daily_points: 10,
            dark_range_min: 0.3,
        }
    }
}

impl FitterConfig {
    /// Minimum sample size for a slot: 10 points per contributing day,
    /// i.e. 50 for weekdays and 20 for weekend/holiday.
    pub fn min_count(&self, day_type: DayType) -> usize {
        self.daily_points * day_type.days_per_week()
    }

    pub fn validate(&self) -> Result<(), crate::error::FitError> {
        if !(self.t_bpc_seed_c.is_finite() && self.t_bph_seed_c.is_finite()) {
            return Err(crate::error::FitError::InvalidConfig(
                "Breakpoint seeds must be finite.".to_string(),
            ));
        }
        if self.t_bpc_seed_c > self.t_bph_seed_c {
            return Err(crate::error::FitError::InvalidConfig(format!(
                "Heat-side seed ({}) must not exceed cool-side seed ({}).",
                self.t_bpc_seed_c, self.t_bph_seed_c
            )));
        }
        if self.daily_points == 0 {
            return Err(crate::error::FitError::InvalidConfig(
                "daily_points must be > 0.".to_string(),
            ));
        }
        if !(self.dark_range_min.is_finite() && self.dark_range_min >= 0.0) {
            return Err(crate::error::FitError::InvalidConfig(
                "dark_range_min must be finite and >= 0.".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_type_partition_matches_rule() {
        assert_eq!(DayType::of(0, false), DayType::Weekday);
        assert_eq!(DayType::of(4, false), DayType::Weekday);
        assert_eq!(DayType::of(5, false), DayType::Weekend);
        assert_eq!(DayType::of(6, true), DayType::Weekend);
        // A holiday falling on a Wednesday counts as weekend.
        assert_eq!(DayType::of(2, true), DayType::Weekend);
    }

    #[test]
    fn min_count_is_ten_points_per_day() {
        let config = FitterConfig::default();
        assert_eq!(config.min_count(DayType::Weekday), 50);
        assert_eq!(config.min_count(DayType::Weekend), 20);
    }

    #[test]
    fn table_lookup_by_slot() {
        let row = SegmentFit {
            hour: 7,
            day_type: DayType::Weekend,
            t_bpc: 10.0,
            t_bph: 18.3,
            s_heat: -1.0,
            s_dark: 0.5,
            i_heat: 30.0,
            heat_model: HeatModelKind::TempDark,
            s_cool_db: 2.0,
            s_cool_wb: 1.0,
            i_cool: -30.0,
            s_heat_stderr: 0.1,
            s_dark_stderr: 0.1,
            n_heat: 20,
            r2_heat: 0.9,
            s_cool_db_stderr: 0.1,
            s_cool_wb_stderr: 0.1,
            n_cool: 20,
            r2_cool: 0.9,
            mrae_heat: 0.01,
            mrae_cool: 0.02,
            mrae_mid: 0.03,
        };
        let table = SegmentFitTable::new(vec![row]);
        assert!(table.get(7, DayType::Weekend).is_some());
        assert!(table.get(7, DayType::Weekday).is_none());
        assert!(table.get(8, DayType::Weekend).is_none());
    }

    #[test]
    fn config_validation_rejects_crossed_seeds() {
        let config = FitterConfig {
            t_bpc_seed_c: 20.0,
            t_bph_seed_c: 18.3,
            ..FitterConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
