//! Synthetic zone-year weather and load.
//!
//! The generator produces one `HourlyObservation` per hour of a calendar
//! year for a fictional load zone:
//!
//! - dry-bulb temperature: seasonal + diurnal sinusoids plus Gaussian noise
//! - wet-bulb temperature: a quadratic depression of the dry-bulb value plus
//!   a humidity disturbance (this is exactly the structure the baseline
//!   fitter assumes, so recovery is testable)
//! - dark fraction: overlap of each hour with a season-dependent night
//! - calendar: chrono weekdays plus a small US-federal-style holiday set
//! - load: a known piecewise heating/cooling model with hour-of-day shape
//!   and multiplicative noise
//!
//! Everything is driven by a `StdRng` seeded from a hash of the
//! configuration, so identical configs reproduce identical years.

use std::collections::hash_map::DefaultHasher;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{DayType, HourlyObservation};
use crate::error::FitError;

/// Configuration for generating one synthetic zone-year.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub zone: String,
    pub year: i32,
    pub seed: u64,
    /// Annual mean dry-bulb temperature (°C).
    pub mean_temp_c: f64,
    /// Half-amplitude of the seasonal temperature swing (°C).
    pub seasonal_swing_c: f64,
    /// Half-amplitude of the diurnal temperature swing (°C).
    pub diurnal_swing_c: f64,
    /// Standard deviation of hourly temperature noise (°C).
    pub temp_noise_c: f64,
    /// Relative standard deviation of load noise.
    pub load_noise: f64,
    /// Whether to attach observed load (fitting year) or leave it absent.
    pub with_load: bool,
}

impl Default for SampleConfig {
    fn default() -> SampleConfig {
        SampleConfig {
            zone: "demo".to_string(),
            year: 2019,
            seed: 42,
            mean_temp_c: 12.0,
            seasonal_swing_c: 14.0,
            diurnal_swing_c: 5.0,
            temp_noise_c: 2.5,
            load_noise: 0.02,
            with_load: true,
        }
    }
}

/// A generated zone-year.
#[derive(Debug, Clone)]
pub struct SampleData {
    pub zone: String,
    pub year: i32,
    pub weather: Vec<HourlyObservation>,
}

impl SampleData {
    /// Observed load series, for validation against the synthesized profile.
    pub fn actual_load(&self) -> Option<Vec<f64>> {
        self.weather.iter().map(|w| w.load_mw).collect()
    }
}

// Ground-truth piecewise model the synthetic load follows. The warm
// breakpoint matches the fitter's cool-side seed so recovered coefficients
// are directly comparable.
const TRUE_T_BPC: f64 = 10.0;
const TRUE_T_BPH: f64 = 18.3;
const TRUE_S_HEAT: f64 = -2.4;
const TRUE_S_DARK: f64 = 6.0;
const TRUE_S_COOL_DB: f64 = 3.2;
const TRUE_S_COOL_WB: f64 = 1.2;

// Wet-bulb depression quadratic: wb = temp − (d0 + d1·temp + d2·temp²).
const WB_D0: f64 = 1.2;
const WB_D1: f64 = 0.05;
const WB_D2: f64 = 0.004;

/// Generate a synthetic zone-year.
pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, FitError> {
    if !(config.mean_temp_c.is_finite()
        && config.seasonal_swing_c.is_finite()
        && config.diurnal_swing_c.is_finite())
    {
        return Err(FitError::InvalidConfig(
            "Temperature parameters must be finite.".to_string(),
        ));
    }
    if !(config.temp_noise_c >= 0.0 && config.load_noise >= 0.0) {
        return Err(FitError::InvalidConfig(
            "Noise levels must be >= 0.".to_string(),
        ));
    }
    let jan1 = NaiveDate::from_ymd_opt(config.year, 1, 1)
        .ok_or_else(|| FitError::InvalidConfig(format!("Invalid year {}.", config.year)))?;

    let mut rng = StdRng::seed_from_u64(sample_seed(config));
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| FitError::InvalidConfig(format!("Noise distribution error: {e}")))?;

    let days = days_in_year(config.year);
    let holidays = holiday_dates(config.year);

    let mut weather = Vec::with_capacity(days * 24);
    for day in 0..days {
        let date = jan1 + Duration::days(day as i64);
        let weekday = date.weekday().num_days_from_monday() as u8;
        let holiday = holidays.contains(&date);
        // Seasonal phase: coldest in mid-January, warmest in mid-July.
        let season = -((day as f64 + 10.0) / days as f64 * 2.0 * PI).cos();

        for hour in 0..24u8 {
            // Diurnal phase: coldest around 5am, warmest around 5pm.
            let diurnal = -((hour as f64 - 5.0) / 24.0 * 2.0 * PI).cos();
            let temp_c = config.mean_temp_c
                + config.seasonal_swing_c * season
                + config.diurnal_swing_c * diurnal
                + config.temp_noise_c * normal.sample(&mut rng);

            let humidity_shift = 0.6 * normal.sample(&mut rng);
            let temp_c_wb =
                temp_c - (WB_D0 + WB_D1 * temp_c + WB_D2 * temp_c * temp_c) + humidity_shift;

            let hourly_dark_frac = dark_fraction(season, hour);

            let load_mw = if config.with_load {
                let noise = (config.load_noise * normal.sample(&mut rng)).exp();
                Some(
                    true_load(
                        temp_c,
                        humidity_shift,
                        hourly_dark_frac,
                        hour,
                        DayType::of(weekday, holiday),
                    ) * noise,
                )
            } else {
                None
            };

            weather.push(HourlyObservation {
                temp_c,
                temp_c_wb,
                hourly_dark_frac,
                hour_local: hour,
                weekday,
                holiday,
                load_mw,
            });
        }
    }

    Ok(SampleData {
        zone: config.zone.clone(),
        year: config.year,
        weather,
    })
}

/// Ground-truth load (MW) at one hour, before noise.
fn true_load(temp_c: f64, wb_diff: f64, dark_frac: f64, hour: u8, day_type: DayType) -> f64 {
    // Hour-of-day shape of the weather-independent floor, damped on weekends.
    let shape = 1.0 + 0.18 * ((hour as f64 - 17.0) / 24.0 * 2.0 * PI).cos();
    let weekend_factor = match day_type {
        DayType::Weekday => 1.0,
        DayType::Weekend => 0.88,
    };
    let i_heat = 60.0 * shape * weekend_factor - TRUE_S_HEAT * TRUE_T_BPH;
    let i_cool = -TRUE_S_COOL_DB * TRUE_T_BPH;

    let base = TRUE_S_HEAT * TRUE_T_BPH + TRUE_S_DARK * dark_frac + i_heat;
    let heat = if temp_c <= TRUE_T_BPH {
        -TRUE_S_HEAT * (TRUE_T_BPH - temp_c)
    } else {
        0.0
    };
    let mut cool = 0.0;
    if temp_c >= TRUE_T_BPH {
        cool += (TRUE_S_COOL_DB * temp_c + TRUE_S_COOL_WB * wb_diff + i_cool).max(0.0);
    }
    if temp_c > TRUE_T_BPC && temp_c < TRUE_T_BPH {
        let ramp = (temp_c - TRUE_T_BPC) / (TRUE_T_BPH - TRUE_T_BPC);
        let at_bph = TRUE_S_COOL_DB * TRUE_T_BPH + TRUE_S_COOL_WB * wb_diff + i_cool;
        cool += (ramp * ramp * at_bph).max(0.0);
    }

    base + heat + cool
}

/// Fraction of the hour [h, h+1) falling outside daylight.
///
/// Night length follows the season: long mid-winter nights, short mid-summer
/// ones, centered on a 6:00–18:00 equinox day.
fn dark_fraction(season: f64, hour: u8) -> f64 {
    let day_length = 12.0 + 3.5 * season;
    let sunrise = 12.0 - day_length / 2.0;
    let sunset = 12.0 + day_length / 2.0;

    let start = hour as f64;
    let end = start + 1.0;
    let lit = (end.min(sunset) - start.max(sunrise)).max(0.0);
    (1.0 - lit).clamp(0.0, 1.0)
}

fn days_in_year(year: i32) -> usize {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// A small fixed-and-floating holiday set: New Year's Day, Independence Day,
/// Thanksgiving, Christmas.
fn holiday_dates(year: i32) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(4);
    if let Some(d) = NaiveDate::from_ymd_opt(year, 1, 1) {
        out.push(d);
    }
    if let Some(d) = NaiveDate::from_ymd_opt(year, 7, 4) {
        out.push(d);
    }
    if let Some(d) = nth_weekday(year, 11, Weekday::Thu, 4) {
        out.push(d);
    }
    if let Some(d) = NaiveDate::from_ymd_opt(year, 12, 25) {
        out.push(d);
    }
    out
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    let mut count = 0;
    for day in 1..=31 {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        if date.weekday() == weekday {
            count += 1;
            if count == n {
                return Some(date);
            }
        }
    }
    None
}

fn sample_seed(config: &SampleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.zone.hash(&mut hasher);
    config.year.hash(&mut hasher);
    config.seed.hash(&mut hasher);
    config.mean_temp_c.to_bits().hash(&mut hasher);
    config.seasonal_swing_c.to_bits().hash(&mut hasher);
    config.diurnal_swing_c.to_bits().hash(&mut hasher);
    config.temp_noise_c.to_bits().hash(&mut hasher);
    config.load_noise.to_bits().hash(&mut hasher);
    config.with_load.hash(&mut hasher);
    hasher.finish()
}
