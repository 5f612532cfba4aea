use crate::domain::DayType;

/// Errors produced by the fitting and evaluation pipeline.
///
/// Each variant carries enough identity (hour, day-type) for the caller to
/// log and decide whether to skip or halt. Exit codes group the variants the
/// way the `lc` binary reports them:
///
/// - 2: configuration / export problems
/// - 3: not enough data to fit
/// - 4: numeric failure or model/index mismatch
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// A slot has fewer observations than the fit minimum, even before
    /// breakpoint widening could apply.
    InsufficientData {
        hour: u8,
        day_type: DayType,
        have: usize,
        need: usize,
    },
    /// The OLS solution for a segment is undefined (singular or non-finite).
    DegenerateFit {
        hour: u8,
        day_type: DayType,
        segment: &'static str,
    },
    /// The zone-wide dry-bulb/wet-bulb baseline cannot be fit.
    DegenerateBaseline { have: usize },
    /// An observation offered for fitting has no load value.
    MissingLoad { hour: u8, day_type: DayType },
    /// Evaluation requested a slot with no fitted row.
    MissingFit { hour: u8, day_type: DayType },
    /// Profile and actual-load series have different lengths.
    LengthMismatch { profile: usize, actual: usize },
    /// Every one of the 48 slots failed to fit.
    NoFittableSlots,
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// An export file could not be written.
    Export(String),
}

impl FitError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::InvalidConfig(_) | FitError::Export(_) => 2,
            FitError::InsufficientData { .. } | FitError::NoFittableSlots => 3,
            FitError::DegenerateFit { .. }
            | FitError::DegenerateBaseline { .. }
            | FitError::MissingLoad { .. }
            | FitError::MissingFit { .. }
            | FitError::LengthMismatch { .. } => 4,
        }
    }
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::InsufficientData {
                hour,
                day_type,
                have,
                need,
            } => write!(
                f,
                "Insufficient data for hour {hour} ({}): {have} observations, need {need}.",
                day_type.label()
            ),
            FitError::DegenerateFit {
                hour,
                day_type,
                segment,
            } => write!(
                f,
                "Degenerate {segment} fit for hour {hour} ({}).",
                day_type.label()
            ),
            FitError::DegenerateBaseline { have } => write!(
                f,
                "Cannot fit dry-bulb/wet-bulb baseline from {have} observations."
            ),
            FitError::MissingLoad { hour, day_type } => write!(
                f,
                "Observation without load offered for fitting at hour {hour} ({}).",
                day_type.label()
            ),
            FitError::MissingFit { hour, day_type } => write!(
                f,
                "No fitted segment row for hour {hour} ({}).",
                day_type.label()
            ),
            FitError::LengthMismatch { profile, actual } => write!(
                f,
                "Profile has {profile} hours but actual load has {actual}."
            ),
            FitError::NoFittableSlots => write!(f, "No hour/day-type slot could be fit."),
            FitError::InvalidConfig(msg) => write!(f, "{msg}"),
            FitError::Export(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FitError {}
