//! Breakpoint widening.
//!
//! A candidate temperature threshold can strand a slot with too few
//! observations to regress on (a mild-climate zone may see very few hours
//! below the heating seed at 3pm, say). Instead of failing, the threshold is
//! discarded and the `min_count` most extreme observations are taken; the
//! effective breakpoint moves to the edge of that subset.

use crate::domain::HourlyObservation;

/// Which temperature tail a segment fit consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Heating regime: observations with `temp_c <= bkpt` (cold tail).
    Heat,
    /// Cooling regime: observations with `temp_c >= bkpt` (warm tail).
    Cool,
}

/// Filter `rows` by `bkpt` on the given side, widening the threshold if the
/// filtered subset is smaller than `min_count`.
///
/// Returns the subset (in original row order) and the effective breakpoint.
/// Whenever `rows.len() >= min_count`, the subset has size
/// `max(min_count, count passing the threshold test)`. Ties at the widened
/// boundary are broken by original row order.
pub fn adjust(
    rows: &[HourlyObservation],
    min_count: usize,
    bkpt: f64,
    side: Side,
) -> (Vec<HourlyObservation>, f64) {
    let passing: Vec<HourlyObservation> = rows
        .iter()
        .filter(|r| match side {
            Side::Heat => r.temp_c <= bkpt,
            Side::Cool => r.temp_c >= bkpt,
        })
        .copied()
        .collect();

    if passing.len() >= min_count {
        return (passing, bkpt);
    }

    // Not enough points on this side: take the min_count most extreme
    // temperatures instead. Stable sort keeps the tie-break deterministic.
    let take = min_count.min(rows.len());
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| {
        rows[a]
            .temp_c
            .partial_cmp(&rows[b].temp_c)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut picked: Vec<usize> = match side {
        Side::Heat => order[..take].to_vec(),
        Side::Cool => order[rows.len() - take..].to_vec(),
    };
    // Restore original row order within the subset.
    picked.sort_unstable();

    let subset: Vec<HourlyObservation> = picked.iter().map(|&i| rows[i]).collect();
    let effective = match side {
        Side::Heat => subset
            .iter()
            .map(|r| r.temp_c)
            .fold(f64::NEG_INFINITY, f64::max),
        Side::Cool => subset.iter().map(|r| r.temp_c).fold(f64::INFINITY, f64::min),
    };

    (subset, effective)
}
