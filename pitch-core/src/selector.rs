//! Lag selection (YIN steps 4 and 5): absolute threshold, dip descent and
//! parabolic refinement on the normalized difference function.

/// The lag picked from a normalized difference function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagCandidate {
    /// Integer lag at the bottom of the accepted dip.
    pub lag: usize,
    /// Sub-sample lag after parabolic interpolation.
    pub refined_lag: f32,
    /// `d'` at `lag`. Lower means more periodic.
    pub dip: f32,
}

/// Finds the first dip of `cmnd` below `threshold` and refines it.
///
/// Lags are scanned from 1 upward. The first one under the threshold starts
/// the dip, and the search then walks forward while `d'` keeps decreasing, so
/// the result is the bottom of the first dip rather than the global minimum.
/// Later dips usually sit on multiples of the true period.
///
/// # Returns
/// * `Some(candidate)` - A dip was found
/// * `None` - `d'` never drops below `threshold` (aperiodic input)
pub fn select_lag(cmnd: &[f32], threshold: f32) -> Option<LagCandidate> {
    if cmnd.len() < 2 {
        return None;
    }
    let last = cmnd.len() - 1;

    let mut lag = (1..=last).find(|&tau| cmnd[tau] < threshold)?;
    while lag < last && cmnd[lag + 1] < cmnd[lag] {
        lag += 1;
    }

    Some(LagCandidate {
        lag,
        refined_lag: parabolic_interpolation(cmnd, lag),
        dip: cmnd[lag],
    })
}

/// Fits a parabola through `values[index - 1..=index + 1]` and returns the
/// abscissa of its vertex.
///
/// Falls back to `index` when a neighbour is missing, the three points are
/// collinear, or the vertex lands more than one sample away.
pub fn parabolic_interpolation(values: &[f32], index: usize) -> f32 {
    if index == 0 || index + 1 >= values.len() {
        return index as f32;
    }

    let y1 = values[index - 1];
    let y2 = values[index];
    let y3 = values[index + 1];

    let denominator = y1 - 2.0 * y2 + y3;
    if denominator.abs() < f32::EPSILON {
        return index as f32;
    }

    let shift = (y1 - y3) / (2.0 * denominator);
    if shift.is_finite() && shift.abs() <= 1.0 {
        index as f32 + shift
    } else {
        index as f32
    }
}
