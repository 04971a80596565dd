//! Caller-side smoothing of per-frame pitch estimates.

/// One-pole exponential smoother over voiced frames.
///
/// An unvoiced frame (`0.0`) clears the state, so a new note starts from its
/// own first estimate instead of gliding in from the previous one.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    alpha: f32,
    state: Option<f32>,
}

impl ExponentialSmoother {
    /// `alpha` is the weight of the newest value, clamped to `(0, 1]`;
    /// `1.0` disables smoothing.
    pub fn new(alpha: f32) -> Self {
        let alpha = if alpha.is_finite() { alpha.clamp(f32::EPSILON, 1.0) } else { 1.0 };
        Self { alpha, state: None }
    }

    pub fn update(&mut self, frequency: f32) -> f32 {
        if frequency <= 0.0 {
            self.state = None;
            return 0.0;
        }
        let next = match self.state {
            Some(prev) => prev + self.alpha * (frequency - prev),
            None => frequency,
        };
        self.state = Some(next);
        next
    }
}
