//! Change-detection gate for measurement reports.
//!
//! A value is only worth a network message once it leaves the symmetric
//! band `last_reported ± tolerance`.  Values sitting exactly on the band
//! edge are not reported.

/// Slack added to the band so one-decimal values that land on the edge are
/// not pushed outside it by `f32` subtraction error.
const BAND_EPSILON: f32 = 1e-3;

/// Round to one decimal place, halves away from zero.
pub fn round_one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Per-channel reporting gate.
#[derive(Debug, Clone)]
pub struct ThresholdGate {
    tolerance: f32,
    /// `None` until the first report (or after a reset).
    last_reported: Option<f32>,
}

impl ThresholdGate {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            last_reported: None,
        }
    }

    /// Gate with a known last-reported value.
    pub fn with_last_reported(tolerance: f32, last_reported: f32) -> Self {
        Self {
            tolerance,
            last_reported: Some(last_reported),
        }
    }

    /// Would `current` be reported?  Does not change state.
    ///
    /// `current` must already be a one-decimal value from
    /// [`round_one_decimal`].  The band carries a little slack for `f32`
    /// error, so an unrounded sample just past the edge reads as inside.
    pub fn exceeds(&self, current: f32) -> bool {
        match self.last_reported {
            None => true,
            Some(last) => {
                let band = self.tolerance + BAND_EPSILON;
                current < last - band || current > last + band
            }
        }
    }

    /// Check a sample rounded with [`round_one_decimal`].  When it leaves
    /// the band the sample becomes the new reference and `true` is returned.
    pub fn check(&mut self, current: f32) -> bool {
        if !self.exceeds(current) {
            return false;
        }
        self.last_reported = Some(current);
        true
    }

    /// Forget the reference; the next [`check`](Self::check) always reports.
    pub fn reset(&mut self) {
        self.last_reported = None;
    }

    pub fn last_reported(&self) -> Option<f32> {
        self.last_reported
    }
}
