//! Gain calculation and click-free gain stages
//!
//! The calculator is a pure function from (hearing loss dB, tuning %) to a
//! linear amplitude multiplier: the tuning percentage scales the prescribed
//! compensation, and the resulting dB boost converts to linear with the
//! standard 10^(dB/20).
//!
//! Live gain values never jump: `SmoothedGain` ramps exponentially toward its
//! target with a 10 ms time constant, which keeps settings changes and ear
//! mute/unmute free of audible clicks.

use auris_core::{HearingProfile, TuningProfile, BAND_COUNT};

/// Gain ramp time constant in milliseconds.
///
/// Matches the correction engine's parameter automation: retargeting a gain
/// reaches ~63% of the change after one time constant and is inaudibly close
/// after a few.
pub const GAIN_RAMP_MS: f32 = 10.0;

/// Compensation in dB for one band: the measured loss scaled by the tuning
/// intensity (100 % = full prescribed boost, 50 % = half).
#[inline]
pub fn compensation_db(loss_db: f32, tuning_pct: f32) -> f32 {
    loss_db * tuning_pct / 100.0
}

/// Convert a dB value to a linear amplitude multiplier.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Compute the per-band linear gains for one ear, in registry order.
///
/// Recomputed from the current profiles on every settings change and on every
/// transition to Running, so no stale coefficient survives an adjustment.
pub fn band_gains(profile: &HearingProfile, tuning: &TuningProfile) -> [f32; BAND_COUNT] {
    let mut gains = [1.0; BAND_COUNT];
    for (i, gain) in gains.iter_mut().enumerate() {
        let db = compensation_db(profile.loss_db_at(i), tuning.intensity_pct_at(i));
        *gain = db_to_linear(db);
    }
    gains
}

/// Linear gain stage with an exponential ramp toward its target
///
/// One-pole smoothing in the style of coefficient smoothing elsewhere in the
/// chain: each sample moves the live value a fixed proportion closer to the
/// target, so continuous retargeting (slider drags, rapid toggles) stays
/// smooth without tracking a ramp window.
#[derive(Debug, Clone)]
pub struct SmoothedGain {
    current: f32,
    target: f32,
    /// Per-sample smoothing coefficient derived from the time constant
    alpha: f32,
}

impl SmoothedGain {
    /// Create a gain stage at unity, ramping with `GAIN_RAMP_MS` at the given
    /// sample rate.
    pub fn new(sample_rate: u32) -> Self {
        Self::with_ramp(sample_rate, GAIN_RAMP_MS)
    }

    /// Create a gain stage with an explicit ramp time constant.
    pub fn with_ramp(sample_rate: u32, ramp_ms: f32) -> Self {
        // alpha = 1 - e^(-1 / (tau * sr)); invalid rates degrade to snapping
        let tau_samples = sample_rate as f32 * ramp_ms / 1000.0;
        let alpha = if tau_samples >= 1.0 {
            1.0 - (-1.0 / tau_samples).exp()
        } else {
            1.0
        };
        Self {
            current: 1.0,
            target: 1.0,
            alpha,
        }
    }

    /// Set the ramp destination. The live value approaches it exponentially.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to the target, discarding any ramp in progress.
    pub fn snap(&mut self) {
        self.current = self.target;
    }

    /// The ramp destination.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// The live gain value.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Advance the ramp one sample and return the gain to apply.
    #[inline]
    pub fn next(&mut self) -> f32 {
        self.current += self.alpha * (self.target - self.current);
        self.current
    }

    /// Apply the ramping gain to a mono buffer in-place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample *= self.next();
        }
    }
}
