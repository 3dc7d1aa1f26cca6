//! Peaking biquad filter
//!
//! Mono biquad configured as a peaking (bell-curve) EQ band: boosts or cuts
//! around a center frequency, leaves the rest of the spectrum untouched.
//! Coefficients follow the RBJ audio EQ cookbook. The correction chain keeps
//! filter parameters fixed for the lifetime of a session (only the gain
//! stages change at runtime), so coefficients are computed once at
//! construction and on explicit reconfiguration.

/// Mono peaking EQ biquad
#[derive(Debug, Clone)]
pub struct PeakingFilter {
    // Normalized coefficients
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // Direct form I state
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,

    frequency: f32,
    q: f32,
    gain_db: f32,
}

impl PeakingFilter {
    /// Create a peaking filter at the given center frequency and Q.
    ///
    /// `gain_db` is the filter's own bell gain; the correction chain keeps it
    /// at 0 dB (flat) and applies boost through the following gain stage.
    pub fn new(sample_rate: u32, frequency: f32, q: f32, gain_db: f32) -> Self {
        let mut filter = Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
            frequency,
            q,
            gain_db,
        };
        filter.set_peaking(sample_rate as f32, frequency, q, gain_db);
        filter
    }

    /// Configure as a peaking EQ band (RBJ cookbook).
    pub fn set_peaking(&mut self, sample_rate: f32, frequency: f32, q: f32, gain_db: f32) {
        // Guard against division by zero from an invalid stream config
        if sample_rate < 1.0 || q <= 0.0 {
            return;
        }

        self.frequency = frequency;
        self.q = q;
        self.gain_db = gain_db;

        let a = 10.0_f32.powf(gain_db / 40.0); // Amplitude
        // Clamp to 45% of sample rate to prevent near-Nyquist instability
        let clamped_freq = frequency.min(sample_rate * 0.45);
        let omega = 2.0 * std::f32::consts::PI * clamped_freq / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha / a;

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
    }

    /// Center frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Quality factor.
    pub fn q(&self) -> f32 {
        self.q
    }

    /// Bell gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Process one mono sample.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let mut out = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        // Flush denormals to keep the audio thread off the slow FP path
        if out.abs() < 1e-15 {
            out = 0.0;
        }

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = out;

        out
    }

    /// Process a mono buffer in-place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Clear filter state, preserving coefficients.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(frequency: f32, sample_rate: u32, duration_secs: f32) -> Vec<f32> {
        let num_samples = (sample_rate as f32 * duration_secs) as usize;
        (0..num_samples)
            .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn rms(buffer: &[f32]) -> f32 {
        (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt()
    }

    #[test]
    fn zero_db_bell_is_identity() {
        // With 0 dB gain the normalized numerator equals the denominator,
        // so the filter passes any signal through untouched.
        let mut filter = PeakingFilter::new(44100, 1000.0, 1.414, 0.0);
        let input = sine(1000.0, 44100, 0.05);
        let mut output = input.clone();
        filter.process(&mut output);

        for (a, b) in input.iter().zip(output.iter()) {
            assert!((a - b).abs() < 1e-5, "0 dB peaking must be transparent");
        }
    }

    #[test]
    fn boost_raises_center_frequency() {
        let mut filter = PeakingFilter::new(44100, 1000.0, 1.414, 12.0);
        let mut on_center = sine(1000.0, 44100, 0.2);
        filter.process(&mut on_center);

        let mut filter = PeakingFilter::new(44100, 1000.0, 1.414, 12.0);
        let mut off_center = sine(8000.0, 44100, 0.2);
        filter.process(&mut off_center);

        // Skip the transient before measuring
        let on = rms(&on_center[4410..]);
        let off = rms(&off_center[4410..]);
        let flat = rms(&sine(1000.0, 44100, 0.2)[4410..]);

        assert!(on > flat * 2.0, "12 dB boost should roughly 4x the center band");
        assert!(off < flat * 1.3, "off-center bands should be barely affected");
    }

    #[test]
    fn near_nyquist_frequency_is_clamped() {
        let mut filter = PeakingFilter::new(8000, 8000.0, 1.414, 6.0);
        let mut buffer = sine(500.0, 8000, 0.1);
        filter.process(&mut buffer);
        for sample in buffer {
            assert!(sample.is_finite());
        }
    }

    #[test]
    fn invalid_sample_rate_keeps_passthrough() {
        let mut filter = PeakingFilter::new(0, 1000.0, 1.414, 6.0);
        let mut buffer = vec![0.25f32; 16];
        filter.process(&mut buffer);
        for sample in buffer {
            assert!((sample - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn reset_clears_state() {
        let mut filter = PeakingFilter::new(44100, 1000.0, 1.414, 6.0);
        let mut warmup = sine(1000.0, 44100, 0.05);
        filter.process(&mut warmup);
        filter.reset();

        let mut fresh = PeakingFilter::new(44100, 1000.0, 1.414, 6.0);
        let input = sine(1000.0, 44100, 0.05);
        let mut a = input.clone();
        let mut b = input;
        filter.process(&mut a);
        fresh.process(&mut b);

        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}
