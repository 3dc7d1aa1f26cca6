//! Per-ear correction chain
//!
//! One `EarChannel` corrects the mono feed for a single ear: for every band
//! in the registry, a peaking filter followed by a smoothed gain stage, all
//! in series and in registry order, collapsing into one master gain stage.
//!
//! Topology is fixed for the lifetime of a session. Settings changes only
//! retarget the gain stages; the filters are never rebuilt while running.

use auris_core::{BAND_COUNT, CORRECTION_BAND_FREQUENCIES};

use crate::biquad::PeakingFilter;
use crate::gain::SmoothedGain;

/// Quality factor shared by all correction bands (~one octave bandwidth).
pub const CORRECTION_BAND_Q: f32 = 1.414;

/// Correction chain for one ear
pub struct EarChannel {
    /// Band filters, registry order. Flat bells; boost lives in the gains.
    filters: Vec<PeakingFilter>,

    /// Per-band gain stages, registry order
    band_gains: Vec<SmoothedGain>,

    /// Master gain: 1.0 enabled, 0.0 muted, always ramped
    master: SmoothedGain,

    enabled: bool,
}

impl EarChannel {
    /// Convenience for [`Self::with_q`] at the default `CORRECTION_BAND_Q`.
    ///
    /// The engine passes its configured Q through `with_q`; this constructor
    /// is for callers happy with the standard bandwidth.
    pub fn new(sample_rate: u32) -> Self {
        Self::with_q(sample_rate, CORRECTION_BAND_Q)
    }

    /// Build the chain with an explicit band Q.
    pub fn with_q(sample_rate: u32, q: f32) -> Self {
        let filters = CORRECTION_BAND_FREQUENCIES
            .iter()
            .map(|&freq| PeakingFilter::new(sample_rate, freq, q, 0.0))
            .collect();
        let band_gains = (0..BAND_COUNT).map(|_| SmoothedGain::new(sample_rate)).collect();

        Self {
            filters,
            band_gains,
            master: SmoothedGain::new(sample_rate),
            enabled: true,
        }
    }

    /// Number of filter+gain pairs in the chain.
    ///
    /// Always equals the band registry size while the channel exists.
    pub fn pair_count(&self) -> usize {
        debug_assert_eq!(self.filters.len(), self.band_gains.len());
        self.filters.len()
    }

    /// Center frequency of a pair, registry order.
    pub fn band_frequency(&self, index: usize) -> Option<f32> {
        self.filters.get(index).map(PeakingFilter::frequency)
    }

    /// Retarget every band gain stage, in registry order. Ramped.
    pub fn apply_band_gains(&mut self, gains: &[f32; BAND_COUNT]) {
        for (stage, &gain) in self.band_gains.iter_mut().zip(gains.iter()) {
            stage.set_target(gain);
        }
    }

    /// Current ramp targets of the band gain stages.
    pub fn band_gain_targets(&self) -> [f32; BAND_COUNT] {
        let mut targets = [1.0; BAND_COUNT];
        for (target, stage) in targets.iter_mut().zip(self.band_gains.iter()) {
            *target = stage.target();
        }
        targets
    }

    /// Enable or mute this ear. Only the master gain moves; the band chain
    /// keeps processing so re-enabling has no filter transient.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.master.set_target(if enabled { 1.0 } else { 0.0 });
    }

    /// Whether the ear is enabled (master ramping toward unity).
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current ramp target of the master gain stage.
    pub fn master_gain_target(&self) -> f32 {
        self.master.target()
    }

    /// Live master gain value (mid-ramp).
    pub fn master_gain(&self) -> f32 {
        self.master.current()
    }

    /// Process the mono feed in-place through every band pair and the master.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            let mut s = *sample;
            for (filter, gain) in self.filters.iter_mut().zip(self.band_gains.iter_mut()) {
                s = filter.process_sample(s);
                s *= gain.next();
            }
            *sample = s * self.master.next();
        }
    }

    /// Clear filter state, e.g. after a long suspension.
    pub fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}
