//! Commands sent from the control thread into the audio callback
//!
//! Queued through a bounded crossbeam channel and drained at the start of
//! every processed block, so parameter updates apply in issuance order
//! without the callback ever taking a lock shared with the control thread.

use auris_core::{Ear, BAND_COUNT};

/// Control command applied inside the audio callback
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Retarget the per-band gain stages of both ears (ramped)
    ApplyGains {
        /// Left-ear linear gains, registry order
        left: [f32; BAND_COUNT],
        /// Right-ear linear gains, registry order
        right: [f32; BAND_COUNT],
    },

    /// Ramp one ear's master gain to unity (enabled) or silence (muted)
    SetEarEnabled(Ear, bool),
}
