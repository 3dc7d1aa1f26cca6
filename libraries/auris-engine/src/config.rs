//! Engine configuration

use serde::{Deserialize, Serialize};

use auris_dsp::CORRECTION_BAND_Q;

/// Configuration for the hearing engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Quality factor for every correction band (default: 1.414, ~one octave)
    pub filter_q: f32,

    /// Analysis tap length in samples (default: 1024)
    pub tap_len: usize,

    /// Bound of the control-to-audio command queue (default: 32)
    pub command_queue_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            filter_q: CORRECTION_BAND_Q,
            tap_len: 1024,
            command_queue_len: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.filter_q, 1.414);
        assert_eq!(config.tap_len, 1024);
        assert_eq!(config.command_queue_len, 32);
    }
}
