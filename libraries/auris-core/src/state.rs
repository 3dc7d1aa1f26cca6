//! Engine lifecycle state

use serde::{Deserialize, Serialize};

/// Engine lifecycle state
///
/// Exactly one instance is owned by the engine. All transitions are driven by
/// the control thread; see `auris-engine` for the transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// No capture session; the input device is released
    Stopped,

    /// Acquiring the device and building the processing graph
    Starting,

    /// Live correction running
    Running,

    /// Device acquisition or graph construction failed
    Error,

    /// Device access was explicitly refused by the user/OS
    PermissionDenied,
}

impl EngineState {
    /// Whether a start request should be ignored in this state.
    ///
    /// Starting while already Starting or Running is an idempotent no-op.
    pub fn start_is_noop(self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }

    /// Whether this state carries an error detail for the UI to surface.
    pub fn is_failed(self) -> bool {
        matches!(self, Self::Error | Self::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_guard() {
        assert!(EngineState::Starting.start_is_noop());
        assert!(EngineState::Running.start_is_noop());
        assert!(!EngineState::Stopped.start_is_noop());
        assert!(!EngineState::Error.start_is_noop());
        assert!(!EngineState::PermissionDenied.start_is_noop());
    }

    #[test]
    fn failed_states() {
        assert!(EngineState::Error.is_failed());
        assert!(EngineState::PermissionDenied.is_failed());
        assert!(!EngineState::Running.is_failed());
    }

    #[test]
    fn serde_representation() {
        let json = serde_json::to_string(&EngineState::PermissionDenied).unwrap();
        assert_eq!(json, "\"permission_denied\"");
    }
}
