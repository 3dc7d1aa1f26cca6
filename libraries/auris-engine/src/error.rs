//! Engine errors
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine error types
///
/// Everything that can fail while acquiring the device or building the
/// processing graph. All variants carry a human-readable detail string that
/// the lifecycle captures for `last_error()`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Microphone access explicitly refused by the user/OS.
    /// Terminal for this attempt; the user must retry.
    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    /// No usable device, or the device failed. Retryable.
    #[error("Audio device error: {0}")]
    Device(String),

    /// Processing graph could not be built. Surfaced, not retried.
    #[error("Failed to construct processing graph: {0}")]
    Construction(String),

    /// Stream could not be built or started
    #[error("Audio stream error: {0}")]
    Stream(String),
}

impl EngineError {
    /// Classify a backend error message, catching the OS-level permission
    /// refusals that cpal only reports as backend-specific strings.
    pub fn from_backend_message(message: String) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("permission")
            || lower.contains("denied")
            || lower.contains("not allowed")
        {
            Self::PermissionDenied(message)
        } else {
            Self::Stream(message)
        }
    }

    /// Whether this failure maps to the PermissionDenied lifecycle state.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

impl From<cpal::DefaultStreamConfigError> for EngineError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        match err {
            cpal::DefaultStreamConfigError::DeviceNotAvailable => {
                EngineError::Device("Audio device is no longer available".into())
            }
            other => EngineError::from_backend_message(other.to_string()),
        }
    }
}

impl From<cpal::BuildStreamError> for EngineError {
    fn from(err: cpal::BuildStreamError) -> Self {
        match err {
            cpal::BuildStreamError::DeviceNotAvailable => {
                EngineError::Device("Audio device is no longer available".into())
            }
            cpal::BuildStreamError::StreamConfigNotSupported => {
                EngineError::Construction("Requested stream configuration not supported".into())
            }
            other => EngineError::from_backend_message(other.to_string()),
        }
    }
}

impl From<cpal::PlayStreamError> for EngineError {
    fn from(err: cpal::PlayStreamError) -> Self {
        EngineError::from_backend_message(err.to_string())
    }
}
