//! Core error types
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// A profile value was outside its documented range
    #[error("Invalid profile value for {frequency} Hz: {value}")]
    InvalidProfileValue {
        /// Band center frequency the value was supplied for
        frequency: f32,
        /// The rejected value
        value: f32,
    },

    /// A frequency that is not part of the band registry
    #[error("Unknown band frequency: {0} Hz")]
    UnknownBand(f32),
}
