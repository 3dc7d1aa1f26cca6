//! Audio backend abstraction
//!
//! The engine never talks to the platform audio subsystem directly: it hands
//! a [`SessionParams`] bundle to an injected [`AudioBackend`] and gets back a
//! running stream handle. Dropping the handle releases the device. This keeps
//! the lifecycle state machine fully testable without hardware; tests inject
//! a mock backend from [`crate::testing`].

use crossbeam_channel::Receiver;

use auris_core::CorrectionSettings;

use crate::command::EngineCommand;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::tap::AnalysisTap;

/// Everything a backend needs to build one capture session
pub struct SessionParams {
    /// Engine configuration (Q, tap length, queue bound)
    pub config: EngineConfig,

    /// Correction settings snapshot taken at start time
    pub settings: CorrectionSettings,

    /// Left ear enabled at start
    pub left_enabled: bool,

    /// Right ear enabled at start
    pub right_enabled: bool,

    /// Receiving end of the control command queue
    pub commands: Receiver<EngineCommand>,

    /// Tap handle the processor feeds the mono signal into
    pub tap: AnalysisTap,
}

/// A live capture/playback session
///
/// Dropping the value must stop the streams and release the input device
/// deterministically, even if the session was only partially constructed.
pub trait ActiveStream: Send {}

/// Device I/O provider
///
/// `open` performs the whole acquisition: device lookup, permission prompt,
/// graph construction, and stream start. Any failure must leave no resource
/// behind; the engine drops whatever it got and reports the error.
pub trait AudioBackend: Send {
    /// Acquire the device and start processing.
    fn open(&mut self, params: SessionParams) -> Result<Box<dyn ActiveStream>>;
}
