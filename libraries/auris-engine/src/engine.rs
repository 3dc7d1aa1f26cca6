//! Engine lifecycle
//!
//! `HearingEngine` is the single owned handle the UI and configuration
//! collaborators talk to. It runs the state machine
//! (Stopped/Starting/Running/Error/PermissionDenied), owns the live session,
//! and forwards parameter changes into the audio callback through the
//! command queue.

use crossbeam_channel::{bounded, Sender};
use tracing::{debug, info, warn};

use auris_core::{CorrectionSettings, Ear, EngineState};
use auris_dsp::band_gains;

use crate::backend::{ActiveStream, AudioBackend, SessionParams};
use crate::command::EngineCommand;
use crate::config::EngineConfig;
use crate::tap::AnalysisTap;

/// Runtime entities that exist only while Running
struct Session {
    commands: Sender<EngineCommand>,
    tap: AnalysisTap,
    // Dropped last; releases the device
    _stream: Box<dyn ActiveStream>,
}

/// The hearing-compensation engine
///
/// Control-plane operations are expected from a single control thread. None
/// of them block the audio path: parameter changes are queued, start/stop
/// only touch the session handle.
pub struct HearingEngine {
    backend: Box<dyn AudioBackend>,
    config: EngineConfig,

    /// Latest snapshot pushed by the configuration collaborator
    settings: CorrectionSettings,
    left_enabled: bool,
    right_enabled: bool,

    state: EngineState,
    last_error: Option<String>,
    session: Option<Session>,
}

impl HearingEngine {
    /// Create an engine with an injected device backend.
    pub fn new(backend: Box<dyn AudioBackend>, config: EngineConfig) -> Self {
        Self {
            backend,
            config,
            settings: CorrectionSettings::default(),
            left_enabled: true,
            right_enabled: true,
            state: EngineState::Stopped,
            last_error: None,
            session: None,
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> EngineState {
        self.state
    }

    /// Detail string of the most recent failure, if the engine is in a
    /// failed state.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start processing.
    ///
    /// Idempotent while Starting/Running. From Error/PermissionDenied this is
    /// the retry path: prior error detail is cleared before the new attempt.
    /// Returns the state reached by this request.
    pub fn start(&mut self) -> EngineState {
        if self.state.start_is_noop() {
            debug!(state = ?self.state, "start ignored");
            return self.state;
        }

        self.state = EngineState::Starting;
        self.last_error = None;
        info!("starting capture session");

        let (command_tx, command_rx) = bounded(self.config.command_queue_len);
        let tap = AnalysisTap::new(self.config.tap_len);
        let params = SessionParams {
            config: self.config.clone(),
            settings: self.settings,
            left_enabled: self.left_enabled,
            right_enabled: self.right_enabled,
            commands: command_rx,
            tap: tap.clone(),
        };

        match self.backend.open(params) {
            Ok(stream) => {
                self.session = Some(Session {
                    commands: command_tx,
                    tap,
                    _stream: stream,
                });
                self.state = EngineState::Running;
                info!("capture session running");
            }
            Err(err) => {
                // Partially acquired resources died with the failed open;
                // nothing to keep here
                self.session = None;
                self.last_error = Some(err.to_string());
                self.state = if err.is_permission_denied() {
                    EngineState::PermissionDenied
                } else {
                    EngineState::Error
                };
                warn!(state = ?self.state, "start failed: {err}");
            }
        }

        self.state
    }

    /// Stop processing and release the input device.
    ///
    /// Safe to call from any state, repeatedly. Dropping the session cancels
    /// all pending gain ramps and discards the ear channels; nothing survives
    /// into the next session except the externally owned settings and flags.
    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            info!("capture session stopped");
        }
        self.state = EngineState::Stopped;
    }

    /// Enable or mute one ear's output channel.
    ///
    /// While Running the change is queued as a ramped master-gain move; in
    /// every state the flag is remembered so the next session starts from it.
    pub fn set_ear_enabled(&mut self, ear: Ear, enabled: bool) {
        match ear {
            Ear::Left => self.left_enabled = enabled,
            Ear::Right => self.right_enabled = enabled,
        }

        if let Some(session) = &self.session {
            if session
                .commands
                .try_send(EngineCommand::SetEarEnabled(ear, enabled))
                .is_err()
            {
                warn!(?ear, enabled, "command queue full, ear toggle dropped");
            }
        }
    }

    /// Whether an ear is currently enabled.
    pub fn is_ear_enabled(&self, ear: Ear) -> bool {
        match ear {
            Ear::Left => self.left_enabled,
            Ear::Right => self.right_enabled,
        }
    }

    /// Accept a changed settings snapshot from the configuration layer.
    ///
    /// While Running the per-band gains are recomputed from this snapshot and
    /// queued immediately; otherwise the snapshot just replaces the stored
    /// one and the next session computes from it. Updates never buffer across
    /// sessions.
    pub fn on_settings_changed(&mut self, settings: &CorrectionSettings) {
        self.settings = *settings;

        if let Some(session) = &self.session {
            let command = EngineCommand::ApplyGains {
                left: band_gains(&settings.left, &settings.tuning),
                right: band_gains(&settings.right, &settings.tuning),
            };
            if session.commands.try_send(command).is_err() {
                warn!("command queue full, gain update dropped");
            }
        }
    }

    /// Snapshot of recent time-domain samples for visualization.
    ///
    /// `None` unless Running, never stale or zeroed data.
    pub fn analysis_snapshot(&self) -> Option<Vec<f32>> {
        if self.state != EngineState::Running {
            return None;
        }
        self.session.as_ref().map(|session| session.tap.snapshot())
    }
}

impl Drop for HearingEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
