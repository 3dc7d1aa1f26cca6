//! Test doubles for the device backend
//!
//! `MockBackend` stands in for [`CpalBackend`](crate::CpalBackend) in
//! lifecycle and integration tests: no device is touched, and the processor
//! the session would run inside the output callback is exposed so tests can
//! push blocks through it by hand.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::backend::{ActiveStream, AudioBackend, SessionParams};
use crate::error::{EngineError, Result};
use crate::processor::CorrectionProcessor;

/// Sample rate the mock pretends the device runs at.
pub const MOCK_SAMPLE_RATE: u32 = 48_000;

/// How the next `open` call should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockFailure {
    /// Open succeeds
    #[default]
    None,
    /// Open fails as an OS permission refusal
    PermissionDenied,
    /// Open fails as a retryable device fault
    Device,
}

#[derive(Default)]
struct Shared {
    open_count: AtomicUsize,
    active_sessions: AtomicUsize,
    failure: Mutex<MockFailure>,
    processor: Mutex<Option<Arc<Mutex<CorrectionProcessor>>>>,
}

/// In-memory audio backend for tests.
pub struct MockBackend {
    shared: Arc<Shared>,
}

/// Test-side view of a [`MockBackend`]'s activity.
#[derive(Clone)]
pub struct MockHandle {
    shared: Arc<Shared>,
}

struct MockSession {
    shared: Arc<Shared>,
    _processor: Arc<Mutex<CorrectionProcessor>>,
}

impl ActiveStream for MockSession {}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.shared.active_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockBackend {
    /// Create a backend plus the handle tests observe it with.
    pub fn new() -> (Self, MockHandle) {
        let shared = Arc::new(Shared::default());
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MockHandle { shared },
        )
    }
}

impl AudioBackend for MockBackend {
    fn open(&mut self, params: SessionParams) -> Result<Box<dyn ActiveStream>> {
        self.shared.open_count.fetch_add(1, Ordering::SeqCst);

        match *self.shared.failure.lock().unwrap() {
            MockFailure::None => {}
            MockFailure::PermissionDenied => {
                return Err(EngineError::PermissionDenied(
                    "Microphone access was denied".into(),
                ))
            }
            MockFailure::Device => {
                return Err(EngineError::Device("No default input device".into()))
            }
        }

        let processor = Arc::new(Mutex::new(CorrectionProcessor::new(
            MOCK_SAMPLE_RATE,
            params.config.filter_q,
            &params.settings,
            params.left_enabled,
            params.right_enabled,
            params.commands,
            params.tap,
        )));
        *self.shared.processor.lock().unwrap() = Some(Arc::clone(&processor));

        self.shared.active_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            shared: Arc::clone(&self.shared),
            _processor: processor,
        }))
    }
}

impl MockHandle {
    /// Make subsequent `open` calls fail (or succeed again).
    pub fn fail_next_open(&self, failure: MockFailure) {
        *self.shared.failure.lock().unwrap() = failure;
    }

    /// How many times `open` has been called, failures included.
    pub fn open_count(&self) -> usize {
        self.shared.open_count.load(Ordering::SeqCst)
    }

    /// Number of sessions currently alive.
    pub fn active_sessions(&self) -> usize {
        self.shared.active_sessions.load(Ordering::SeqCst)
    }

    /// Processor of the most recently opened session.
    ///
    /// Tests drive this directly, playing the role of the device callback.
    pub fn processor(&self) -> Arc<Mutex<CorrectionProcessor>> {
        self.shared
            .processor
            .lock()
            .unwrap()
            .clone()
            .expect("no session has been opened")
    }
}
