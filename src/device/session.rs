// src/device/session.rs

//! Per-host protocol state.

use std::time::{Duration, Instant};

/// Highest picture ID the device accepts; the counter wraps back to 1.
pub const MAX_PICTURE_ID: u32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No successful handshake yet, or the last one was exhausted.
    Uninitialized,
    /// A handshake is in progress.
    Initializing,
    /// Handshake done; frames can be pushed.
    Ready,
}

/// Rotating picture IDs in `1..=MAX_PICTURE_ID`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PictureIdCounter {
    // 0 until the first ID is issued.
    last: u32,
}

impl PictureIdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ID.
    pub fn next_id(&mut self) -> u32 {
        self.last = if self.last >= MAX_PICTURE_ID {
            1
        } else {
            self.last + 1
        };
        self.last
    }

    /// The most recently issued ID, if any.
    pub fn last(&self) -> Option<u32> {
        (self.last != 0).then_some(self.last)
    }
}

/// State of one device host: handshake status, the picture ID counter, and
/// when a frame was last accepted.
#[derive(Debug, Clone)]
pub struct DeviceSession {
    host: String,
    state: SessionState,
    picture_ids: PictureIdCounter,
    last_push: Option<Instant>,
    readiness_window: Duration,
}

impl DeviceSession {
    pub fn new(host: impl Into<String>, readiness_window: Duration) -> Self {
        Self {
            host: host.into(),
            state: SessionState::Uninitialized,
            picture_ids: PictureIdCounter::new(),
            last_push: None,
            readiness_window,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn last_push(&self) -> Option<Instant> {
        self.last_push
    }

    pub fn last_picture_id(&self) -> Option<u32> {
        self.picture_ids.last()
    }

    /// Initialized, and a frame was accepted less than the readiness window
    /// before `now`.
    pub fn is_ready(&self, now: Instant) -> bool {
        self.is_initialized()
            && self
                .last_push
                .map_or(false, |at| now.saturating_duration_since(at) < self.readiness_window)
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    pub(crate) fn next_picture_id(&mut self) -> u32 {
        self.picture_ids.next_id()
    }

    pub(crate) fn record_push(&mut self, at: Instant) {
        self.last_push = Some(at);
    }
}
