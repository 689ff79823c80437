// src/device/client.rs

//! Protocol client for one display.
//!
//! ## Lifecycle
//! 1. `Uninitialized` - fresh session, or the last handshake was exhausted.
//! 2. `initialize()` - reset the picture ID, settle, select the custom
//!    channel; retried with exponential backoff.
//! 3. `Ready` - every `push()` sends a best-effort ID reset followed by the
//!    full frame. A failed push leaves the session `Ready`.
//!
//! All calls block until the device answers or the request deadline passes.
//! The client holds plain mutable state and is meant to be driven from one
//! thread; at most one push is in flight at a time.

use crate::config::DeviceConfig;
use crate::device::backoff::Backoff;
use crate::device::clock::{Clock, SystemClock};
use crate::device::error::DeviceError;
use crate::device::protocol::{Command, DeviceResponse};
use crate::device::session::{DeviceSession, SessionState};
use crate::device::transport::{HttpTransport, Transport};
use crate::framebuffer::Framebuffer;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, info, trace, warn};
use std::time::Duration;

pub struct DeviceClient<T = HttpTransport, C = SystemClock> {
    session: DeviceSession,
    transport: T,
    clock: C,
    backoff: Backoff,
    settle_delay: Duration,
    channel_index: u32,
}

impl DeviceClient<HttpTransport, SystemClock> {
    /// A client talking HTTP to `config.host` with the configured deadline.
    pub fn connect(config: &DeviceConfig) -> Self {
        Self::with_parts(
            config,
            HttpTransport::new(config.request_timeout()),
            SystemClock,
        )
    }
}

impl<T: Transport, C: Clock> DeviceClient<T, C> {
    pub fn with_parts(config: &DeviceConfig, transport: T, clock: C) -> Self {
        Self {
            session: DeviceSession::new(config.host.clone(), config.readiness_window()),
            transport,
            clock,
            backoff: Backoff::from_config(&config.retry),
            settle_delay: config.settle_delay(),
            channel_index: config.channel_index,
        }
    }

    pub fn host(&self) -> &str {
        self.session.host()
    }

    pub fn session(&self) -> &DeviceSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn last_picture_id(&self) -> Option<u32> {
        self.session.last_picture_id()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Whether the device is initialized and accepted a frame within the
    /// readiness window. No side effects.
    pub fn is_ready(&self) -> bool {
        self.session.is_ready(self.clock.now())
    }

    /// Sends one command and rejects responses carrying a non-zero
    /// `error_code`.
    fn send(&mut self, command: &Command) -> Result<DeviceResponse, DeviceError> {
        trace!("Sending {} to {}", command.name(), self.session.host());
        let response = self.transport.send(self.session.host(), command)?;
        match response.error_code {
            Some(code) if code != 0 => Err(DeviceError::DeviceLogical {
                host: self.session.host().to_string(),
                command: command.name(),
                code,
            }),
            _ => Ok(response),
        }
    }

    fn handshake(&mut self) -> Result<(), DeviceError> {
        self.send(&Command::ResetPictureId)?;
        self.clock.sleep(self.settle_delay);
        self.send(&Command::SelectChannel {
            index: self.channel_index,
        })?;
        Ok(())
    }

    /// Runs the handshake, retrying with backoff until it succeeds or the
    /// attempt budget runs out. On exhaustion the session is left
    /// `Uninitialized`.
    pub fn initialize(&mut self) -> Result<(), DeviceError> {
        let host = self.session.host().to_string();
        let max_attempts = self.backoff.max_attempts();
        let mut total_delay = Duration::ZERO;
        self.session.set_state(SessionState::Initializing);
        debug!("Initializing {} (up to {} attempts)", host, max_attempts);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match self.handshake() {
                Ok(()) => {
                    self.session.set_state(SessionState::Ready);
                    info!(
                        "Initialized {} on attempt {} after {:?} of backoff",
                        host, attempt, total_delay
                    );
                    return Ok(());
                }
                Err(e) => e,
            };

            if attempt >= max_attempts {
                self.session.set_state(SessionState::Uninitialized);
                return Err(DeviceError::InitializationExhausted {
                    host,
                    attempts: attempt,
                    total_delay,
                    last_error: Box::new(err),
                });
            }

            let delay = self.backoff.jittered_delay(attempt - 1);
            warn!(
                "Handshake with {} failed on attempt {}/{}: {}; retrying in {:?}",
                host, attempt, max_attempts, err, delay
            );
            self.clock.sleep(delay);
            total_delay += delay;
        }
    }

    /// Pushes the framebuffer to the device as one full frame and returns
    /// the picture ID used.
    ///
    /// Initializes first when needed. The picture ID is consumed even if the
    /// send fails.
    pub fn push(&mut self, framebuffer: &Framebuffer) -> Result<u32, DeviceError> {
        if self.session.state() != SessionState::Ready {
            self.initialize()?;
        }

        if let Err(e) = self.send(&Command::ResetPictureId) {
            warn!(
                "Pre-push picture ID reset on {} failed, sending frame anyway: {}",
                self.session.host(),
                e
            );
        }

        let data = STANDARD.encode(framebuffer.as_bytes());
        let picture_id = self.session.next_picture_id();
        let command = Command::send_frame(framebuffer.width(), framebuffer.height(), picture_id, data);
        self.send(&command)?;

        self.session.record_push(self.clock.now());
        debug!(
            "Pushed {}x{} frame to {} as picture {}",
            framebuffer.width(),
            framebuffer.height(),
            self.session.host(),
            picture_id
        );
        Ok(picture_id)
    }

    /// Resynchronises the device clock and soft-resets it. Success requires
    /// `ReturnCode` 0. The device drops its channel selection on reset, so a
    /// successful reset returns the session to `Uninitialized`.
    pub fn soft_reset(&mut self) -> Result<(), DeviceError> {
        let command = Command::SoftReset;
        let response = self.send(&command)?;
        match response.return_code {
            Some(0) => {
                info!("Soft reset {}", self.session.host());
                self.session.set_state(SessionState::Uninitialized);
                Ok(())
            }
            Some(code) => Err(DeviceError::DeviceLogical {
                host: self.session.host().to_string(),
                command: command.name(),
                code,
            }),
            None => Err(DeviceError::Transport {
                host: self.session.host().to_string(),
                reason: format!("{} response has no ReturnCode", command.name()),
            }),
        }
    }
}

#[cfg(test)]
mod tests;
