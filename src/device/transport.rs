// src/device/transport.rs

//! Blocking command transport.
//!
//! `Transport` is the seam between the protocol client and the network: one
//! call sends one command and waits for its response or deadline. Logical
//! error codes inside a well-formed response are left for the client to judge.

use crate::device::error::DeviceError;
use crate::device::protocol::{Command, DeviceResponse};
use log::trace;
use std::io;
use std::time::Duration;

pub trait Transport {
    /// Sends `command` to `host` and returns the parsed response body.
    fn send(&mut self, host: &str, command: &Command) -> Result<DeviceResponse, DeviceError>;
}

/// JSON-over-HTTP transport posting to `http://<host>/post`.
pub struct HttpTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpTransport {
    /// Every request made through this transport is aborted after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(host: &str, reason: impl Into<String>) -> DeviceError {
        DeviceError::Transport {
            host: host.to_string(),
            reason: reason.into(),
        }
    }

    fn timeout_error(&self, host: &str) -> DeviceError {
        DeviceError::Timeout {
            host: host.to_string(),
            timeout: self.timeout,
        }
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, host: &str, command: &Command) -> Result<DeviceResponse, DeviceError> {
        let url = format!("http://{}/post", host);
        trace!("POST {} {}", url, command.name());

        let response = match self.agent.post(&url).send_json(command) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(Self::transport_error(host, format!("HTTP status {}", code)));
            }
            Err(ureq::Error::Transport(t)) => {
                if transport_timed_out(&t) {
                    return Err(self.timeout_error(host));
                }
                return Err(Self::transport_error(host, t.to_string()));
            }
        };

        // The device does not always send a JSON content type, so read the
        // body as text and parse it ourselves.
        let body = response.into_string().map_err(|e| {
            if io_timed_out(&e) {
                self.timeout_error(host)
            } else {
                Self::transport_error(host, format!("failed to read response: {}", e))
            }
        })?;
        trace!("{} answered {} with {}", host, command.name(), body);

        serde_json::from_str(&body)
            .map_err(|e| Self::transport_error(host, format!("malformed response: {}", e)))
    }
}

fn io_timed_out(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

fn transport_timed_out(err: &ureq::Transport) -> bool {
    std::error::Error::source(err)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .map_or(false, io_timed_out)
}
