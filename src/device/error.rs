// src/device/error.rs

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the device client. Every variant names the host.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Connection failure, non-2xx status, or an unparseable response body.
    #[error("transport error talking to {host}: {reason}")]
    Transport { host: String, reason: String },

    /// The request deadline passed before the device answered.
    #[error("request to {host} timed out after {timeout:?}")]
    Timeout { host: String, timeout: Duration },

    /// The device answered but reported a non-zero error code.
    #[error("device {host} rejected {command} with code {code}")]
    DeviceLogical {
        host: String,
        command: &'static str,
        code: i64,
    },

    /// The handshake failed on every allowed attempt.
    #[error(
        "initialization of {host} failed after {attempts} attempts ({total_delay:?} spent backing off)"
    )]
    InitializationExhausted {
        host: String,
        attempts: u32,
        total_delay: Duration,
        #[source]
        last_error: Box<DeviceError>,
    },
}

impl DeviceError {
    pub fn host(&self) -> &str {
        match self {
            DeviceError::Transport { host, .. }
            | DeviceError::Timeout { host, .. }
            | DeviceError::DeviceLogical { host, .. }
            | DeviceError::InitializationExhausted { host, .. } => host,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DeviceError::Timeout { .. })
    }
}
