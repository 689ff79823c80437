// src/device/mod.rs
//! Device protocol layer.
//!
//! - Transport: sends one JSON command and returns the parsed response
//! - DeviceClient: handshake, retries, frame push, readiness
//! - DeviceSession: per-host state (picture IDs, last push)

pub mod backoff;
pub mod client;
pub mod clock;
pub mod error;
pub mod mock;
pub mod protocol;
pub mod session;
pub mod transport;

pub use backoff::Backoff;
pub use client::DeviceClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::DeviceError;
pub use protocol::{Command, DeviceResponse};
pub use session::{DeviceSession, SessionState, MAX_PICTURE_ID};
pub use transport::{HttpTransport, Transport};
