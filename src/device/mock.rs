// src/device/mock.rs

//! In-memory transport for tests and dry runs.

use crate::device::error::DeviceError;
use crate::device::protocol::{Command, DeviceResponse};
use crate::device::transport::Transport;
use std::collections::VecDeque;

/// What the mock does with one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Respond(DeviceResponse),
    TransportFailure(String),
    Timeout,
}

/// Records every command and answers from a script.
///
/// Scripted replies are consumed in order; once the script is empty every
/// command gets the fallback reply, which starts out as `{"error_code": 0}`.
#[derive(Debug, Clone)]
pub struct MockTransport {
    sent: Vec<Command>,
    script: VecDeque<MockReply>,
    fallback: MockReply,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            script: VecDeque::new(),
            fallback: MockReply::Respond(DeviceResponse::ok()),
        }
    }

    /// A transport whose every command fails at the connection level.
    pub fn unreachable() -> Self {
        let mut mock = Self::new();
        mock.fallback = MockReply::TransportFailure("connection refused".to_string());
        mock
    }

    /// Queues a reply for the next unanswered command.
    pub fn push_reply(&mut self, reply: MockReply) -> &mut Self {
        self.script.push_back(reply);
        self
    }

    pub fn set_fallback(&mut self, reply: MockReply) -> &mut Self {
        self.fallback = reply;
        self
    }

    pub fn sent(&self) -> &[Command] {
        &self.sent
    }

    /// Wire names of the commands sent so far.
    pub fn sent_names(&self) -> Vec<&'static str> {
        self.sent.iter().map(Command::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.sent.iter().filter(|c| c.name() == name).count()
    }

    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, host: &str, command: &Command) -> Result<DeviceResponse, DeviceError> {
        self.sent.push(command.clone());
        let reply = self
            .script
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match reply {
            MockReply::Respond(response) => Ok(response),
            MockReply::TransportFailure(reason) => Err(DeviceError::Transport {
                host: host.to_string(),
                reason,
            }),
            MockReply::Timeout => Err(DeviceError::Timeout {
                host: host.to_string(),
                timeout: std::time::Duration::from_secs(5),
            }),
        }
    }
}
