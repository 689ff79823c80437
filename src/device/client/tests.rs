// src/device/client/tests.rs

use super::*;
use crate::config::{DeviceConfig, RetryConfig};
use crate::device::clock::ManualClock;
use crate::device::mock::{MockReply, MockTransport};
use crate::device::session::MAX_PICTURE_ID;
use test_log::test;

const RESET: &str = "Draw/ResetHttpGifId";
const SELECT: &str = "Channel/SetIndex";
const SEND: &str = "Draw/SendHttpGif";

fn config(max_attempts: u32) -> DeviceConfig {
    DeviceConfig {
        host: "10.0.0.42".to_string(),
        retry: RetryConfig {
            max_attempts,
            ..RetryConfig::default()
        },
        ..DeviceConfig::default()
    }
}

fn client(transport: MockTransport) -> (DeviceClient<MockTransport, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let client = DeviceClient::with_parts(&config(5), transport, clock.clone());
    (client, clock)
}

fn failure() -> MockReply {
    MockReply::TransportFailure("boom".to_string())
}

// --- Initialization ---

#[test]
fn handshake_resets_then_selects_channel() {
    let (mut client, clock) = client(MockTransport::new());
    client.initialize().unwrap();

    assert_eq!(client.state(), SessionState::Ready);
    assert_eq!(client.transport().sent_names(), vec![RESET, SELECT]);
    assert_eq!(
        client.transport().sent()[1],
        Command::SelectChannel { index: 3 }
    );
    // Only the settle delay was slept.
    assert_eq!(clock.slept(), Duration::from_millis(100));
}

#[test]
fn two_failures_then_success_takes_three_attempts() {
    let mut transport = MockTransport::new();
    transport.push_reply(failure()).push_reply(MockReply::Timeout);
    let (mut client, clock) = client(transport);

    client.initialize().unwrap();

    assert_eq!(client.state(), SessionState::Ready);
    assert_eq!(client.transport().count(RESET), 3);
    assert_eq!(client.transport().count(SELECT), 1);
    // Backoff: 500ms + jitter, then 1000ms + jitter, plus one settle delay.
    let slept = clock.slept();
    assert!(slept >= Duration::from_millis(1_600), "{:?}", slept);
    assert!(slept <= Duration::from_millis(1_800), "{:?}", slept);
}

#[test]
fn failure_on_channel_select_also_retries() {
    let mut transport = MockTransport::new();
    transport
        .push_reply(MockReply::Respond(DeviceResponse::ok()))
        .push_reply(MockReply::Respond(DeviceResponse::with_error_code(1)));
    let (mut client, _clock) = client(transport);

    client.initialize().unwrap();
    assert_eq!(
        client.transport().sent_names(),
        vec![RESET, SELECT, RESET, SELECT]
    );
}

#[test]
fn exhausted_retries_leave_session_uninitialized() {
    let clock = ManualClock::new();
    let mut client = DeviceClient::with_parts(&config(4), MockTransport::unreachable(), clock.clone());

    let err = client.initialize().unwrap_err();
    match &err {
        DeviceError::InitializationExhausted {
            host,
            attempts,
            total_delay,
            last_error,
        } => {
            assert_eq!(host, "10.0.0.42");
            assert_eq!(*attempts, 4);
            // Three backoff sleeps between four attempts: 500 + 1000 + 2000 plus jitter.
            assert!(*total_delay >= Duration::from_millis(3_500));
            assert!(*total_delay <= Duration::from_millis(3_800));
            assert!(matches!(**last_error, DeviceError::Transport { .. }));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(client.state(), SessionState::Uninitialized);
    assert_eq!(client.transport().count(RESET), 4);
    assert_eq!(client.transport().count(SELECT), 0);
    assert!(!client.is_ready());
}

// --- Push ---

#[test]
fn push_initializes_first_then_resets_and_sends() {
    let (mut client, _clock) = client(MockTransport::new());
    let mut fb = Framebuffer::new(64, 64);
    fb.set_pixel(0, 0, 1, 2, 3);

    let id = client.push(&fb).unwrap();

    assert_eq!(id, 1);
    assert_eq!(
        client.transport().sent_names(),
        vec![RESET, SELECT, RESET, SEND]
    );
    match client.transport().sent().last().unwrap() {
        Command::SendFrame {
            frame_count,
            width,
            height,
            offset,
            picture_id,
            speed_ms,
            data,
        } => {
            assert_eq!((*frame_count, *width, *height, *offset), (1, 64, 64, 0));
            assert_eq!((*picture_id, *speed_ms), (1, 1000));
            let bytes = STANDARD.decode(data).unwrap();
            assert_eq!(bytes.len(), 64 * 64 * 3);
            assert_eq!(&bytes[..3], &[1, 2, 3]);
        }
        other => panic!("expected a frame, got {:?}", other),
    }
}

#[test]
fn push_aborts_when_initialization_fails() {
    let clock = ManualClock::new();
    let mut client = DeviceClient::with_parts(&config(2), MockTransport::unreachable(), clock);
    let fb = Framebuffer::new(4, 4);

    let err = client.push(&fb).unwrap_err();
    assert!(matches!(err, DeviceError::InitializationExhausted { attempts: 2, .. }));
    assert_eq!(client.transport().count(SEND), 0);
    assert_eq!(client.state(), SessionState::Uninitialized);
    assert_eq!(client.last_picture_id(), None);
}

#[test]
fn failed_pre_push_reset_is_swallowed() {
    let (mut client, _clock) = client(MockTransport::new());
    client.initialize().unwrap();
    client.transport_mut().push_reply(MockReply::Timeout);

    let id = client.push(&Framebuffer::new(2, 2)).unwrap();
    assert_eq!(id, 1);
    assert!(client.is_ready());
}

#[test]
fn failed_send_surfaces_and_still_consumes_picture_id() {
    let (mut client, _clock) = client(MockTransport::new());
    client.initialize().unwrap();
    let fb = Framebuffer::new(2, 2);

    client
        .transport_mut()
        .push_reply(MockReply::Respond(DeviceResponse::ok()))
        .push_reply(MockReply::Respond(DeviceResponse::with_error_code(7)));
    let err = client.push(&fb).unwrap_err();
    assert!(matches!(
        err,
        DeviceError::DeviceLogical { code: 7, command: SEND, .. }
    ));
    assert_eq!(client.last_picture_id(), Some(1));
    // A failed push does not undo initialization.
    assert_eq!(client.state(), SessionState::Ready);
    assert!(!client.is_ready());

    assert_eq!(client.push(&fb).unwrap(), 2);
}

#[test]
fn send_timeout_is_reported_as_timeout() {
    let (mut client, _clock) = client(MockTransport::new());
    client.initialize().unwrap();
    client
        .transport_mut()
        .push_reply(MockReply::Respond(DeviceResponse::ok()))
        .push_reply(MockReply::Timeout);

    let err = client.push(&Framebuffer::new(1, 1)).unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.host(), "10.0.0.42");
}

#[test]
fn picture_ids_wrap_after_9999_pushes() {
    let (mut client, _clock) = client(MockTransport::new());
    let fb = Framebuffer::new(1, 1);

    for expected in 1..=MAX_PICTURE_ID {
        assert_eq!(client.push(&fb).unwrap(), expected);
        client.transport_mut().clear_sent();
    }
    let id = client.push(&fb).unwrap();
    assert_eq!(id, 1);
    assert!(id != 0 && id != 10_000);
}

// --- Readiness ---

#[test]
fn readiness_follows_last_successful_push() {
    let (mut client, clock) = client(MockTransport::new());
    assert!(!client.is_ready());

    client.push(&Framebuffer::new(1, 1)).unwrap();
    assert!(client.is_ready());

    clock.advance(Duration::from_secs(29));
    assert!(client.is_ready());

    clock.advance(Duration::from_secs(1));
    assert!(!client.is_ready());
    // Still initialized; the next push restores readiness without a handshake.
    client.transport_mut().clear_sent();
    client.push(&Framebuffer::new(1, 1)).unwrap();
    assert_eq!(client.transport().sent_names(), vec![RESET, SEND]);
    assert!(client.is_ready());
}

#[test]
fn initialized_without_push_is_not_ready() {
    let (mut client, _clock) = client(MockTransport::new());
    client.initialize().unwrap();
    assert!(!client.is_ready());
}

// --- Soft reset ---

#[test]
fn soft_reset_requires_zero_return_code() {
    let (mut client, _clock) = client(MockTransport::new());
    client.initialize().unwrap();

    client
        .transport_mut()
        .push_reply(MockReply::Respond(DeviceResponse::with_return_code(0)));
    client.soft_reset().unwrap();
    assert_eq!(client.state(), SessionState::Uninitialized);

    client
        .transport_mut()
        .push_reply(MockReply::Respond(DeviceResponse::with_return_code(3)));
    let err = client.soft_reset().unwrap_err();
    assert!(matches!(err, DeviceError::DeviceLogical { code: 3, .. }));

    // The default mock reply carries no ReturnCode.
    let err = client.soft_reset().unwrap_err();
    assert!(matches!(err, DeviceError::Transport { .. }));
}
