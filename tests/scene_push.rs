// tests/scene_push.rs

//! Draws scenes through the public API and pushes them through an in-memory
//! transport, checking what would have gone over the wire.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pixoo_render::color::Rgba;
use pixoo_render::config::Config;
use pixoo_render::device::mock::{MockReply, MockTransport};
use pixoo_render::device::{Command, DeviceClient, DeviceError, ManualClock, SessionState};
use pixoo_render::framebuffer::Framebuffer;
use pixoo_render::rasterizer::{Align, Point, Rasterizer, Size};
use std::time::Duration;

fn sent_frame(transport: &MockTransport) -> (u32, u32, u32, Vec<u8>) {
    match transport.sent().last() {
        Some(Command::SendFrame {
            width,
            height,
            picture_id,
            data,
            ..
        }) => (*width, *height, *picture_id, STANDARD.decode(data).unwrap()),
        other => panic!("last command was not a frame: {:?}", other),
    }
}

fn pixel_at(payload: &[u8], width: u32, x: u32, y: u32) -> [u8; 3] {
    let i = ((y * width + x) * 3) as usize;
    [payload[i], payload[i + 1], payload[i + 2]]
}

#[test]
fn drawn_scene_arrives_as_rgb24_payload() {
    let config = Config::default();
    let mut fb = Framebuffer::new(config.display.width, config.display.height);
    {
        let mut r = Rasterizer::new(&mut fb);
        r.fill_rect(Point::new(0, 0), Size::new(64, 64), Rgba::opaque(10, 20, 30));
        r.draw_line(Point::new(0, 63), Point::new(63, 63), Rgba::RED);
        r.draw_text_aligned("42", Point::new(32, 10), Rgba::WHITE, Align::Center);
    }

    let mut client = DeviceClient::with_parts(&config.device, MockTransport::new(), ManualClock::new());
    let id = client.push(&fb).unwrap();
    assert_eq!(id, 1);

    let (width, height, picture_id, payload) = sent_frame(client.transport());
    assert_eq!((width, height, picture_id), (64, 64, 1));
    assert_eq!(payload, fb.serialize());
    assert_eq!(pixel_at(&payload, 64, 5, 5), [10, 20, 30]);
    assert_eq!(pixel_at(&payload, 64, 40, 63), [255, 0, 0]);
    // "42" is 7 wide, centered on 32 it starts at 28; '4' lights (28, 10).
    assert_eq!(pixel_at(&payload, 64, 28, 10), [255, 255, 255]);
    assert!(client.is_ready());
}

#[test]
fn successive_pushes_rotate_picture_ids() {
    let config = Config::default();
    let clock = ManualClock::new();
    let mut client = DeviceClient::with_parts(&config.device, MockTransport::new(), clock.clone());
    let fb = Framebuffer::new(8, 8);

    let ids: Vec<u32> = (0..5).map(|_| client.push(&fb).unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    // One handshake, then a reset and a frame per push.
    assert_eq!(client.transport().count("Channel/SetIndex"), 1);
    assert_eq!(client.transport().count("Draw/SendHttpGif"), 5);
    assert_eq!(client.transport().count("Draw/ResetHttpGifId"), 6);

    clock.advance(Duration::from_secs(31));
    assert!(!client.is_ready());
    assert_eq!(client.state(), SessionState::Ready);
}

#[test]
fn unreachable_device_reports_exhaustion_with_host() {
    let mut config = Config::default();
    config.device.host = "192.0.2.1".to_string();
    config.device.retry.max_attempts = 3;

    let mut transport = MockTransport::new();
    transport.set_fallback(MockReply::Timeout);
    let clock = ManualClock::new();
    let mut client = DeviceClient::with_parts(&config.device, transport, clock.clone());

    let err = client.push(&Framebuffer::new(64, 64)).unwrap_err();
    assert_eq!(err.host(), "192.0.2.1");
    match err {
        DeviceError::InitializationExhausted {
            attempts,
            last_error,
            ..
        } => {
            assert_eq!(attempts, 3);
            assert!(last_error.is_timeout());
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(clock.slept() >= Duration::from_millis(1_500));
    assert_eq!(client.state(), SessionState::Uninitialized);
}
