// src/main.rs

//! `pixoo-render`: draws a status scene and pushes it to the display.
//!
//! Usage: `pixoo-render [VALUE] [ICON.png]`
//!
//! `VALUE` is shown as a formatted number (defaults to the seconds since the
//! Unix epoch modulo 1000). Set `PIXOO_SOFT_RESET=1` to soft-reset the
//! device before drawing.

use anyhow::Context;
use log::{info, warn};
use pixoo_render::color::Rgba;
use pixoo_render::config::CONFIG;
use pixoo_render::device::DeviceClient;
use pixoo_render::framebuffer::Framebuffer;
use pixoo_render::rasterizer::{Align, Point, Rasterizer, Size};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const ACCENT: Rgba = Rgba::opaque(0, 170, 255);
const ICON_SIZE: u32 = 16;

fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting pixoo-render...");

    let mut args = std::env::args().skip(1);
    let value = match args.next() {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("VALUE must be a number, got '{}'", raw))?,
        None => default_value(),
    };
    let icon = args.next().map(PathBuf::from);

    let config = &*CONFIG;
    info!(
        "Display {}x{} at {}",
        config.display.width, config.display.height, config.device.host
    );

    let mut framebuffer = Framebuffer::new(config.display.width, config.display.height);
    draw_status_scene(&mut framebuffer, value, icon.as_ref());

    let mut client = DeviceClient::connect(&config.device);

    if std::env::var("PIXOO_SOFT_RESET").map_or(false, |v| v == "1") {
        if let Err(e) = client.soft_reset() {
            warn!("Soft reset of {} failed: {}", client.host(), e);
        }
    }

    let picture_id = client
        .push(&framebuffer)
        .with_context(|| format!("failed to push frame to {}", client.host()))?;
    info!("Frame accepted by {} as picture {}", client.host(), picture_id);
    Ok(())
}

fn default_value() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() % 1000) as f64)
        .unwrap_or(0.0)
}

fn draw_status_scene(framebuffer: &mut Framebuffer, value: f64, icon: Option<&PathBuf>) {
    let width = framebuffer.width() as i32;
    let height = framebuffer.height() as i32;
    let mid_x = width / 2;

    let mut r = Rasterizer::new(framebuffer);
    r.clear();

    r.draw_text_aligned("STATUS", Point::new(mid_x, 2), Rgba::WHITE, Align::Center);
    r.draw_line(Point::new(2, 9), Point::new(width - 3, 9), ACCENT);

    if let Some(path) = icon {
        r.draw_image(
            path,
            Point::new(mid_x - ICON_SIZE as i32 / 2, 13),
            Size::new(ICON_SIZE, ICON_SIZE),
            1.0,
        );
    }

    r.draw_formatted_number(value, Point::new(mid_x, height - 20), Rgba::YELLOW, Align::Center);

    // Translucent footer bar.
    r.fill_rect(
        Point::new(0, height - 8),
        Size::new(width as u32, 8),
        ACCENT.with_alpha(96),
    );
    r.draw_text_aligned("OK", Point::new(width - 2, height - 6), Rgba::WHITE, Align::Right);
}
