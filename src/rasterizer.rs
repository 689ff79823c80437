// src/rasterizer.rs

//! Drawing primitives on top of the [`Framebuffer`].
//!
//! Every primitive is a blended draw, so any color with alpha below 255 is
//! composited over what is already on the grid. Shapes may extend past the
//! edge of the display; the framebuffer drops off-grid writes.
//!
//! ```text
//! draw_* calls  →  [Rasterizer]  →  Framebuffer::blend_pixel  →  serialize()
//!                   line / rect                                    (push)
//!                   text layout
//!                   image scaling
//! ```

use crate::color::Rgba;
use crate::font::{Font, Glyph, DEFAULT_FONT};
use crate::framebuffer::Framebuffer;
use crate::image::{ImageLoader, PngImageLoader};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A pixel coordinate. May lie outside the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// A width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Size::new(width, height)
    }
}

/// Horizontal anchoring of a text run relative to its `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Text starts at `x`.
    #[default]
    Left,
    /// Text is centered on `x`; see [`Rasterizer::text_start_x`].
    Center,
    /// Text ends at `x`.
    Right,
}

/// Software rasterizer drawing into a borrowed framebuffer.
pub struct Rasterizer<'fb, L = PngImageLoader> {
    framebuffer: &'fb mut Framebuffer,
    font: &'static Font,
    loader: L,
}

impl<'fb> Rasterizer<'fb, PngImageLoader> {
    /// Creates a rasterizer using the built-in font and the PNG loader.
    pub fn new(framebuffer: &'fb mut Framebuffer) -> Self {
        Self {
            framebuffer,
            font: &DEFAULT_FONT,
            loader: PngImageLoader::new(),
        }
    }
}

impl<'fb, L: ImageLoader> Rasterizer<'fb, L> {
    /// Replaces the image loader used by [`Rasterizer::draw_image`].
    pub fn with_loader<M: ImageLoader>(self, loader: M) -> Rasterizer<'fb, M> {
        Rasterizer {
            framebuffer: self.framebuffer,
            font: self.font,
            loader,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &*self.framebuffer
    }

    pub fn font(&self) -> &'static Font {
        self.font
    }

    /// Clears the whole framebuffer to black.
    pub fn clear(&mut self) {
        self.framebuffer.clear();
    }

    pub fn draw_point(&mut self, pos: Point, color: Rgba) {
        self.framebuffer.blend(pos.x, pos.y, color);
    }

    /// Bresenham line from `start` to `end`, both endpoints included.
    pub fn draw_line(&mut self, start: Point, end: Point, color: Rgba) {
        // Wide arithmetic so extreme coordinates cannot overflow the deltas.
        let (mut x0, mut y0) = (start.x as i64, start.y as i64);
        let (x1, y1) = (end.x as i64, end.y as i64);

        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.framebuffer.blend(x0 as i32, y0 as i32, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Fills the `size` rectangle whose top-left corner is `pos`.
    pub fn fill_rect(&mut self, pos: Point, size: Size, color: Rgba) {
        let (x_start, x_end) = clip_span(pos.x, size.width, self.framebuffer.width());
        let (y_start, y_end) = clip_span(pos.y, size.height, self.framebuffer.height());
        for y in y_start..y_end {
            for x in x_start..x_end {
                self.framebuffer.blend(x, y, color);
            }
        }
    }

    /// Same as [`Rasterizer::fill_rect`]; there is no outline mode.
    pub fn draw_rect(&mut self, pos: Point, size: Size, color: Rgba) {
        self.fill_rect(pos, size, color);
    }

    /// Pixel width of `text` in the current font.
    pub fn measure_text(&self, text: &str) -> u32 {
        self.font.measure(text.chars())
    }

    /// X coordinate of the first glyph when `text` is anchored at `x`.
    ///
    /// Centering an odd number of glyphs puts the middle glyph's own center
    /// on `x`, measured from the text to its left. An even number of glyphs
    /// is centered on the run as a whole.
    pub fn text_start_x(&self, text: &str, x: i32, align: Align) -> i32 {
        let start = self.start_x(text, x as i64, align);
        start.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    fn start_x(&self, text: &str, x: i64, align: Align) -> i64 {
        match align {
            Align::Left => x,
            Align::Right => x - self.measure_text(text) as i64,
            Align::Center => {
                let chars: Vec<char> = text.chars().collect();
                if chars.len() % 2 == 1 {
                    let mid = chars.len() / 2;
                    let left = self.font.measure(chars[..mid].iter().copied());
                    let gap = if mid > 0 { self.font.spacing() } else { 0 };
                    let half_mid = self.font.glyph(chars[mid]).width() / 2;
                    x - (left + gap + half_mid) as i64
                } else {
                    // round(total / 2), halves away from zero
                    let total = self.font.measure(chars.iter().copied());
                    x - ((total + 1) / 2) as i64
                }
            }
        }
    }

    /// Draws one glyph with its top-left corner at `pos`; returns its width.
    pub fn draw_char(&mut self, ch: char, pos: Point, color: Rgba) -> u32 {
        let glyph = self.font.glyph(ch);
        self.blit_glyph(glyph, pos.x as i64, pos.y as i64, color);
        glyph.width()
    }

    fn blit_glyph(&mut self, glyph: &Glyph, x: i64, y: i64, color: Rgba) {
        for (col, row) in glyph.lit_pixels() {
            // Anything past the i32 range is off-grid anyway.
            let px = i32::try_from(x + col as i64);
            let py = i32::try_from(y + row as i64);
            if let (Ok(px), Ok(py)) = (px, py) {
                self.framebuffer.blend(px, py, color);
            }
        }
    }

    /// Draws `text` anchored at `pos` and returns the total pixel width.
    pub fn draw_text_aligned(&mut self, text: &str, pos: Point, color: Rgba, align: Align) -> u32 {
        let mut cursor = self.start_x(text, pos.x as i64, align);
        let spacing = self.font.spacing() as i64;
        for ch in text.chars() {
            let glyph = self.font.glyph(ch);
            self.blit_glyph(glyph, cursor, pos.y as i64, color);
            cursor += glyph.width() as i64 + spacing;
        }
        self.measure_text(text)
    }

    /// Left-aligned text.
    pub fn draw_text(&mut self, text: &str, pos: Point, color: Rgba) -> u32 {
        self.draw_text_aligned(text, pos, color, Align::Left)
    }

    /// Draws a number using the display's compact numeric format and returns
    /// the pixel width drawn. Non-finite values draw nothing.
    pub fn draw_formatted_number(&mut self, value: f64, pos: Point, color: Rgba, align: Align) -> u32 {
        match format_number(value) {
            Some(text) => self.draw_text_aligned(&text, pos, color, align),
            None => 0,
        }
    }

    /// Loads the image at `path`, scales it into `size` at `pos` with
    /// nearest-pixel sampling and composites it at `opacity` (0.0 to 1.0).
    ///
    /// A resource that fails to load is replaced by an opaque mid-gray box of
    /// the same size. Returns whether the real image was drawn.
    pub fn draw_image(&mut self, path: impl AsRef<Path>, pos: Point, size: Size, opacity: f32) -> bool {
        let path = path.as_ref();
        let image = match self.loader.load(path) {
            Ok(image) if image.is_well_formed() => image,
            Ok(image) => {
                warn!(
                    "Image {} has {} bytes for {}x{}, drawing placeholder",
                    path.display(),
                    image.data.len(),
                    image.width,
                    image.height
                );
                self.fill_rect(pos, size, Rgba::MID_GRAY);
                return false;
            }
            Err(e) => {
                warn!(
                    "Image {} unavailable, drawing placeholder at ({}, {}) {}x{}: {}",
                    path.display(),
                    pos.x,
                    pos.y,
                    size.width,
                    size.height,
                    e
                );
                self.fill_rect(pos, size, Rgba::MID_GRAY);
                return false;
            }
        };
        if image.width == 0 || image.height == 0 {
            return true;
        }

        let global_alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u32;
        let (x_start, x_end) = clip_span(pos.x, size.width, self.framebuffer.width());
        let (y_start, y_end) = clip_span(pos.y, size.height, self.framebuffer.height());
        for y in y_start..y_end {
            let ty = (y as i64 - pos.y as i64) as u64;
            let sy = (ty * image.height as u64 / size.height as u64) as u32;
            for x in x_start..x_end {
                let tx = (x as i64 - pos.x as i64) as u64;
                let sx = (tx * image.width as u64 / size.width as u64) as u32;
                let [r, g, b, a] = image.pixel(sx, sy);
                let alpha = a as u32 * global_alpha / 255;
                if alpha > 0 {
                    self.framebuffer.blend_pixel(x, y, r, g, b, alpha as u8);
                }
            }
        }
        true
    }
}

/// Intersects `[start, start + len)` with `[0, limit)`.
fn clip_span(start: i32, len: u32, limit: u32) -> (i32, i32) {
    let lo = (start as i64).max(0);
    let hi = (start as i64 + len as i64).min(limit as i64);
    if hi <= lo {
        (0, 0)
    } else {
        (lo as i32, hi as i32)
    }
}

/// Formats a number the way scenes show it on the matrix.
///
/// Magnitudes below 0.005 show as `0.0`, below 10 with exactly one decimal,
/// anything larger rounded to an integer. Returns `None` for NaN and
/// infinities.
pub fn format_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let magnitude = value.abs();
    if magnitude < 0.005 {
        return Some("0.0".to_string());
    }
    if magnitude < 10.0 {
        let rounded = (value * 10.0).round() / 10.0;
        if rounded == 0.0 {
            return Some("0.0".to_string());
        }
        return Some(format!("{:.1}", rounded));
    }
    Some(format!("{}", value.round() as i64))
}
