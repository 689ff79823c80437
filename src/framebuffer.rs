// src/framebuffer.rs

//! Fixed-size RGB24 pixel grid.
//!
//! The framebuffer has no alpha channel: alpha is applied only while blending
//! a write. Every write is bounds-checked and writes outside the grid are
//! dropped without error, so rasterization code can draw shapes that hang off
//! the edge of the 64x64 display without clipping them first.

use crate::color::Rgba;

/// Bytes per stored pixel (R, G, B).
pub const BYTES_PER_PIXEL: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Box<[u8]>,
}

impl Framebuffer {
    /// Creates an all-black framebuffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            pixels: vec![0u8; len].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Byte offset of `(x, y)`, or `None` when the coordinate is off-grid.
    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    /// Sets every channel of every pixel to zero.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Overwrites every pixel with an opaque color; alpha is ignored.
    pub fn fill(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&[color.r, color.g, color.b]);
        }
    }

    /// Unconditionally overwrites one pixel. Off-grid writes are ignored.
    ///
    /// Returns whether the write landed.
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&[r, g, b]);
                true
            }
            None => false,
        }
    }

    /// Blends `(r, g, b)` over the stored pixel with weight `a / 255`,
    /// rounding each channel to the nearest integer. `a == 255` is a plain
    /// overwrite and `a == 0` leaves the pixel untouched. Off-grid writes are
    /// ignored.
    ///
    /// Returns whether the write landed.
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        let px = &mut self.pixels[i..i + BYTES_PER_PIXEL];
        for (dst, src) in px.iter_mut().zip([r, g, b]) {
            *dst = blend_channel(*dst, src, a);
        }
        true
    }

    /// Blends an `Rgba` color using its own alpha.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba) -> bool {
        self.blend_pixel(x, y, color.r, color.g, color.b, color.a)
    }

    /// Reads one pixel, or `None` when off-grid.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        self.offset(x, y)
            .map(|i| [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Raw pixel bytes, row-major, three bytes per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Copies out the raw pixel bytes; `width * height * 3` long.
    pub fn serialize(&self) -> Vec<u8> {
        self.pixels.to_vec()
    }
}

/// `round(dst + (src - dst) * alpha / 255)` in integer arithmetic.
///
/// The numerator never lands exactly on a half because 255 is odd, so adding
/// 127 before dividing rounds to nearest.
#[inline]
fn blend_channel(dst: u8, src: u8, alpha: u8) -> u8 {
    let alpha = alpha as u32;
    let mixed = dst as u32 * (255 - alpha) + src as u32 * alpha;
    ((mixed + 127) / 255) as u8
}
