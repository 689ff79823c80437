// src/font.rs

//! Bitmap font table.
//!
//! The display is only 64 pixels wide, so text is drawn with a fixed 5-pixel
//! tall bitmap font. Glyphs are immutable, process-wide data; a lookup never
//! fails and falls back to the space glyph for characters the table does not
//! cover. Lowercase letters share the uppercase bitmaps.

mod pico3x5;

/// Height in pixels of every glyph in the built-in font.
pub const GLYPH_HEIGHT: usize = 5;

/// Horizontal gap in pixels between two adjacent glyphs.
pub const GLYPH_SPACING: u32 = 1;

/// A single bitmap glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    width: u8,
    rows: [u8; GLYPH_HEIGHT],
}

impl Glyph {
    pub const fn new(width: u8, rows: [u8; GLYPH_HEIGHT]) -> Self {
        Self { width, rows }
    }

    /// Advance width in pixels, excluding inter-glyph spacing.
    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        GLYPH_HEIGHT as u32
    }

    /// Whether the pixel at column `col`, row `row` is lit.
    pub fn is_set(&self, col: u32, row: u32) -> bool {
        if col >= self.width() || row >= self.height() {
            return false;
        }
        let shift = self.width() - 1 - col;
        (self.rows[row as usize] >> shift) & 1 == 1
    }

    /// Iterates the lit pixels as `(col, row)` offsets from the glyph origin.
    pub fn lit_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.height())
            .flat_map(move |row| (0..self.width()).map(move |col| (col, row)))
            .filter(move |&(col, row)| self.is_set(col, row))
    }
}

/// A fixed glyph table with its layout metrics.
#[derive(Debug, Clone, Copy)]
pub struct Font {
    glyphs: &'static [(char, Glyph)],
    spacing: u32,
}

/// The built-in 3x5 font.
pub static DEFAULT_FONT: Font = Font {
    glyphs: pico3x5::GLYPHS,
    spacing: GLYPH_SPACING,
};

impl Font {
    pub fn spacing(&self) -> u32 {
        self.spacing
    }

    pub fn line_height(&self) -> u32 {
        GLYPH_HEIGHT as u32
    }

    /// Returns the glyph for `ch`, if the table has one.
    pub fn find(&self, ch: char) -> Option<&'static Glyph> {
        let ch = ch.to_ascii_uppercase();
        self.glyphs
            .binary_search_by_key(&ch, |(c, _)| *c)
            .ok()
            .map(|idx| &self.glyphs[idx].1)
    }

    /// Returns the glyph for `ch`, falling back to the space glyph.
    pub fn glyph(&self, ch: char) -> &'static Glyph {
        self.find(ch).unwrap_or_else(|| self.space())
    }

    fn space(&self) -> &'static Glyph {
        // The space glyph is always the first entry of a table.
        &self.glyphs[0].1
    }

    /// Width of a run of characters: glyph widths plus one gap between each
    /// pair of neighbours. Empty text measures zero.
    pub fn measure<I>(&self, chars: I) -> u32
    where
        I: IntoIterator<Item = char>,
    {
        let mut width = 0;
        let mut count = 0;
        for ch in chars {
            width += self.glyph(ch).width();
            count += 1;
        }
        if count > 0 {
            width += self.spacing * (count - 1);
        }
        width
    }
}

impl Default for Font {
    fn default() -> Self {
        DEFAULT_FONT
    }
}
