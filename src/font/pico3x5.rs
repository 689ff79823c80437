// src/font/pico3x5.rs

//! Glyph data for the built-in 3x5 pixel font.
//!
//! Each row is stored right-aligned: for a glyph of width `w`, bit `w - 1` is
//! the leftmost column. Entries are sorted by character so lookup can use a
//! binary search.

use super::Glyph;

const fn g3(rows: [u8; 5]) -> Glyph {
    Glyph::new(3, rows)
}

pub(super) static GLYPHS: &[(char, Glyph)] = &[
    (' ', g3([0b000, 0b000, 0b000, 0b000, 0b000])),
    ('!', Glyph::new(1, [0b1, 0b1, 0b1, 0b0, 0b1])),
    ('"', g3([0b101, 0b101, 0b000, 0b000, 0b000])),
    ('#', g3([0b101, 0b111, 0b101, 0b111, 0b101])),
    ('%', g3([0b101, 0b001, 0b010, 0b100, 0b101])),
    ('\'', Glyph::new(1, [0b1, 0b1, 0b0, 0b0, 0b0])),
    ('(', Glyph::new(2, [0b01, 0b10, 0b10, 0b10, 0b01])),
    (')', Glyph::new(2, [0b10, 0b01, 0b01, 0b01, 0b10])),
    ('*', g3([0b101, 0b010, 0b111, 0b010, 0b101])),
    ('+', g3([0b000, 0b010, 0b111, 0b010, 0b000])),
    (',', Glyph::new(2, [0b00, 0b00, 0b00, 0b01, 0b10])),
    ('-', g3([0b000, 0b000, 0b111, 0b000, 0b000])),
    ('.', Glyph::new(1, [0b0, 0b0, 0b0, 0b0, 0b1])),
    ('/', g3([0b001, 0b001, 0b010, 0b100, 0b100])),
    ('0', g3([0b111, 0b101, 0b101, 0b101, 0b111])),
    ('1', g3([0b010, 0b110, 0b010, 0b010, 0b111])),
    ('2', g3([0b111, 0b001, 0b111, 0b100, 0b111])),
    ('3', g3([0b111, 0b001, 0b111, 0b001, 0b111])),
    ('4', g3([0b101, 0b101, 0b111, 0b001, 0b001])),
    ('5', g3([0b111, 0b100, 0b111, 0b001, 0b111])),
    ('6', g3([0b111, 0b100, 0b111, 0b101, 0b111])),
    ('7', g3([0b111, 0b001, 0b001, 0b001, 0b001])),
    ('8', g3([0b111, 0b101, 0b111, 0b101, 0b111])),
    ('9', g3([0b111, 0b101, 0b111, 0b001, 0b111])),
    (':', Glyph::new(1, [0b0, 0b1, 0b0, 0b1, 0b0])),
    (';', Glyph::new(2, [0b00, 0b01, 0b00, 0b01, 0b10])),
    ('<', g3([0b001, 0b010, 0b100, 0b010, 0b001])),
    ('=', g3([0b000, 0b111, 0b000, 0b111, 0b000])),
    ('>', g3([0b100, 0b010, 0b001, 0b010, 0b100])),
    ('?', g3([0b111, 0b001, 0b011, 0b000, 0b010])),
    ('A', g3([0b111, 0b101, 0b111, 0b101, 0b101])),
    ('B', g3([0b111, 0b101, 0b110, 0b101, 0b111])),
    ('C', g3([0b111, 0b100, 0b100, 0b100, 0b111])),
    ('D', g3([0b110, 0b101, 0b101, 0b101, 0b110])),
    ('E', g3([0b111, 0b100, 0b110, 0b100, 0b111])),
    ('F', g3([0b111, 0b100, 0b110, 0b100, 0b100])),
    ('G', g3([0b011, 0b100, 0b101, 0b101, 0b111])),
    ('H', g3([0b101, 0b101, 0b111, 0b101, 0b101])),
    ('I', g3([0b111, 0b010, 0b010, 0b010, 0b111])),
    ('J', g3([0b111, 0b010, 0b010, 0b010, 0b110])),
    ('K', g3([0b101, 0b101, 0b110, 0b101, 0b101])),
    ('L', g3([0b100, 0b100, 0b100, 0b100, 0b111])),
    ('M', g3([0b111, 0b111, 0b101, 0b101, 0b101])),
    ('N', g3([0b110, 0b101, 0b101, 0b101, 0b101])),
    ('O', g3([0b011, 0b101, 0b101, 0b101, 0b110])),
    ('P', g3([0b111, 0b101, 0b111, 0b100, 0b100])),
    ('Q', g3([0b010, 0b101, 0b101, 0b110, 0b011])),
    ('R', g3([0b111, 0b101, 0b110, 0b101, 0b101])),
    ('S', g3([0b011, 0b100, 0b111, 0b001, 0b110])),
    ('T', g3([0b111, 0b010, 0b010, 0b010, 0b010])),
    ('U', g3([0b101, 0b101, 0b101, 0b101, 0b011])),
    ('V', g3([0b101, 0b101, 0b101, 0b111, 0b010])),
    ('W', g3([0b101, 0b101, 0b101, 0b111, 0b111])),
    ('X', g3([0b101, 0b101, 0b010, 0b101, 0b101])),
    ('Y', g3([0b101, 0b101, 0b111, 0b001, 0b111])),
    ('Z', g3([0b111, 0b001, 0b010, 0b100, 0b111])),
    ('[', Glyph::new(2, [0b11, 0b10, 0b10, 0b10, 0b11])),
    (']', Glyph::new(2, [0b11, 0b01, 0b01, 0b01, 0b11])),
    ('_', g3([0b000, 0b000, 0b000, 0b000, 0b111])),
];
