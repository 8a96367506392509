// 3x5 bitmap font for overlay text. Each row is a 3-bit mask, MSB = left.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const GLYPH_W: usize = 3;
pub const GLYPH_H: usize = 5;
/// Glyph width plus one column of spacing.
pub const ADVANCE: usize = GLYPH_W + 1;

type Glyph = [u8; GLYPH_H];

const UNKNOWN: Glyph = [0b111, 0b001, 0b010, 0b000, 0b010];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    let table: &[(char, Glyph)] = &[
        (' ', [0, 0, 0, 0, 0]),
        ('0', [0b111, 0b101, 0b101, 0b101, 0b111]),
        ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
        ('2', [0b111, 0b001, 0b111, 0b100, 0b111]),
        ('3', [0b111, 0b001, 0b111, 0b001, 0b111]),
        ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
        ('5', [0b111, 0b100, 0b111, 0b001, 0b111]),
        ('6', [0b111, 0b100, 0b111, 0b101, 0b111]),
        ('7', [0b111, 0b001, 0b001, 0b001, 0b001]),
        ('8', [0b111, 0b101, 0b111, 0b101, 0b111]),
        ('9', [0b111, 0b101, 0b111, 0b001, 0b111]),
        ('A', [0b010, 0b101, 0b111, 0b101, 0b101]),
        ('B', [0b110, 0b101, 0b110, 0b101, 0b110]),
        ('C', [0b011, 0b100, 0b100, 0b100, 0b011]),
        ('D', [0b110, 0b101, 0b101, 0b101, 0b110]),
        ('E', [0b111, 0b100, 0b110, 0b100, 0b111]),
        ('F', [0b111, 0b100, 0b110, 0b100, 0b100]),
        ('G', [0b011, 0b100, 0b101, 0b101, 0b011]),
        ('H', [0b101, 0b101, 0b111, 0b101, 0b101]),
        ('I', [0b111, 0b010, 0b010, 0b010, 0b111]),
        ('J', [0b001, 0b001, 0b001, 0b101, 0b010]),
        ('K', [0b101, 0b101, 0b110, 0b101, 0b101]),
        ('L', [0b100, 0b100, 0b100, 0b100, 0b111]),
        ('M', [0b101, 0b111, 0b111, 0b101, 0b101]),
        ('N', [0b110, 0b101, 0b101, 0b101, 0b101]),
        ('O', [0b010, 0b101, 0b101, 0b101, 0b010]),
        ('P', [0b110, 0b101, 0b110, 0b100, 0b100]),
        ('Q', [0b010, 0b101, 0b101, 0b110, 0b011]),
        ('R', [0b110, 0b101, 0b110, 0b101, 0b101]),
        ('S', [0b011, 0b100, 0b010, 0b001, 0b110]),
        ('T', [0b111, 0b010, 0b010, 0b010, 0b010]),
        ('U', [0b101, 0b101, 0b101, 0b101, 0b111]),
        ('V', [0b101, 0b101, 0b101, 0b101, 0b010]),
        ('W', [0b101, 0b101, 0b111, 0b111, 0b101]),
        ('X', [0b101, 0b101, 0b010, 0b101, 0b101]),
        ('Y', [0b101, 0b101, 0b010, 0b010, 0b010]),
        ('Z', [0b111, 0b001, 0b010, 0b100, 0b111]),
        (':', [0b000, 0b010, 0b000, 0b010, 0b000]),
        ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
        ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
        ('!', [0b010, 0b010, 0b010, 0b000, 0b010]),
    ];
    table.iter().copied().collect()
});

/// Bitmap for `c`; lower-case shares the upper-case shapes.
pub fn glyph(c: char) -> &'static Glyph {
    GLYPHS
        .get(&c.to_ascii_uppercase())
        .unwrap_or(&UNKNOWN)
}

/// Pixel width of `text` drawn at `scale` screen pixels per font pixel.
pub fn text_width(text: &str, scale: usize) -> usize {
    let n = text.chars().count();
    if n == 0 { 0 } else { (n * ADVANCE - 1) * scale }
}
