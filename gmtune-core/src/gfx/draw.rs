//! Drawing primitives over a [`Surface`].

use super::font::{self, GLYPH_WIDTH};
use super::{Color, RAINBOW, Surface};

/// Draw a line using Bresenham's algorithm.
///
/// Handles all slopes, including the near-diagonal corner notches and the
/// single-pixel-wide vertical/horizontal trim segments of the panel.
pub fn line(surface: &mut Surface, color: Color, mut x0: i32, mut y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        surface.put(x0, y0, color);

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

/// Draw an unfilled rectangle outline as four line draws.
pub fn rect_outline(surface: &mut Surface, color: Color, x0: i32, y0: i32, x1: i32, y1: i32) {
    line(surface, color, x0, y0, x1, y0);
    line(surface, color, x0, y1, x1, y1);
    line(surface, color, x0, y0, x0, y1);
    line(surface, color, x1, y0, x1, y1);
}

/// Render fixed-width bitmap glyphs left to right starting at (x, y).
///
/// `animation_frame` drives a deterministic per-glyph sparkle: some glyphs
/// take a rainbow color for one frame as the counter advances. Same text,
/// position and frame count always produce identical pixels.
pub fn text(surface: &mut Surface, color: Color, s: &str, x: i32, y: i32, animation_frame: u64) {
    let mut px = x;
    for (index, ch) in s.chars().enumerate() {
        let phase = animation_frame as usize + index;
        let glyph_color = if phase % 11 == 0 {
            RAINBOW[phase % 7]
        } else {
            color
        };

        let rows = font::glyph(ch);
        for (row, &bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << col) != 0 {
                    surface.put(px + col, y + row as i32, glyph_color);
                }
            }
        }
        px += GLYPH_WIDTH;
    }
}

/// Total rendered pixel width of a string under the fixed glyph width.
pub fn text_width(s: &str) -> i32 {
    s.chars().count() as i32 * GLYPH_WIDTH
}
