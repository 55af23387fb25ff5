//! The fixed "now playing" panel.
//!
//! Layout (320x240 surface, all coordinates fixed):
//! - white outer box at (5,5)-(315,235) with gray diagonal corner notches
//!   and a gray inner box at (20,20)-(300,220)
//! - a 14-step rainbow trim inset between the two boxes, rotated by the
//!   frame counter
//! - four centered metadata lines at y = 100/110/120/130
//! - a violet highlight box around the text block, sized to the longest line

use super::{BLUE, GRAY, RAINBOW, RED, Surface, VIOLET, WHITE, YELLOW, draw};
use crate::player::MetaLine;

/// Horizontal centering axis for the text block.
const CENTER_X: i32 = 160;

/// Leftmost x-origin a centered line may take.
const TEXT_MIN_X: i32 = 21;

/// Widest the highlight box is allowed to get.
const PANEL_MAX_WIDTH: i32 = 280;

/// The four metadata lines of the panel, in draw order.
pub struct NowPlaying {
    pub title: MetaLine,
    pub track: MetaLine,
    pub song: MetaLine,
    pub position: MetaLine,
}

/// x-origin for a centered line of the given pixel width.
///
/// Lines wider than the panel are pinned to the left text margin instead of
/// overflowing leftward.
pub fn centered_x(width: i32) -> i32 {
    (CENTER_X - width / 2).max(TEXT_MIN_X)
}

/// Clamp the running max line width to the highlight box limit.
pub fn clamp_panel_width(max_width: i32) -> i32 {
    max_width.min(PANEL_MAX_WIDTH)
}

fn text_centered(
    surface: &mut Surface,
    color: u16,
    line: &MetaLine,
    y: i32,
    frame: u64,
    max_width: i32,
) -> i32 {
    let width = draw::text_width(line.as_str());
    draw::text(surface, color, line.as_str(), centered_x(width), y, frame);
    width.max(max_width)
}

/// Compose the whole panel into the surface.
///
/// Pure function of (surface, frame counter, metadata): same inputs always
/// produce the same pixels.
pub fn draw_panel(surface: &mut Surface, frame: u64, now: &NowPlaying) {
    // Borders and corner notches.
    draw::rect_outline(surface, WHITE, 5, 5, 315, 235);
    draw::line(surface, GRAY, 5, 5, 20, 20);
    draw::line(surface, GRAY, 315, 5, 300, 20);
    draw::line(surface, GRAY, 5, 235, 20, 220);
    draw::line(surface, GRAY, 315, 235, 300, 220);
    draw::rect_outline(surface, GRAY, 20, 20, 300, 220);

    // Rotating rainbow trim: the cycle index advances every 4 frames and
    // wraps every 30, each inset step shifted by half its offset.
    let cycle = ((frame % 30) >> 2) as i32;
    for offset in 1..15 {
        let color = RAINBOW[((cycle + (offset >> 1)) % 7) as usize];
        draw::line(surface, color, 5 + offset, 6 + offset, 5 + offset, 234 - offset);
        draw::line(surface, color, 6 + offset, 5 + offset, 314 - offset, 5 + offset);
        draw::line(surface, color, 315 - offset, 6 + offset, 315 - offset, 234 - offset);
        draw::line(surface, color, 6 + offset, 235 - offset, 314 - offset, 235 - offset);
    }

    // Text block, tracking the widest line.
    let mut max_width = 0;
    max_width = text_centered(surface, RED, &now.title, 100, frame, max_width);
    max_width = text_centered(surface, YELLOW, &now.track, 110, frame, max_width);
    max_width = text_centered(surface, BLUE, &now.song, 120, frame, max_width);
    max_width = text_centered(surface, WHITE, &now.position, 130, frame, max_width);

    // Highlight box around the text block, drawn after the text. It is
    // unfilled, so the ordering is cosmetic framing rather than occlusion.
    let half = clamp_panel_width(max_width) / 2;
    draw::rect_outline(surface, VIOLET, CENTER_X - half, 98, CENTER_X + half, 140);
}
