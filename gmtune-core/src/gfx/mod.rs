//! Graphics for gmtune-core.
//!
//! Everything renders into a host-owned RGB565 [`Surface`]:
//!
//! - `Surface`: fixed-size framebuffer, created once at core init and never
//!   resized. Exposes its raw bytes for `RuntimeHandle::upload_video_frame`.
//! - `draw`: line/box/text primitives (Bresenham lines, 8x8 bitmap glyphs).
//! - `ui`: the fixed "now playing" panel composed from those primitives.
//!
//! Coordinates are `i32`; writes outside the surface are clipped per pixel.

pub mod draw;
pub mod font;
pub mod ui;


/// Packed RGB565 pixel value.
pub type Color = u16;

pub const WHITE: Color = 0xFFFF;
pub const GRAY: Color = 0x8410;
pub const RED: Color = 0xF800;
pub const YELLOW: Color = 0xFFE0;
pub const BLUE: Color = 0x001F;
pub const VIOLET: Color = 0x881F;

/// Color cycle for the animated panel trim: red, orange, yellow, green,
/// blue, indigo, violet.
pub const RAINBOW: [Color; 7] = [0xF800, 0xFC00, 0xFFE0, 0x07E0, 0x001F, 0x4810, 0x881F];

/// Bytes per pixel for RGB565.
pub const BYTES_PER_PIXEL: u32 = 2;

/// Host-owned framebuffer.
///
/// The buffer is exactly `width * height` RGB565 pixels at all times.
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u16>,
}

impl Surface {
    /// Allocate a zeroed surface. Allocation failure aborts the process via
    /// the global allocator; there is no degraded-mode rendering to fall
    /// back to.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u16; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row of the framebuffer.
    pub fn pitch(&self) -> u32 {
        self.width * BYTES_PER_PIXEL
    }

    /// Zero every pixel.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Write one pixel, clipping to the surface bounds.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        let w = self.width as i32;
        let h = self.height as i32;
        if x >= 0 && x < w && y >= 0 && y < h {
            self.pixels[(y * w + x) as usize] = color;
        }
    }

    /// Read one pixel, or `None` when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        let w = self.width as i32;
        let h = self.height as i32;
        if x >= 0 && x < w && y >= 0 && y < h {
            Some(self.pixels[(y * w + x) as usize])
        } else {
            None
        }
    }

    /// Raw framebuffer bytes for the libretro video upload.
    ///
    /// RGB565 is 2 bytes per pixel; the cast is sound because the pixel
    /// buffer is contiguous and the host consumes little-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        let data_ptr = self.pixels.as_ptr() as *const u8;
        let data_len = self.pixels.len() * BYTES_PER_PIXEL as usize;
        // SAFETY: `pixels` is a live contiguous allocation of u16; reading it
        // as bytes of the same total length cannot go out of bounds.
        unsafe { std::slice::from_raw_parts(data_ptr, data_len) }
    }
}
