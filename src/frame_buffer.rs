use std::fmt;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_WIDTH};

/// # FrameBuffer
/// The Chip-8 display is composed of 64x32 black/white pixels, stored as `[y][x]`.
///
/// Sprites are XORed onto the buffer: drawing a lit pixel over a lit pixel turns it off, which
/// is how programs erase what they drew and how they detect collisions.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    /// XORs a sprite onto the buffer with its top-left corner at `(x, y)`.
    ///
    /// The anchor wraps around the edges of the display but the sprite itself doesn't;
    /// rows and columns that fall off the right or bottom are clipped.
    /// Each byte in `rows` is one row of the sprite with bit 7 being its leftmost pixel.
    ///
    /// Returns whether any lit pixel was turned off.
    pub fn draw_sprites(&mut self, rows: &[u8], x: usize, y: usize) -> bool {
        let x = x % DISPLAY_WIDTH;
        let y = y % DISPLAY_HEIGHT;

        let mut collision = false;
        for (row, &byte) in rows.iter().enumerate() {
            let pixel_y = y + row;
            if pixel_y >= DISPLAY_HEIGHT {
                break;
            }
            for bit in 0..SPRITE_WIDTH {
                let pixel_x = x + bit;
                if pixel_x >= DISPLAY_WIDTH {
                    break;
                }
                let sprite_pixel = (byte >> (7 - bit)) & 1 == 1;
                let pixel = &mut self.pixels[pixel_y][pixel_x];
                collision |= sprite_pixel && *pixel;
                *pixel ^= sprite_pixel;
            }
        }
        collision
    }

    /// Whether the pixel at `(x, y)` is lit. Coordinates off the display are never lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// The buffer's rows, top to bottom.
    pub fn rows(&self) -> &[[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT] {
        &self.pixels
    }

    /// How many pixels are lit
    pub fn lit(&self) -> usize {
        self.pixels
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&pixel| pixel)
            .count()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the buffer as text, one line per row, `#` for lit pixels and `.` otherwise.
impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.pixels.iter() {
            let line: String = row
                .iter()
                .map(|&pixel| if pixel { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FrameBuffer {{ lit: {} }}", self.lit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The "0" glyph from the usual Chip-8 font
    const ZERO: [u8; 5] = [0xF0, 0x90, 0x90, 0x90, 0xF0];

    #[test]
    fn test_starts_blank() {
        let frame = FrameBuffer::new();
        assert_eq!(frame.lit(), 0);
    }

    #[test]
    fn test_draws_glyph() {
        let mut frame = FrameBuffer::new();
        let collision = frame.draw_sprites(&ZERO, 1, 1);
        assert!(!collision);
        assert_eq!(frame.rows()[1][1..5], [true, true, true, true]);
        assert_eq!(frame.rows()[2][1..5], [true, false, false, true]);
        assert_eq!(frame.rows()[3][1..5], [true, false, false, true]);
        assert_eq!(frame.rows()[4][1..5], [true, false, false, true]);
        assert_eq!(frame.rows()[5][1..5], [true, true, true, true]);
        assert_eq!(frame.lit(), 14);
    }

    #[test]
    fn test_xors_existing_pixels() {
        let mut frame = FrameBuffer::new();
        // 0 1 0 1 already lit, then draw 1 1 0 0
        frame.draw_sprites(&[0b0101_0000], 0, 0);
        let collision = frame.draw_sprites(&[0b1100_0000], 0, 0);
        assert!(collision);
        assert_eq!(frame.rows()[0][0..4], [true, false, false, true]);
    }

    #[test]
    fn test_drawing_twice_restores_buffer() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprites(&[0x3C], 10, 10);
        let before = frame;

        assert!(!frame.draw_sprites(&ZERO, 20, 5));
        assert!(frame.draw_sprites(&ZERO, 20, 5));
        assert_eq!(frame, before);
    }

    #[test]
    fn test_second_draw_collides_only_where_first_lit() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprites(&[0xF0], 0, 0);
        // overlaps nothing the first sprite lit
        assert!(!frame.draw_sprites(&[0x0F], 0, 0));
        // overlaps exactly one pixel
        assert!(frame.draw_sprites(&[0x01], 0, 0));
    }

    #[test]
    fn test_clear_then_draw_never_collides() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprites(&[0xFF; 15], 0, 0);
        frame.clear();
        assert_eq!(frame.lit(), 0);
        assert!(!frame.draw_sprites(&[0xFF; 15], 0, 0));
    }

    #[test]
    fn test_anchor_wraps() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprites(&[0x80], DISPLAY_WIDTH + 3, DISPLAY_HEIGHT + 2);
        assert!(frame.pixel(3, 2));
        assert_eq!(frame.lit(), 1);
    }

    #[test]
    fn test_clips_right_edge() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprites(&[0xFF], 60, 0);
        assert_eq!(frame.rows()[0][60..], [true, true, true, true]);
        // nothing wrapped around to the left side
        assert_eq!(frame.rows()[0][0..4], [false, false, false, false]);
        assert_eq!(frame.lit(), 4);
    }

    #[test]
    fn test_clips_bottom_edge() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprites(&[0x80, 0x80, 0x80, 0x80], 0, 30);
        assert!(frame.pixel(0, 30));
        assert!(frame.pixel(0, 31));
        assert!(!frame.pixel(0, 0));
        assert!(!frame.pixel(0, 1));
        assert_eq!(frame.lit(), 2);
    }

    #[test]
    fn test_clipped_pixels_never_collide() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprites(&[0xFF], 0, 0);
        assert!(!frame.draw_sprites(&[0xFF], 63, 31));
        assert!(frame.pixel(63, 31));
    }

    #[test]
    fn test_pixel_off_display() {
        let frame = FrameBuffer::new();
        assert!(!frame.pixel(DISPLAY_WIDTH, 0));
        assert!(!frame.pixel(0, DISPLAY_HEIGHT));
    }

    #[test]
    fn test_renders_as_text() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprites(&[0xA0], 0, 0);
        let text = frame.to_string();
        let mut lines = text.lines();
        let first = lines.next().unwrap();
        assert!(first.starts_with("#.#."));
        assert_eq!(first.len(), DISPLAY_WIDTH);
        assert_eq!(text.lines().count(), DISPLAY_HEIGHT);
    }
}
