use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_WIDTH};

/// # Graphics
/// The 64x32 monochrome frame buffer, one byte per pixel (0 = off, 1 = on),
/// stored row-major so pixel (x, y) lives at `y * DISPLAY_WIDTH + x`.
///
/// Pixels are only ever XORed, so drawing the same sprite twice restores the
/// buffer exactly.
#[derive(Clone, PartialEq, Eq)]
pub struct Graphics {
    pixels: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl Graphics {
    pub fn new() -> Self {
        Graphics {
            pixels: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        DISPLAY_WIDTH
    }

    pub fn height(&self) -> usize {
        DISPLAY_HEIGHT
    }

    pub fn clear(&mut self) {
        self.pixels = [0; DISPLAY_WIDTH * DISPLAY_HEIGHT];
    }

    /// The pixel at (x, y); coordinates wrap around both edges.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[Self::index(x, y)]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Iterates over the buffer one row at a time.
    pub fn rows(&self) -> std::slice::Chunks<'_, u8> {
        self.pixels.chunks(DISPLAY_WIDTH)
    }

    /// XORs a sprite onto the buffer with its top-left corner at (x, y).
    ///
    /// Each byte of `sprite` is one row, most significant bit leftmost. Pixels
    /// that run off an edge wrap around to the opposite side. Returns whether any
    /// lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            for bit in 0..SPRITE_WIDTH {
                let value = (byte >> (7 - bit)) & 1;
                if value == 0 {
                    continue;
                }
                let pixel = &mut self.pixels[Self::index(x + bit, y + row)];
                collision |= *pixel == 1;
                *pixel ^= value;
            }
        }
        collision
    }

    fn index(x: usize, y: usize) -> usize {
        (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + (x % DISPLAY_WIDTH)
    }
}

impl Default for Graphics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Graphics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&p| if p == 1 { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(graphics: &Graphics) -> usize {
        graphics.pixels().iter().filter(|&&p| p == 1).count()
    }

    #[test]
    fn test_draw_single_row() {
        let mut graphics = Graphics::new();
        let collision = graphics.draw_sprite(8, 2, &[0b1010_1011]);
        assert!(!collision);
        let row: Vec<u8> = (8..16).map(|x| graphics.pixel(x, 2)).collect();
        assert_eq!(row, vec![1, 0, 1, 0, 1, 0, 1, 1]);
        assert_eq!(graphics.pixel(7, 2), 0);
        assert_eq!(graphics.pixel(16, 2), 0);
        assert_eq!(lit(&graphics), 5);
    }

    #[test]
    fn test_draw_multiple_rows() {
        let mut graphics = Graphics::new();
        graphics.draw_sprite(0, 0, &[0x80, 0x40, 0x20]);
        assert_eq!(graphics.pixel(0, 0), 1);
        assert_eq!(graphics.pixel(1, 1), 1);
        assert_eq!(graphics.pixel(2, 2), 1);
        assert_eq!(lit(&graphics), 3);
    }

    #[test]
    fn test_redraw_restores_and_collides() {
        let mut graphics = Graphics::new();
        graphics.draw_sprite(3, 4, &[0xFF, 0x81]);
        let before = Graphics::new();
        assert!(graphics.draw_sprite(3, 4, &[0xFF, 0x81]));
        assert_eq!(graphics, before);
    }

    #[test]
    fn test_partial_overlap_collides() {
        let mut graphics = Graphics::new();
        graphics.draw_sprite(0, 0, &[0x01]);
        assert!(graphics.draw_sprite(7, 0, &[0xC0]));
        assert_eq!(graphics.pixel(7, 0), 0);
        assert_eq!(graphics.pixel(8, 0), 1);
    }

    #[test]
    fn test_no_collision_on_disjoint_pixels() {
        let mut graphics = Graphics::new();
        graphics.draw_sprite(0, 0, &[0xF0]);
        assert!(!graphics.draw_sprite(0, 0, &[0x0F]));
        assert_eq!(lit(&graphics), 8);
    }

    #[test]
    fn test_wraps_horizontally() {
        let mut graphics = Graphics::new();
        graphics.draw_sprite(60, 0, &[0xFF]);
        for x in 60..64 {
            assert_eq!(graphics.pixel(x, 0), 1);
        }
        for x in 0..4 {
            assert_eq!(graphics.pixel(x, 0), 1);
        }
        assert_eq!(lit(&graphics), 8);
    }

    #[test]
    fn test_wraps_vertically() {
        let mut graphics = Graphics::new();
        graphics.draw_sprite(0, 31, &[0x80, 0x80]);
        assert_eq!(graphics.pixel(0, 31), 1);
        assert_eq!(graphics.pixel(0, 0), 1);
    }

    #[test]
    fn test_origin_beyond_edges_wraps() {
        let mut wrapped = Graphics::new();
        let mut plain = Graphics::new();
        wrapped.draw_sprite(64 + 5, 32 + 7, &[0xC3, 0x3C]);
        plain.draw_sprite(5, 7, &[0xC3, 0x3C]);
        assert_eq!(wrapped, plain);
    }

    #[test]
    fn test_clear() {
        let mut graphics = Graphics::new();
        graphics.draw_sprite(10, 10, &[0xFF; 15]);
        graphics.clear();
        assert_eq!(lit(&graphics), 0);
    }

    #[test]
    fn test_rows() {
        let mut graphics = Graphics::new();
        graphics.draw_sprite(0, 1, &[0x80]);
        let rows: Vec<&[u8]> = graphics.rows().collect();
        assert_eq!(rows.len(), 32);
        assert_eq!(rows[1][0], 1);
        assert_eq!(rows[0][0], 0);
    }
}
