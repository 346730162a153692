use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::devices::Screen;
use crate::error::Fault;

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # Display
/// The Chip-8 display is composed of 64x32 black/white pixels.
///
/// Pixels are only ever toggled, so the state of each one is the XOR of every
/// sprite drawn over it since the last clear. Coordinates wrap around the
/// edges of the grid.
///
/// The surface owns no I/O; a `Screen` only gets a call to `present` when the
/// frame has changed since it was last shown.
#[derive(Clone)]
pub struct Display {
    frame_buffer: FrameBuffer,
    draw_flag: bool,
}

impl Display {
    pub fn new() -> Self {
        Display {
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
        }
    }

    pub fn clear(&mut self) {
        self.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.draw_flag = true;
    }

    /// Toggles a single pixel, returning whether it was already set
    pub fn draw_pixel(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.frame_buffer[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH];
        let collision = *pixel;
        *pixel = !*pixel;
        self.draw_flag = true;
        collision
    }

    /// XORs one sprite row onto the surface, most significant bit leftmost.
    ///
    /// # Arguments
    /// * `x` column of the leftmost bit
    /// * `y` row to draw on
    /// * `row` 8 horizontal pixels
    ///
    /// Returns true if any lit pixel was erased.
    pub fn draw_sprite(&mut self, x: usize, y: usize, row: u8) -> bool {
        let mut collision = false;
        for bit in 0..8 {
            if (row >> (7 - bit)) & 0x1 == 0x1 {
                collision |= self.draw_pixel(x + bit, y);
            }
        }
        collision
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.frame_buffer[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Whether the frame changed since it was last presented
    pub fn is_dirty(&self) -> bool {
        self.draw_flag
    }

    /// Pushes every pixel to the `screen` and flushes it if anything changed.
    pub fn present(&mut self, screen: &mut dyn Screen) -> Result<(), Fault> {
        if !self.draw_flag {
            return Ok(());
        }
        for (y, row) in self.frame_buffer.iter().enumerate() {
            for (x, lit) in row.iter().enumerate() {
                screen.set_pixel(x, y, *lit)?;
            }
        }
        screen.flush()?;
        self.draw_flag = false;
        Ok(())
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Remembers what was last pushed to it
    struct RecordingScreen {
        frame: FrameBuffer,
        flushes: usize,
        fail: bool,
    }

    impl RecordingScreen {
        fn new() -> Self {
            RecordingScreen {
                frame: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
                flushes: 0,
                fail: false,
            }
        }
    }

    impl Screen for RecordingScreen {
        fn set_pixel(&mut self, x: usize, y: usize, lit: bool) -> Result<(), Fault> {
            if self.fail {
                return Err(Fault::Subsystem("renderer went away".to_string()));
            }
            self.frame[y][x] = lit;
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Fault> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_double_draw_restores_pixel_and_collides() {
        for &(x, y) in [(0, 0), (63, 31), (17, 9)].iter() {
            let mut display = Display::new();
            assert!(!display.draw_sprite(x, y, 0x80));
            assert!(display.pixel(x, y));
            assert!(display.draw_sprite(x, y, 0x80));
            assert!(!display.pixel(x, y));
        }
    }

    #[test]
    fn test_sprite_row_is_msb_first() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, 0b1010_0000);
        assert_eq!(display.frame()[0][0..4], [true, false, true, false]);
    }

    #[test]
    fn test_draw_wraps_around_edges() {
        let mut display = Display::new();
        display.draw_sprite(62, 33, 0xF0);
        assert!(display.pixel(62, 1));
        assert!(display.pixel(63, 1));
        assert!(display.frame()[1][0]);
        assert!(display.frame()[1][1]);
    }

    #[test]
    fn test_collision_only_for_lit_pixels() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, 0xF0);
        assert!(!display.draw_sprite(4, 0, 0xF0));
        assert!(display.draw_sprite(3, 0, 0x80));
    }

    #[test]
    fn test_clear() {
        let mut display = Display::new();
        display.draw_sprite(8, 8, 0xFF);
        display.clear();
        assert!(display.frame().iter().flatten().all(|p| !p));
        assert!(display.is_dirty());
    }

    #[test]
    fn test_present_only_when_dirty() {
        let mut display = Display::new();
        let mut screen = RecordingScreen::new();

        display.present(&mut screen).unwrap();
        assert_eq!(screen.flushes, 0);

        display.draw_sprite(1, 2, 0x80);
        display.present(&mut screen).unwrap();
        assert_eq!(screen.flushes, 1);
        assert!(screen.frame[2][1]);
        assert!(!display.is_dirty());

        display.present(&mut screen).unwrap();
        assert_eq!(screen.flushes, 1);
    }

    #[test]
    fn test_present_failure_keeps_frame_dirty() {
        let mut display = Display::new();
        let mut screen = RecordingScreen::new();
        screen.fail = true;
        display.clear();
        assert!(matches!(
            display.present(&mut screen),
            Err(Fault::Subsystem(_))
        ));
        assert!(display.is_dirty());
    }
}
