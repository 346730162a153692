use log::debug;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;

use k8e::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use k8e::{Config, Fault, Screen};

/// Bytes per pixel in an RGB24 texture
const RGB: usize = 3;

/// Lit and unlit pixel colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    foreground: [u8; RGB],
    background: [u8; RGB],
}

impl Palette {
    /// # Arguments
    /// * `foreground` colour of lit pixels as 0xRRGGBB
    /// * `background` colour of unlit pixels as 0xRRGGBB
    pub fn new(foreground: u32, background: u32) -> Self {
        Palette {
            foreground: Palette::split(foreground),
            background: Palette::split(background),
        }
    }

    fn split(hex: u32) -> [u8; RGB] {
        let [_, r, g, b] = hex.to_be_bytes();
        [r, g, b]
    }

    pub fn color(&self, lit: bool) -> [u8; RGB] {
        if lit {
            self.foreground
        } else {
            self.background
        }
    }
}

/// # Display
/// The Chip-8 display is composed of 64x32 pixels, each drawn as a `scale`
/// sized square in the foreground or background colour.
///
/// Pixels pushed through `set_pixel` collect in an RGB24 buffer that only
/// reaches the window on `flush`.
pub struct Window {
    canvas: WindowCanvas,
    buffer: Vec<u8>,
    palette: Palette,
}

impl Window {
    /// Creates a new window bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `config` colours and pixel scale
    pub fn new(sdl: &sdl2::Sdl, config: &Config) -> Result<Self, Fault> {
        let video_subsystem = sdl
            .video()
            .map_err(|e| Fault::Init(format!("video subsystem: {}", e)))?;
        let window = video_subsystem
            .window(
                "K8E",
                DISPLAY_WIDTH as u32 * config.scale,
                DISPLAY_HEIGHT as u32 * config.scale,
            )
            .position_centered()
            .build()
            .map_err(|e| Fault::Init(format!("window: {}", e)))?;
        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| Fault::Init(format!("renderer: {}", e)))?;
        debug!("Opened window [scale: {}]", config.scale);

        let palette = Palette::new(config.foreground, config.background);
        Ok(Window {
            canvas,
            buffer: blank_frame(palette),
            palette,
        })
    }
}

/// An RGB24 buffer with every pixel unlit
fn blank_frame(palette: Palette) -> Vec<u8> {
    palette
        .color(false)
        .iter()
        .copied()
        .cycle()
        .take(DISPLAY_WIDTH * DISPLAY_HEIGHT * RGB)
        .collect()
}

/// Offset of a pixel's first channel in an RGB24 buffer
fn offset(x: usize, y: usize) -> Option<usize> {
    if x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT {
        Some((y * DISPLAY_WIDTH + x) * RGB)
    } else {
        None
    }
}

impl Screen for Window {
    fn set_pixel(&mut self, x: usize, y: usize, lit: bool) -> Result<(), Fault> {
        let start = offset(x, y)
            .ok_or_else(|| Fault::Subsystem(format!("pixel ({}, {}) is off screen", x, y)))?;
        self.buffer[start..start + RGB].copy_from_slice(&self.palette.color(lit));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Fault> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| Fault::Subsystem(e.to_string()))?;
        texture
            .update(None, &self.buffer, DISPLAY_WIDTH * RGB)
            .map_err(|e| Fault::Subsystem(e.to_string()))?;
        self.canvas
            .copy(&texture, None, None)
            .map_err(Fault::Subsystem)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_splits_channels() {
        let palette = Palette::new(0x12AB34, 0x000000);
        assert_eq!(palette.color(true), [0x12, 0xAB, 0x34]);
        assert_eq!(palette.color(false), [0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_blank_frame() {
        let frame = blank_frame(Palette::new(0xFFFFFF, 0x102030));
        assert_eq!(frame.len(), 6144);
        assert_eq!(frame[0..6], [0x10, 0x20, 0x30, 0x10, 0x20, 0x30]);
        assert_eq!(frame[6141..], [0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_offsets_are_row_major() {
        assert_eq!(offset(0, 0), Some(0));
        assert_eq!(offset(1, 0), Some(3));
        assert_eq!(offset(0, 1), Some(192));
        assert_eq!(offset(63, 31), Some(6141));
        assert_eq!(offset(64, 0), None);
        assert_eq!(offset(0, 32), None);
    }
}
