//! Capabilities the machine borrows from whatever is hosting it.
//!
//! The core never talks to a window, a sound card or a keyboard directly;
//! the driving loop hands it something implementing these traits instead.

use crate::error::Fault;

/// Logical hex keypad, keys `0x0..=0xF`
pub trait Keypad {
    fn is_down(&self, key: u8) -> bool;

    /// Blocks until a key is pressed and returns it.
    ///
    /// May fail with `Fault::QuitRequested` if the user leaves while waiting.
    fn wait_key(&mut self) -> Result<u8, Fault>;
}

/// Receives pixel updates from a `Display`
pub trait Screen {
    fn set_pixel(&mut self, x: usize, y: usize, lit: bool) -> Result<(), Fault>;

    /// Makes every pixel set since the last flush visible
    fn flush(&mut self) -> Result<(), Fault>;
}

/// A continuous tone driven by the sound timer
pub trait Speaker {
    fn start_tone(&mut self) -> Result<(), Fault>;
    fn stop_tone(&mut self);
}
