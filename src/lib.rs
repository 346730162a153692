pub use chip8::Chip8;
pub use clock::Clock;
pub use config::Config;
pub use devices::{Keypad, Screen, Speaker};
pub use error::{Fault, FaultKind, Tag};
pub use savestate::SaveState;

mod chip8;
mod clock;
mod config;
pub mod constants;
pub mod cpu;
mod devices;
pub mod display;
mod error;
pub mod instruction;
pub mod memory;
pub mod opcode;
pub mod savestate;
