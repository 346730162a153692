/// Total addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// ROMs are loaded here and execution starts here
pub const PROGRAM_START: u16 = 0x200;

/// Last addressable byte; also the exclusive upper bound for `Fx33`/`Fx55`/`Fx65`
pub const PROGRAM_END: u16 = 0xFFF;

/// Largest program that fits between `PROGRAM_START` and `PROGRAM_END`
pub const PROGRAM_CAPACITY: usize = (PROGRAM_END - PROGRAM_START + 1) as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

pub const STACK_SIZE: usize = 16;
pub const REGISTER_COUNT: usize = 16;
pub const KEY_COUNT: u8 = 16;

/// Default CPU frequency in Hz
pub const CLOCK_SPEED: u32 = 500;

/// Delay and sound timers always count down at 60Hz
pub const TIMER_SPEED: u32 = 60;

pub const MAX_BREAKPOINTS: usize = 16;

/// Each font sprite is 5 rows tall
pub const SPRITE_LEN: u16 = 5;

/// Sprites for the hex digits 0..F, stored from address 0x000
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
