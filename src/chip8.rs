use std::io::{Read, Write};
use std::path::Path;

use crate::cpu::Cpu;
use crate::devices::{Keypad, Screen};
use crate::display::Display;
use crate::error::Fault;
use crate::memory::Memory;
use crate::savestate::SaveState;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns:
///  - the `cpu` with its registers, stack and timers
///  - `memory`, with the font loaded from the start
///  - the `display` surface
///
/// Supplies interfaces for:
/// - loading programs and savestates
/// - advancing the CPU and its timers
/// - pushing the display out to some `Screen`
/// - dumping memory for inspection
///
/// The driving loop owns a `Chip8` and lends it out by `&mut` for each call;
/// collaborators are passed in per call and never retained.
pub struct Chip8 {
    pub cpu: Cpu,
    pub memory: Memory,
    pub display: Display,
}

impl Chip8 {
    pub fn new() -> Self {
        let mut memory = Memory::new();
        memory.load_font();
        Chip8 {
            cpu: Cpu::new(),
            memory,
            display: Display::new(),
        }
    }

    /// Load a program from some source
    ///
    /// # Arguments
    /// * `reader` a reader that contains a ROM
    pub fn load_program(&mut self, reader: &mut dyn Read) -> Result<(), Fault> {
        self.memory.load_program(reader)
    }

    pub fn load_program_file(&mut self, path: &Path) -> Result<(), Fault> {
        self.memory.load_program_file(path)
    }

    /// Advances the CPU by a single instruction
    pub fn step(&mut self, keypad: &mut dyn Keypad) -> Result<(), Fault> {
        self.cpu
            .execute_one(&mut self.memory, &mut self.display, keypad)
    }

    /// Counts the timers down once; returns whether the tone should keep playing
    pub fn tick_timers(&mut self) -> bool {
        self.cpu.tick_timers();
        self.sound_active()
    }

    pub fn sound_active(&self) -> bool {
        self.cpu.sound_timer > 0
    }

    /// Pushes the display to `screen` if it changed since the last call
    pub fn present(&mut self, screen: &mut dyn Screen) -> Result<(), Fault> {
        self.display.present(screen)
    }

    pub fn capture(&self) -> SaveState {
        SaveState::capture(&self.cpu, &self.display, &self.memory)
    }

    pub fn restore(&mut self, state: &SaveState) -> Result<(), Fault> {
        state.restore(&mut self.cpu, &mut self.display, &mut self.memory)
    }

    pub fn dump_ram(&self, writer: &mut dyn Write) -> Result<(), Fault> {
        self.memory
            .dump(writer)
            .map_err(|e| Fault::io("could not write RAM dump", e))
    }

    pub fn pc(&self) -> u16 {
        self.cpu.pc
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
