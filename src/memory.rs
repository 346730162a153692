use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::info;

use crate::constants::{
    MEMORY_SIZE, PROGRAM_CAPACITY, PROGRAM_END, PROGRAM_START, SPRITE_LEN, SPRITE_SHEET,
};
use crate::error::Fault;

/// # Memory
/// 4096 bytes of addressable memory.
///
/// - `0x000..0x050` holds the font sprites for the hex digits 0..F
/// - `0x200..=0xFFF` holds the loaded program
///
/// Reads and writes are bounds checked; anything past `0xFFF` is a fault
/// rather than a panic.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
    program_len: usize,
}

impl Memory {
    /// Zero filled, font not yet loaded
    pub fn new() -> Self {
        Memory {
            bytes: [0; MEMORY_SIZE],
            program_len: 0,
        }
    }

    /// Writes the sprite sheet into the bottom of memory
    pub fn load_font(&mut self) {
        self.bytes[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
    }

    /// Base address of the font sprite for a hex `digit`
    pub fn sprite_address(digit: u8) -> Option<u16> {
        if digit <= 0xF {
            Some(u16::from(digit) * SPRITE_LEN)
        } else {
            None
        }
    }

    /// Load a program from some source into `0x200..`
    ///
    /// # Arguments
    /// * `reader` a source containing a raw ROM image
    pub fn load_program(&mut self, reader: &mut dyn Read) -> Result<(), Fault> {
        self.load_program_from(reader, "program")
    }

    /// Load a program from a file on disk
    pub fn load_program_file(&mut self, path: &Path) -> Result<(), Fault> {
        let file = File::open(path)
            .map_err(|e| Fault::io(format!("could not open file {}", path.display()), e))?;
        self.load_program_from(&mut BufReader::new(file), &format!("file {}", path.display()))
    }

    fn load_program_from(&mut self, reader: &mut dyn Read, source: &str) -> Result<(), Fault> {
        let mut rom = Vec::with_capacity(PROGRAM_CAPACITY);
        // read one byte past capacity so oversized programs are detected
        reader
            .take(PROGRAM_CAPACITY as u64 + 1)
            .read_to_end(&mut rom)
            .map_err(|e| Fault::io(format!("could not read {}", source), e))?;
        if rom.len() > PROGRAM_CAPACITY {
            return Err(Fault::ProgramTooLarge {
                size: rom.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + rom.len()].copy_from_slice(&rom);
        self.program_len = rom.len();
        info!("Loaded program [size: {}]", rom.len());
        Ok(())
    }

    pub fn program_len(&self) -> usize {
        self.program_len
    }

    /// Zeroes the program region, keeping the font
    pub fn reset(&mut self) {
        for byte in self.bytes[PROGRAM_START as usize..].iter_mut() {
            *byte = 0;
        }
        self.program_len = 0;
    }

    pub fn read(&self, addr: usize) -> Result<u8, Fault> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Fault::OutOfBounds { address: addr })
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        let byte = self
            .bytes
            .get_mut(addr)
            .ok_or(Fault::OutOfBounds { address: addr })?;
        *byte = value;
        Ok(())
    }

    /// The whole address space, for snapshots
    pub fn bytes(&self) -> &[u8; MEMORY_SIZE] {
        &self.bytes
    }

    /// Replaces the whole address space, as a savestate restore does
    pub fn overwrite(&mut self, bytes: &[u8; MEMORY_SIZE]) {
        self.bytes.copy_from_slice(bytes);
    }

    /// Writes a human readable hex dump, 8 bytes per line
    ///
    /// ```text
    /// @000    f0 90 90 90 f0 20 60 20
    /// ```
    pub fn dump(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        for (line, chunk) in self.bytes.chunks(8).enumerate() {
            write!(writer, "@{:03x}    ", line * 8)?;
            for byte in chunk {
                write!(writer, "{:02x} ", byte)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Block copies to and from memory must stay below `PROGRAM_END`
pub(crate) fn check_block(addr: usize) -> Result<(), Fault> {
    if addr >= PROGRAM_END as usize {
        Err(Fault::OutOfBounds { address: addr })
    } else {
        Ok(())
    }
}
