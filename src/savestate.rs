use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, REGISTER_COUNT, STACK_SIZE};
use crate::cpu::Cpu;
use crate::display::Display;
use crate::error::{Fault, Tag};
use crate::memory::Memory;

pub const HEADER: [u8; 4] = *b"K8E\0";
pub const FOOTER: [u8; 4] = *b"FIN\0";

/// Bytes per packed display row
const ROW_BYTES: usize = DISPLAY_WIDTH / 8;

/// Size of a complete savestate image
pub const SAVESTATE_LEN: usize = HEADER.len()
    + REGISTER_COUNT
    + 2
    + 1
    + 1
    + 2
    + 1
    + STACK_SIZE * 2
    + MEMORY_SIZE
    + DISPLAY_HEIGHT * ROW_BYTES
    + FOOTER.len();

/// # SaveState
/// A snapshot of everything a program can observe: CPU registers, stack and
/// timers, all of memory and the display.
///
/// On disk it is a fixed 4415 byte little-endian image:
/// ```text
/// "K8E\0" V0..VF I DT ST PC SP STACK[16] RAM[4096] VIDEO[32][8] "FIN\0"
/// ```
/// Video rows are packed 8 pixels to a byte with bit 7 leftmost.
///
/// Pause state, the last fetched instruction and the program length are not
/// part of a snapshot.
#[derive(Clone, Debug)]
pub struct SaveState {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_SIZE],
    pub ram: [u8; MEMORY_SIZE],
    pub video: [[u8; ROW_BYTES]; DISPLAY_HEIGHT],
}

impl SaveState {
    /// Snapshots a machine without touching it
    pub fn capture(cpu: &Cpu, display: &Display, memory: &Memory) -> Self {
        let mut video = [[0; ROW_BYTES]; DISPLAY_HEIGHT];
        for (packed, row) in video.iter_mut().zip(display.frame().iter()) {
            for (byte, pixels) in packed.iter_mut().zip(row.chunks(8)) {
                *byte = pixels
                    .iter()
                    .fold(0, |acc, lit| (acc << 1) | u8::from(*lit));
            }
        }

        SaveState {
            v: cpu.v,
            i: cpu.i,
            delay_timer: cpu.delay_timer,
            sound_timer: cpu.sound_timer,
            pc: cpu.pc,
            sp: cpu.sp,
            stack: cpu.stack,
            ram: *memory.bytes(),
            video,
        }
    }

    /// Overwrites a machine with this snapshot.
    ///
    /// The display is cleared and each lit pixel drawn back in; collisions
    /// from those draws are thrown away so VF comes from the snapshot.
    pub fn restore(
        &self,
        cpu: &mut Cpu,
        display: &mut Display,
        memory: &mut Memory,
    ) -> Result<(), Fault> {
        if self.sp as usize > STACK_SIZE {
            return Err(Fault::MalformedSaveState(Tag::StackPointer));
        }

        cpu.v = self.v;
        cpu.i = self.i;
        cpu.delay_timer = self.delay_timer;
        cpu.sound_timer = self.sound_timer;
        cpu.pc = self.pc;
        cpu.sp = self.sp;
        cpu.stack = self.stack;

        memory.overwrite(&self.ram);

        display.clear();
        for (y, packed) in self.video.iter().enumerate() {
            for (b, byte) in packed.iter().enumerate() {
                display.draw_sprite(b * 8, y, *byte);
            }
        }

        debug!("Restored savestate [pc: {:04X}]", self.pc);
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SAVESTATE_LEN);
        out.extend_from_slice(&HEADER);
        out.extend_from_slice(&self.v);
        out.extend_from_slice(&self.i.to_le_bytes());
        out.push(self.delay_timer);
        out.push(self.sound_timer);
        out.extend_from_slice(&self.pc.to_le_bytes());
        out.push(self.sp);
        for entry in self.stack.iter() {
            out.extend_from_slice(&entry.to_le_bytes());
        }
        out.extend_from_slice(&self.ram);
        for row in self.video.iter() {
            out.extend_from_slice(row);
        }
        out.extend_from_slice(&FOOTER);
        out
    }

    /// Parses and validates a complete image; trailing bytes are ignored
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self, Fault> {
        Self::parse(&mut bytes, "savestate")
    }

    pub fn read_from(reader: &mut dyn Read) -> Result<Self, Fault> {
        Self::parse(reader, "savestate")
    }

    pub fn write_to(&self, writer: &mut dyn Write) -> Result<(), Fault> {
        writer
            .write_all(&self.to_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| Fault::io("could not write savestate", e))
    }

    pub fn load_file(path: &Path) -> Result<Self, Fault> {
        let file = File::open(path)
            .map_err(|e| Fault::io(format!("could not open file {}", path.display()), e))?;
        let state = Self::parse(&mut BufReader::new(file), &path.display().to_string())?;
        info!("Loaded savestate {}", path.display());
        Ok(state)
    }

    pub fn save_file(&self, path: &Path) -> Result<(), Fault> {
        let file = File::create(path)
            .map_err(|e| Fault::io(format!("could not open file {}", path.display()), e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&self.to_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| Fault::io(format!("could not write to file {}", path.display()), e))?;
        info!("Saved savestate {}", path.display());
        Ok(())
    }

    /// Reads every section into a staged snapshot; nothing is applied here
    fn parse(reader: &mut dyn Read, source: &str) -> Result<Self, Fault> {
        let mut sections = Sections { reader, source };

        if sections.take::<4>("Header")? != HEADER {
            return Err(Fault::MalformedSaveState(Tag::Header));
        }
        let v = sections.take::<REGISTER_COUNT>("V Registers")?;
        let i = u16::from_le_bytes(sections.take::<2>("I Register")?);
        let [delay_timer] = sections.take::<1>("Delay Timer")?;
        let [sound_timer] = sections.take::<1>("Sound Timer")?;
        let pc = u16::from_le_bytes(sections.take::<2>("PC")?);
        let [sp] = sections.take::<1>("SP")?;
        let mut stack = [0; STACK_SIZE];
        for entry in stack.iter_mut() {
            *entry = u16::from_le_bytes(sections.take::<2>("Stack")?);
        }
        let ram = sections.take::<MEMORY_SIZE>("RAM")?;
        let mut video = [[0; ROW_BYTES]; DISPLAY_HEIGHT];
        for row in video.iter_mut() {
            *row = sections.take::<ROW_BYTES>("Video")?;
        }
        if sections.take::<4>("Footer")? != FOOTER {
            return Err(Fault::MalformedSaveState(Tag::Footer));
        }
        if sp as usize > STACK_SIZE {
            return Err(Fault::MalformedSaveState(Tag::StackPointer));
        }

        Ok(SaveState {
            v,
            i,
            delay_timer,
            sound_timer,
            pc,
            sp,
            stack,
            ram,
            video,
        })
    }
}

/// Reads fixed size sections, naming the one that came up short
struct Sections<'r, 's> {
    reader: &'r mut dyn Read,
    source: &'s str,
}

impl Sections<'_, '_> {
    fn take<const N: usize>(&mut self, name: &str) -> Result<[u8; N], Fault> {
        let mut buf = [0; N];
        self.reader
            .read_exact(&mut buf)
            .map_err(|e| Fault::io(format!("could not read {} - {}", self.source, name), e))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;

    fn busy_machine() -> (Cpu, Display, Memory) {
        let mut cpu = Cpu::new();
        for (n, reg) in cpu.v.iter_mut().enumerate() {
            *reg = (n as u8 * 0x11).wrapping_add(0x10);
        }
        cpu.i = 0x0345;
        cpu.delay_timer = 0x12;
        cpu.sound_timer = 0x34;
        cpu.pc = 0x0456;
        cpu.sp = 0x2;
        cpu.stack[0] = 0x0222;
        cpu.stack[1] = 0x0888;

        let mut memory = Memory::new();
        memory.load_font();
        memory.write(0x200, 0xD1).unwrap();
        memory.write(0xFFF, 0xEE).unwrap();

        let mut display = Display::new();
        display.draw_sprite(0, 0, 0b1000_0001);
        display.draw_sprite(60, 31, 0xF0);
        display.draw_pixel(33, 17);

        (cpu, display, memory)
    }

    #[test]
    fn test_image_length_and_layout() {
        let (cpu, display, memory) = busy_machine();
        let bytes = SaveState::capture(&cpu, &display, &memory).to_bytes();
        assert_eq!(bytes.len(), 4415);
        assert_eq!(bytes.len(), SAVESTATE_LEN);
        assert_eq!(bytes[0..4], *b"K8E\0");
        assert_eq!(bytes[4], 0x10);
        // I, then both timers, then PC; all little-endian
        assert_eq!(bytes[20..22], [0x45, 0x03]);
        assert_eq!(bytes[22..24], [0x12, 0x34]);
        assert_eq!(bytes[24..26], [0x56, 0x04]);
        assert_eq!(bytes[26], 0x2);
        assert_eq!(bytes[27..29], [0x22, 0x02]);
        assert_eq!(bytes[59 + 0x200], 0xD1);
        // video starts after the RAM, bit 7 is the leftmost pixel
        assert_eq!(bytes[4155], 0b1000_0001);
        assert_eq!(bytes[4155 + 31 * 8 + 7], 0x0F);
        assert_eq!(bytes[4411..], *b"FIN\0");
    }

    #[test]
    fn test_capture_is_pure() {
        let (cpu, display, memory) = busy_machine();
        let before = *display.frame();
        let ram = *memory.bytes();
        SaveState::capture(&cpu, &display, &memory);
        assert_eq!(display.frame()[..], before[..]);
        assert_eq!(memory.bytes()[..], ram[..]);
        assert!(display.is_dirty());
    }

    #[test]
    fn test_round_trip_into_fresh_machine() {
        let (cpu, display, memory) = busy_machine();
        let bytes = SaveState::capture(&cpu, &display, &memory).to_bytes();

        let mut new_cpu = Cpu::new();
        let mut new_display = Display::new();
        let mut new_memory = Memory::new();
        SaveState::from_bytes(&bytes)
            .unwrap()
            .restore(&mut new_cpu, &mut new_display, &mut new_memory)
            .unwrap();

        assert_eq!(new_cpu.v, cpu.v);
        assert_eq!(new_cpu.i, cpu.i);
        assert_eq!(new_cpu.pc, cpu.pc);
        assert_eq!(new_cpu.sp, cpu.sp);
        assert_eq!(new_cpu.stack, cpu.stack);
        assert_eq!(new_cpu.delay_timer, cpu.delay_timer);
        assert_eq!(new_cpu.sound_timer, cpu.sound_timer);
        assert_eq!(new_memory.bytes()[..], memory.bytes()[..]);
        assert!(new_display
            .frame()
            .iter()
            .zip(display.frame().iter())
            .all(|(a, b)| a[..] == b[..]));
    }

    #[test]
    fn test_restore_replaces_existing_pixels() {
        let (cpu, display, memory) = busy_machine();
        let state = SaveState::capture(&cpu, &display, &memory);

        let (mut target_cpu, mut target_display, mut target_memory) = busy_machine();
        target_display.draw_pixel(5, 5);
        state
            .restore(&mut target_cpu, &mut target_display, &mut target_memory)
            .unwrap();
        assert!(!target_display.pixel(5, 5));
        assert!(target_display.pixel(0, 0));
        assert_eq!(target_cpu.v[0xF], 0x0F);
    }

    #[test]
    fn test_write_then_read() {
        let (cpu, display, memory) = busy_machine();
        let mut out = Vec::new();
        SaveState::capture(&cpu, &display, &memory)
            .write_to(&mut out)
            .unwrap();
        let state = SaveState::read_from(&mut out.as_slice()).unwrap();
        assert_eq!(state.pc, 0x0456);
        assert_eq!(state.to_bytes(), out);
    }

    #[test]
    fn test_bad_footer_is_rejected() {
        let (cpu, display, memory) = busy_machine();
        let mut bytes = SaveState::capture(&cpu, &display, &memory).to_bytes();
        bytes[4411..].copy_from_slice(b"FIX\0");
        let fault = SaveState::from_bytes(&bytes).unwrap_err();
        assert!(matches!(fault, Fault::MalformedSaveState(Tag::Footer)));
        assert_eq!(fault.kind(), FaultKind::Data);
    }

    #[test]
    fn test_bad_header_is_rejected() {
        let (cpu, display, memory) = busy_machine();
        let mut bytes = SaveState::capture(&cpu, &display, &memory).to_bytes();
        bytes[3] = b'!';
        assert!(matches!(
            SaveState::from_bytes(&bytes),
            Err(Fault::MalformedSaveState(Tag::Header))
        ));
    }

    #[test]
    fn test_stack_pointer_out_of_range_is_rejected() {
        let (cpu, display, memory) = busy_machine();
        let mut bytes = SaveState::capture(&cpu, &display, &memory).to_bytes();
        bytes[26] = 17;
        assert!(matches!(
            SaveState::from_bytes(&bytes),
            Err(Fault::MalformedSaveState(Tag::StackPointer))
        ));
    }

    #[test]
    fn test_restore_rejects_hand_built_stack_pointer() {
        let (cpu, display, memory) = busy_machine();
        let mut state = SaveState::capture(&cpu, &display, &memory);
        state.sp = 17;
        state.pc = 0x0ABC;
        state.ram[0x300] = 0x99;
        state.video = [[0; ROW_BYTES]; DISPLAY_HEIGHT];

        let (mut target_cpu, mut target_display, mut target_memory) = busy_machine();
        assert!(matches!(
            state.restore(&mut target_cpu, &mut target_display, &mut target_memory),
            Err(Fault::MalformedSaveState(Tag::StackPointer))
        ));
        assert_eq!(target_cpu.sp, 0x2);
        assert_eq!(target_cpu.pc, 0x0456);
        assert_eq!(target_memory.bytes()[..], memory.bytes()[..]);
        assert!(target_display.pixel(0, 0));
        assert!(target_display.pixel(33, 17));
    }

    #[test]
    fn test_truncated_image_names_the_section() {
        let (cpu, display, memory) = busy_machine();
        let bytes = SaveState::capture(&cpu, &display, &memory).to_bytes();
        let fault = SaveState::from_bytes(&bytes[..1000]).unwrap_err();
        assert_eq!(fault.kind(), FaultKind::Io);
        assert!(fault.to_string().contains("RAM"));

        let fault = SaveState::from_bytes(&bytes[..4413]).unwrap_err();
        assert!(fault.to_string().contains("Footer"));
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let (cpu, display, memory) = busy_machine();
        let mut bytes = SaveState::capture(&cpu, &display, &memory).to_bytes();
        bytes.extend_from_slice(&[0xFF; 8]);
        assert!(SaveState::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_missing_file_is_an_io_fault() {
        let fault = SaveState::load_file(Path::new("/nonexistent/k8e/state.k8e")).unwrap_err();
        assert_eq!(fault.kind(), FaultKind::Io);
        assert!(fault.to_string().contains("/nonexistent/k8e/state.k8e"));
    }
}
