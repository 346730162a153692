use log::{trace, warn};

use crate::constants::{PROGRAM_END, PROGRAM_START, REGISTER_COUNT, STACK_SIZE};
use crate::devices::Keypad;
use crate::display::Display;
use crate::error::Fault;
use crate::instruction::Instruction;
use crate::memory::{check_block, Memory};
use crate::opcode::Opcode;

/// Where execution continues once an instruction has run
enum Flow {
    Next,
    Skip,
    Jump(u16),
}

impl Flow {
    fn skip_if(condition: bool) -> Self {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

/// # CPU
///
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow, shift and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, starting at `0x200`
///
/// Stack
/// - (sp) the number of return addresses on the stack
/// - (stack) up to 16 return addresses
///
/// Timers
/// - 2 8-bit timers (delay & sound) counted down at 60Hz by the driving loop
///
/// Control
/// - while `paused` a step only runs if `single_step` was requested, and
///   consumes that request
#[derive(Debug, Clone)]
pub struct Cpu {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub instruction: Opcode,
    pub paused: bool,
    pub single_step: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            instruction: Opcode(0),
            paused: false,
            single_step: false,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.single_step = false;
    }

    /// Lets exactly one instruction run while paused
    pub fn request_step(&mut self) {
        self.single_step = true;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Counts both timers down once
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn fetch(&self, memory: &Memory) -> Result<Opcode, Fault> {
        let pc = self.pc as usize;
        Ok(Opcode::from_bytes(memory.read(pc)?, memory.read(pc + 1)?))
    }

    /// Advances the CPU by a single instruction.
    ///
    /// On a fault the machine is left as it was at the failing access, which
    /// may be part way through the instruction; the run should not continue.
    pub fn execute_one(
        &mut self,
        memory: &mut Memory,
        display: &mut Display,
        keypad: &mut dyn Keypad,
    ) -> Result<(), Fault> {
        if self.paused {
            if !self.single_step {
                return Ok(());
            }
            self.single_step = false;
        }

        self.instruction = self.fetch(memory)?;
        trace!(
            "{:04X} {} v{:02X?} i{:04X} dt{:02X} st{:02X} sp{:X} top{:04X}",
            self.pc,
            self.instruction,
            self.v,
            self.i,
            self.delay_timer,
            self.sound_timer,
            self.sp,
            self.stack[(self.sp as usize).saturating_sub(1)],
        );

        let flow = self.execute(Instruction::decode(self.instruction), memory, display, keypad)?;
        self.pc = match flow {
            Flow::Next => self.pc.wrapping_add(2),
            Flow::Skip => self.pc.wrapping_add(4),
            Flow::Jump(addr) => addr,
        };
        Ok(())
    }

    fn execute(
        &mut self,
        instruction: Instruction,
        memory: &mut Memory,
        display: &mut Display,
        keypad: &mut dyn Keypad,
    ) -> Result<Flow, Fault> {
        use Instruction::*;

        let flow = match instruction {
            Cls => {
                display.clear();
                Flow::Next
            }
            Ret => {
                let top = self.sp.checked_sub(1).ok_or(Fault::StackUnderflow)?;
                let caller = *self
                    .stack
                    .get(top as usize)
                    .ok_or(Fault::StackUnderflow)?;
                self.sp = top;
                Flow::Jump(caller.wrapping_add(2))
            }
            Sys(_) => Flow::Next,
            Jump(nnn) => Flow::Jump(nnn),
            Call(nnn) => {
                if self.sp as usize >= STACK_SIZE {
                    return Err(Fault::StackOverflow);
                }
                self.stack[self.sp as usize] = self.pc;
                self.sp += 1;
                Flow::Jump(nnn)
            }
            SkipEqByte(x, kk) => Flow::skip_if(self.vx(x) == kk),
            SkipNeByte(x, kk) => Flow::skip_if(self.vx(x) != kk),
            SkipEqReg(x, y) => Flow::skip_if(self.vx(x) == self.vx(y)),
            SkipNeReg(x, y) => Flow::skip_if(self.vx(x) != self.vx(y)),
            LoadByte(x, kk) => {
                self.set(x, kk);
                Flow::Next
            }
            AddByte(x, kk) => {
                self.set(x, self.vx(x).wrapping_add(kk));
                Flow::Next
            }
            Move(x, y) => {
                self.set(x, self.vx(y));
                Flow::Next
            }
            Or(x, y) => {
                self.set(x, self.vx(x) | self.vx(y));
                Flow::Next
            }
            And(x, y) => {
                self.set(x, self.vx(x) & self.vx(y));
                Flow::Next
            }
            Xor(x, y) => {
                self.set(x, self.vx(x) ^ self.vx(y));
                Flow::Next
            }
            AddReg(x, y) => {
                let (res, over) = self.vx(x).overflowing_add(self.vx(y));
                self.set_with_flag(x, res, over);
                Flow::Next
            }
            Sub(x, y) => {
                let (res, under) = self.vx(x).overflowing_sub(self.vx(y));
                self.set_with_flag(x, res, !under);
                Flow::Next
            }
            SubN(x, y) => {
                let (res, under) = self.vx(y).overflowing_sub(self.vx(x));
                self.set_with_flag(x, res, !under);
                Flow::Next
            }
            Shr(x) => {
                let vx = self.vx(x);
                self.set_with_flag(x, vx >> 1, vx & 0x1 == 0x1);
                Flow::Next
            }
            Shl(x) => {
                let vx = self.vx(x);
                self.set_with_flag(x, vx << 1, vx & 0x80 == 0x80);
                Flow::Next
            }
            LoadI(nnn) => {
                self.i = nnn;
                Flow::Next
            }
            JumpV0(nnn) => Flow::Jump(u16::from(self.v[0x0]) + nnn),
            Random(x, kk) => {
                let rand_byte: u8 = rand::random();
                self.set(x, rand_byte & kk);
                Flow::Next
            }
            Draw(x, y, n) => {
                self.draw(x, y, n, memory, display)?;
                Flow::Next
            }
            SkipKeyDown(x) => Flow::skip_if(keypad.is_down(self.vx(x))),
            SkipKeyUp(x) => Flow::skip_if(!keypad.is_down(self.vx(x))),
            LoadDelay(x) => {
                self.set(x, self.delay_timer);
                Flow::Next
            }
            WaitKey(x) => {
                let key = keypad.wait_key()?;
                self.set(x, key);
                Flow::Next
            }
            SetDelay(x) => {
                self.delay_timer = self.vx(x);
                Flow::Next
            }
            SetSound(x) => {
                self.sound_timer = self.vx(x);
                Flow::Next
            }
            AddI(x) => {
                self.i = self.i.wrapping_add(u16::from(self.vx(x)));
                Flow::Next
            }
            LoadSprite(x) => {
                if let Some(addr) = Memory::sprite_address(self.vx(x)) {
                    self.i = addr;
                }
                Flow::Next
            }
            Bcd(x) => {
                if self.i >= PROGRAM_END - 2 {
                    return Err(Fault::OutOfBounds {
                        address: self.i as usize,
                    });
                }
                let vx = self.vx(x);
                let addr = self.i as usize;
                memory.write(addr, vx / 100 % 10)?;
                memory.write(addr + 1, vx / 10 % 10)?;
                memory.write(addr + 2, vx % 10)?;
                Flow::Next
            }
            Store(x) => {
                for r in 0..=x as usize {
                    let addr = self.i as usize + r;
                    check_block(addr)?;
                    memory.write(addr, self.v[r])?;
                }
                Flow::Next
            }
            Read(x) => {
                for r in 0..=x as usize {
                    let addr = self.i as usize + r;
                    check_block(addr)?;
                    self.v[r] = memory.read(addr)?;
                }
                Flow::Next
            }
            Illegal(op) => {
                warn!("Ignoring illegal opcode {} at {:04X}", op, self.pc);
                Flow::Next
            }
        };
        Ok(flow)
    }

    /// XORs an n-row sprite from memory I.. at (Vx, Vy); VF is set if any pixel was erased
    fn draw(
        &mut self,
        x: u8,
        y: u8,
        n: u8,
        memory: &Memory,
        display: &mut Display,
    ) -> Result<(), Fault> {
        let (x, y) = (self.vx(x) as usize, self.vx(y) as usize);
        self.v[0xF] = 0x0;
        for row in 0..n as usize {
            let byte = memory.read(self.i as usize + row)?;
            if display.draw_sprite(x, y + row, byte) {
                self.v[0xF] = 0x1;
            }
        }
        Ok(())
    }

    fn vx(&self, x: u8) -> u8 {
        self.v[x as usize]
    }

    fn set(&mut self, x: u8, value: u8) {
        self.v[x as usize] = value;
    }

    /// The flag goes in last so that it wins when x is F
    fn set_with_flag(&mut self, x: u8, value: u8, flag: bool) {
        self.v[x as usize] = value;
        self.v[0xF] = flag as u8;
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
