use crate::opcode::Opcode;

/// A decoded Chip-8 instruction with its operands.
///
/// Register operands are nibbles (`0x0..=0xF`), addresses are 12 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0: clear the display
    Cls,
    /// 00EE: return from a subroutine
    Ret,
    /// 0nnn: machine code routine; ignored
    Sys(u16),
    /// 1nnn: PC = nnn
    Jump(u16),
    /// 2nnn: STACK.push(PC); PC = nnn
    Call(u16),
    /// 3xkk: skip if Vx == kk
    SkipEqByte(u8, u8),
    /// 4xkk: skip if Vx != kk
    SkipNeByte(u8, u8),
    /// 5xy0: skip if Vx == Vy
    SkipEqReg(u8, u8),
    /// 6xkk: Vx = kk
    LoadByte(u8, u8),
    /// 7xkk: Vx += kk
    AddByte(u8, u8),
    /// 8xy0: Vx = Vy
    Move(u8, u8),
    /// 8xy1: Vx |= Vy
    Or(u8, u8),
    /// 8xy2: Vx &= Vy
    And(u8, u8),
    /// 8xy3: Vx ^= Vy
    Xor(u8, u8),
    /// 8xy4: Vx += Vy; VF = carry
    AddReg(u8, u8),
    /// 8xy5: Vx -= Vy; VF = !borrow
    Sub(u8, u8),
    /// 8xy6: Vx >>= 1; VF = shifted out bit
    Shr(u8),
    /// 8xy7: Vx = Vy - Vx; VF = !borrow
    SubN(u8, u8),
    /// 8xyE: Vx <<= 1; VF = shifted out bit
    Shl(u8),
    /// 9xy0: skip if Vx != Vy
    SkipNeReg(u8, u8),
    /// Annn: I = nnn
    LoadI(u16),
    /// Bnnn: PC = V0 + nnn
    JumpV0(u16),
    /// Cxkk: Vx = random & kk
    Random(u8, u8),
    /// Dxyn: draw n rows from I at (Vx, Vy)
    Draw(u8, u8, u8),
    /// Ex9E: skip if key Vx is down
    SkipKeyDown(u8),
    /// ExA1: skip if key Vx is up
    SkipKeyUp(u8),
    /// Fx07: Vx = DT
    LoadDelay(u8),
    /// Fx0A: Vx = next key press
    WaitKey(u8),
    /// Fx15: DT = Vx
    SetDelay(u8),
    /// Fx18: ST = Vx
    SetSound(u8),
    /// Fx1E: I += Vx
    AddI(u8),
    /// Fx29: I = address of sprite Vx
    LoadSprite(u8),
    /// Fx33: mem[I..I+3] = bcd(Vx)
    Bcd(u8),
    /// Fx55: mem[I..=I+x] = V0..=Vx
    Store(u8),
    /// Fx65: V0..=Vx = mem[I..=I+x]
    Read(u8),
    /// Anything else; executes as a no-op
    Illegal(Opcode),
}

impl Instruction {
    /// Selects the Instruction for a given Opcode
    pub fn decode(op: Opcode) -> Self {
        use Instruction::*;

        let (x, y, n, kk, nnn) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys(nnn),
            (0x1, ..) => Jump(nnn),
            (0x2, ..) => Call(nnn),
            (0x3, ..) => SkipEqByte(x, kk),
            (0x4, ..) => SkipNeByte(x, kk),
            (0x5, .., 0x0) => SkipEqReg(x, y),
            (0x6, ..) => LoadByte(x, kk),
            (0x7, ..) => AddByte(x, kk),
            (0x8, .., 0x0) => Move(x, y),
            (0x8, .., 0x1) => Or(x, y),
            (0x8, .., 0x2) => And(x, y),
            (0x8, .., 0x3) => Xor(x, y),
            (0x8, .., 0x4) => AddReg(x, y),
            (0x8, .., 0x5) => Sub(x, y),
            (0x8, .., 0x6) => Shr(x),
            (0x8, .., 0x7) => SubN(x, y),
            (0x8, .., 0xE) => Shl(x),
            (0x9, .., 0x0) => SkipNeReg(x, y),
            (0xA, ..) => LoadI(nnn),
            (0xB, ..) => JumpV0(nnn),
            (0xC, ..) => Random(x, kk),
            (0xD, ..) => Draw(x, y, n),
            (0xE, .., 0x9, 0xE) => SkipKeyDown(x),
            (0xE, .., 0xA, 0x1) => SkipKeyUp(x),
            (0xF, .., 0x0, 0x7) => LoadDelay(x),
            (0xF, .., 0x0, 0xA) => WaitKey(x),
            (0xF, .., 0x1, 0x5) => SetDelay(x),
            (0xF, .., 0x1, 0x8) => SetSound(x),
            (0xF, .., 0x1, 0xE) => AddI(x),
            (0xF, .., 0x2, 0x9) => LoadSprite(x),
            (0xF, .., 0x3, 0x3) => Bcd(x),
            (0xF, .., 0x5, 0x5) => Store(x),
            (0xF, .., 0x6, 0x5) => Read(x),
            _ => Illegal(op),
        }
    }
}
