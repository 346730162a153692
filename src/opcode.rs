use std::fmt;

/// # Opcodes
///
/// A raw 16-bit instruction word, fetched big-endian from two subsequent bytes.
/// Its behavior is cased on some combination of its nibbles `(a, b, c, d)`:
/// - `a` broad categorization; applies to all opcodes
/// - `d` or `(c, d)` specific behavior within a category
///
/// Nibbles not used to determine the operation carry data:
/// - `(b, c, d)` a 12-bit address `nnn`
/// - `(c, d)` a byte `kk` assigned to and/or compared with Vx
/// - `b` the register Vx, or the last register of a range V0..Vx
/// - `c` the register Vy
/// - `d` a sprite height `n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Joins the high and low bytes of an instruction.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode(u16::from(high) << 8 | u16::from(low))
    }

    /// Returns the Opcode's component nibbles, most significant first.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            ((self.0 & 0xF000) >> 12) as u8,
            self.x(),
            self.y(),
            self.n(),
        )
    }

    /// `[_x__]`
    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    /// `[__y_]`
    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    /// `[___n]`
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// `[__kk]`
    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// `[_nnn]`
    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}
