/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, fetched big-endian from two consecutive bytes of memory.
/// Their behavior is cased on some combination of:
/// - `(n, _, _, _)` the instruction family; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within families 0x5, 0x8 and 0x9
/// - `(_, _, n, n)` specific behavior within families 0xE and 0xF
/// - `(_, n, n, n)` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// Nibbles not used to determine the operation often (but not always) carry important data.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` an 8-bit immediate that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` either the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` a 4-bit immediate (sprite height)
///
/// Any 16-bit word can be decomposed; whether it names an instruction is up to `decode`.
pub trait Opcode {
    /// Returns the Opcode's component nibbles.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// The Opcode's most significant nibble; selects the instruction family.
    /// `[a___]`
    fn a(&self) -> u8;

    /// The Opcode's second nibble.
    /// `[_x__]`
    fn x(&self) -> u8;

    /// The Opcode's third nibble.
    /// `[__y_]`
    fn y(&self) -> u8;

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The Opcode's least significant byte.
    /// `[__nn]`
    fn nn(&self) -> u8;

    /// The Opcode without its most significant nibble.
    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.a(), self.x(), self.y(), self.n())
    }

    fn a(&self) -> u8 {
        ((self & 0xF000) >> 12) as u8
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

/// Assembles an opcode from the two bytes that hold it, most significant first.
pub fn from_bytes(high: u8, low: u8) -> u16 {
    u16::from(high) << 8 | u16::from(low)
}
