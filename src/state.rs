use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Config, Quirks};
use crate::constants::{
    FLAG_REGISTER, INSTRUCTION_SIZE, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT,
};
use crate::error::{Chip8Error, Result};
use crate::keypad::Keypad;
use crate::opcode;

/// The Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, starting at 0x200
///
/// Timers
/// - 2 8-bit timers (delay & sound), counted down by the host at 60Hz
///
/// ## Memory
/// - 4096 bytes of addressable memory
///     - 0x000..0x200 is reserved for the interpreter and can't be written to
///     - programs are loaded at 0x200
/// - a stack of return addresses for subroutine calls; it has no fixed depth
///
/// ## Input
/// - a 16-key hexadecimal keypad, only ever read by instructions
///
/// Addresses held in `i` and `pc` are never clamped. Touching memory through one that points
/// past 0xFFF is a `MemoryOutOfBounds` error.
#[derive(Clone, Debug)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub stack: Vec<u16>,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub memory: [u8; MEMORY_SIZE],
    pub keypad: Keypad,
    pub quirks: Quirks,
    rng: StdRng,
}

impl State {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            stack: Vec::new(),
            delay_timer: 0,
            sound_timer: 0,
            memory: [0; MEMORY_SIZE],
            keypad: Keypad::new(),
            quirks: config.quirks,
            rng,
        }
    }

    /// Copies raw object code into memory starting at 0x200.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.write(PROGRAM_START as usize, program)
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self) -> Result<u16> {
        let bytes = self.read(self.pc as usize, INSTRUCTION_SIZE as usize)?;
        Ok(opcode::from_bytes(bytes[0], bytes[1]))
    }

    /// Moves the pc on by one instruction
    pub fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(INSTRUCTION_SIZE);
    }

    /// Moves the pc back by one instruction
    pub fn rewind(&mut self) {
        self.pc = self.pc.wrapping_sub(INSTRUCTION_SIZE);
    }

    /// Borrows `len` bytes of memory starting at `address`.
    pub fn read(&self, address: usize, len: usize) -> Result<&[u8]> {
        if len == 0 {
            return Ok(&[]);
        }
        Self::check_bounds(address, len)?;
        Ok(&self.memory[address..address + len])
    }

    /// Copies `bytes` into memory starting at `address`.
    pub fn write(&mut self, address: usize, bytes: &[u8]) -> Result<()> {
        Self::check_writable(address, bytes.len())?;
        self.memory[address..address + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Fails unless all of `address..address + len` is memory a program may write to.
    fn check_writable(address: usize, len: usize) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        if address < PROGRAM_START as usize {
            return Err(Chip8Error::ReservedWrite { address });
        }
        Self::check_bounds(address, len)
    }

    fn check_bounds(address: usize, len: usize) -> Result<()> {
        if address + len > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds {
                address: address.max(MEMORY_SIZE),
            });
        }
        Ok(())
    }

    /// Sets VF to 1 or 0
    pub fn set_flag(&mut self, flag: bool) {
        self.v[FLAG_REGISTER] = flag as u8;
    }

    pub fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }

    /// Counts both timers down by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
