use std::io;

use thiserror::Error;

/// Everything that can stop a Chip-8 from making progress.
///
/// None of these are fatal to the machine itself; whether to halt, skip or retry is up to the
/// host. A step that fails leaves the program counter on the instruction that failed.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("unknown opcode {opcode:#06X} at {address:#05X}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("return with an empty call stack at {address:#05X}")]
    StackUnderflow { address: u16 },

    #[error("memory access out of bounds at {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("write into reserved interpreter memory at {address:#05X}")]
    ReservedWrite { address: usize },

    #[error("program is {size} bytes but at most {max} bytes fit in memory")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("key {key:#X} is not on the keypad")]
    InvalidKey { key: u8 },

    #[error("unable to read program: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
