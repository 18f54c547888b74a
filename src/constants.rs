/// Bytes of addressable memory (0x000..=0xFFF)
pub const MEMORY_SIZE: usize = 0x1000;

/// Where programs are loaded and where execution begins.
/// Everything below this address is reserved for the interpreter.
pub const PROGRAM_START: u16 = 0x200;

/// The largest program that fits between `PROGRAM_START` and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Instructions are two bytes wide
pub const INSTRUCTION_SIZE: u16 = 0x2;

pub const REGISTER_COUNT: usize = 16;

/// VF doubles as the carry, borrow and collision flag
pub const FLAG_REGISTER: usize = 0xF;

pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Sprites are 8 pixels wide; their height comes from the `DXYN` opcode
pub const SPRITE_WIDTH: usize = 8;

/// The rate at which hosts are expected to call `Chip8::tick_timers`
pub const TIMER_HZ: u32 = 60;

/// A reasonable number of instructions to execute per 60Hz frame
pub const INSTRUCTIONS_PER_FRAME: usize = 10;
