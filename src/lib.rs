//! # chip8-vm
//!
//! A CHIP-8 virtual machine core: a fetch/decode/execute interpreter for the 35 original
//! CHIP-8 instructions and the 64x32 monochrome frame buffer they draw to.
//!
//! The crate owns no clock, window or audio device. A host drives it by:
//! - loading raw object code with [`Chip8::load_program`]
//! - setting key states with [`Chip8::key_press`] and [`Chip8::key_release`]
//! - calling [`Chip8::step`] as often as it likes
//! - calling [`Chip8::tick_timers`] at 60Hz
//! - polling [`Chip8::get_frame`] and [`Chip8::sound_active`] for output
pub use chip8::Chip8;
pub use config::{Config, Quirks};
pub use error::{Chip8Error, Result};
pub use frame_buffer::FrameBuffer;
pub use instruction::{decode, Instruction};
pub use keypad::Keypad;
pub use opcode::Opcode;
pub use state::State;

mod chip8;
pub mod config;
pub mod constants;
mod error;
pub mod frame_buffer;
pub mod instruction;
pub mod keypad;
pub mod opcode;
mod operations;
pub mod state;
