use std::io::Read;

use log::{debug, trace};

use crate::config::Config;
use crate::error::{Chip8Error, Result};
use crate::frame_buffer::FrameBuffer;
use crate::instruction::{decode, Instruction};
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `frame_buffer` programs draw to
///  - a `draw_flag` raised whenever the frame buffer changes
///
/// Supplies interfaces for:
/// - loading programs
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
/// - inspecting its sound timer for playing some tone
///
/// It never sleeps or blocks: `FX0A` waits for a key by re-executing itself on every step.
pub struct Chip8 {
    state: State,
    frame_buffer: FrameBuffer,
    draw_flag: bool,
    config: Config,
    program: Vec<u8>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        debug!("creating chip-8 with {:?}", config);
        Chip8 {
            state: State::with_config(config),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            config,
            program: Vec::new(),
        }
    }

    /// Creates a Chip-8 with `program` already loaded
    pub fn with_program(program: &[u8]) -> Result<Self> {
        let mut chip8 = Self::new();
        chip8.load_program(program)?;
        Ok(chip8)
    }

    /// Resets the machine and copies raw object code into memory at 0x200.
    ///
    /// # Arguments
    /// * `program` Chip-8 object code; no header, at most 0xE00 bytes
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let mut state = State::with_config(self.config);
        state.load_program(program)?;
        debug!("loaded {} byte program", program.len());

        self.state = state;
        self.frame_buffer.clear();
        self.draw_flag = true;
        self.program = program.to_vec();
        Ok(())
    }

    /// Load a rom from some reader
    ///
    /// # Arguments
    /// * `reader` a reader that contains a ROM, e.g. an open file
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load_program(&program)
    }

    /// Puts the machine back the way `load_program` left it.
    pub fn reset(&mut self) -> Result<()> {
        let program = std::mem::take(&mut self.program);
        debug!("resetting");
        self.load_program(&program)
    }

    /// Gets the opcode currently pointed at by the pc.
    pub fn fetch(&self) -> Result<u16> {
        self.state.fetch()
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at the pc and moves the pc past it
    /// - decodes and executes it
    ///
    /// Returns the instruction that was executed. On error the pc is left on the offending
    /// instruction and nothing else has changed.
    pub fn step(&mut self) -> Result<Instruction> {
        let address = self.state.pc;
        let op = self.fetch().map_err(|error| {
            debug!("unable to fetch at {:#05X}: {}", address, error);
            error
        })?;
        let instruction = decode(op).ok_or_else(|| {
            debug!("unknown opcode {:04X} at {:#05X}", op, address);
            Chip8Error::UnknownOpcode {
                opcode: op,
                address,
            }
        })?;

        self.state.advance();
        if let Err(error) = instruction.execute(&mut self.state, &mut self.frame_buffer) {
            debug!("{:04X} ({}) at {:#05X} failed: {}", op, instruction, address, error);
            self.state.pc = address;
            return Err(error);
        }

        trace!(
            "{:04X} {} v{:02X?} i{:04X} pc{:04X}",
            op,
            instruction,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        self.draw_flag |= instruction.touches_screen();
        Ok(instruction)
    }

    /// Runs up to `instructions` steps and then ticks the timers once,
    /// i.e. one 60Hz frame's worth of work.
    ///
    /// Returns whether this frame's instructions changed the frame buffer.
    /// Stops at the first error without ticking.
    pub fn run_frame(&mut self, instructions: usize) -> Result<bool> {
        let mut redraw = false;
        for _ in 0..instructions {
            redraw |= self.step()?.touches_screen();
        }
        self.tick_timers();
        Ok(redraw)
    }

    /// Counts both timers down by one; the host calls this at 60Hz regardless of how many
    /// instructions ran in between.
    pub fn tick_timers(&mut self) {
        self.state.tick_timers();
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad key (0x0..=0xF) that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<()> {
        self.state.keypad.press(key)
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad key (0x0..=0xF) that was released
    pub fn key_release(&mut self, key: u8) -> Result<()> {
        self.state.keypad.release(key)
    }

    /// Returns the FrameBuffer if the display should be redrawn, lowering the draw flag
    pub fn get_frame(&mut self) -> Option<&FrameBuffer> {
        if self.draw_flag {
            self.draw_flag = false;
            Some(&self.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Whether a tone should be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> Config {
        self.config
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
