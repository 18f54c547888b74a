use crate::constants::KEY_COUNT;
use crate::error::{Chip8Error, Result};

/// # Keypad
/// Chip-8 input is generated with a hexadecimal keypad.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
/// The host presses and releases keys; instructions only ever read them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: u8) -> Result<()> {
        self.set(key, true)
    }

    pub fn release(&mut self, key: u8) -> Result<()> {
        self.set(key, false)
    }

    /// Whether `key` is held down. Values off the keypad are never pressed.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed
            .get(key as usize)
            .copied()
            .unwrap_or(false)
    }

    /// The lowest-numbered key that is held down, scanning 0x0..=0xF
    pub fn first_pressed(&self) -> Option<u8> {
        self.pressed
            .iter()
            .position(|&pressed| pressed)
            .map(|key| key as u8)
    }

    fn set(&mut self, key: u8, pressed: bool) -> Result<()> {
        let slot = self
            .pressed
            .get_mut(key as usize)
            .ok_or(Chip8Error::InvalidKey { key })?;
        *slot = pressed;
        Ok(())
    }
}
