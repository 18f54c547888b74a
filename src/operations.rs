use crate::constants::{INSTRUCTION_SIZE, REGISTER_COUNT};
use crate::error::{Chip8Error, Result};
use crate::frame_buffer::FrameBuffer;
use crate::state::State;

/// clear
pub fn cls(frame_buffer: &mut FrameBuffer) {
    frame_buffer.clear();
}

/// PC = STACK.pop()
pub fn rts(state: &mut State) -> Result<()> {
    let address = state.stack.pop().ok_or(Chip8Error::StackUnderflow {
        address: state.pc.wrapping_sub(INSTRUCTION_SIZE),
    })?;
    state.pc = address;
    Ok(())
}

/// PC = addr
pub fn jump(state: &mut State, address: u16) {
    state.pc = address;
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, address: u16) {
    state.stack.push(state.pc);
    state.pc = address;
}

/// Register operands are a single nibble; anything wider is truncated to one
fn reg(r: u8) -> usize {
    usize::from(r & 0xF)
}

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.advance();
    }
}

/// if Vx == kk then pc += 2
pub fn ske(state: &mut State, x: u8, value: u8) {
    let condition = state.v[reg(x)] == value;
    skip_if(state, condition);
}

/// if Vx != kk then pc += 2
pub fn skne(state: &mut State, x: u8, value: u8) {
    let condition = state.v[reg(x)] != value;
    skip_if(state, condition);
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &mut State, x: u8, y: u8) {
    let condition = state.v[reg(x)] == state.v[reg(y)];
    skip_if(state, condition);
}

/// Vx = kk
pub fn load(state: &mut State, x: u8, value: u8) {
    state.v[reg(x)] = value;
}

/// Vx += kk
/// Wraps on overflow without touching VF
pub fn add(state: &mut State, x: u8, value: u8) {
    state.v[reg(x)] = state.v[reg(x)].wrapping_add(value);
}

/// Vx = Vy
pub fn mv(state: &mut State, x: u8, y: u8) {
    state.v[reg(x)] = state.v[reg(y)];
}

/// Vx |= Vy
pub fn or(state: &mut State, x: u8, y: u8) {
    state.v[reg(x)] |= state.v[reg(y)];
    reset_flag_for_logic(state);
}

/// Vx &= Vy
pub fn and(state: &mut State, x: u8, y: u8) {
    state.v[reg(x)] &= state.v[reg(y)];
    reset_flag_for_logic(state);
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: u8, y: u8) {
    state.v[reg(x)] ^= state.v[reg(y)];
    reset_flag_for_logic(state);
}

fn reset_flag_for_logic(state: &mut State) {
    if state.quirks.logic_resets_flag {
        state.set_flag(false);
    }
}

/// Vx += Vy; VF = overflow
pub fn addr(state: &mut State, x: u8, y: u8) {
    let (res, over) = state.v[reg(x)].overflowing_add(state.v[reg(y)]);
    state.v[reg(x)] = res;
    state.set_flag(over);
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &mut State, x: u8, y: u8) {
    let (vx, vy) = (state.v[reg(x)], state.v[reg(y)]);
    state.v[reg(x)] = vx.wrapping_sub(vy);
    state.set_flag(vx >= vy);
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(state: &mut State, x: u8, y: u8) {
    let value = shift_operand(state, x, y);
    state.v[reg(x)] = value >> 1;
    state.set_flag(value & 0x1 == 0x1);
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &mut State, x: u8, y: u8) {
    let (vx, vy) = (state.v[reg(x)], state.v[reg(y)]);
    state.v[reg(x)] = vy.wrapping_sub(vx);
    state.set_flag(vy >= vx);
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(state: &mut State, x: u8, y: u8) {
    let value = shift_operand(state, x, y);
    state.v[reg(x)] = value << 1;
    state.set_flag(value & 0x80 == 0x80);
}

fn shift_operand(state: &State, x: u8, y: u8) -> u8 {
    if state.quirks.shift_uses_vy {
        state.v[reg(y)]
    } else {
        state.v[reg(x)]
    }
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &mut State, x: u8, y: u8) {
    let condition = state.v[reg(x)] != state.v[reg(y)];
    skip_if(state, condition);
}

/// I = addr
pub fn loadi(state: &mut State, address: u16) {
    state.i = address;
}

/// PC = V0 + addr
pub fn jumpi(state: &mut State, address: u16) {
    state.pc = address.wrapping_add(u16::from(state.v[0x0]));
}

/// Vx = rand_byte & kk
pub fn rand(state: &mut State, x: u8, mask: u8) {
    let byte = state.random_byte();
    state.v[reg(x)] = byte & mask;
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the sprite stored at mem[I..I+n] onto the FrameBuffer at Vx, Vy.
/// Sets VF if any pixels were erased
pub fn draw(
    state: &mut State,
    frame_buffer: &mut FrameBuffer,
    x: u8,
    y: u8,
    height: u8,
) -> Result<()> {
    let rows = state.read(state.i as usize, usize::from(height & 0xF))?;
    let collision =
        frame_buffer.draw_sprites(rows, state.v[reg(x)].into(), state.v[reg(y)].into());
    state.set_flag(collision);
    Ok(())
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &mut State, x: u8) {
    let pressed = state.keypad.is_pressed(state.v[reg(x)]);
    skip_if(state, pressed);
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &mut State, x: u8) {
    let pressed = state.keypad.is_pressed(state.v[reg(x)]);
    skip_if(state, !pressed);
}

/// Vx = DT
pub fn moved(state: &mut State, x: u8) {
    state.v[reg(x)] = state.delay_timer;
}

/// await keypress for Vx
/// Re-executes on the next step until some key is down
pub fn keyd(state: &mut State, x: u8) {
    match state.keypad.first_pressed() {
        Some(key) => state.v[reg(x)] = key,
        None => state.rewind(),
    }
}

/// DT = Vx
pub fn setd(state: &mut State, x: u8) {
    state.delay_timer = state.v[reg(x)];
}

/// ST = Vx
pub fn sets(state: &mut State, x: u8) {
    state.sound_timer = state.v[reg(x)];
}

/// I += Vx
pub fn addi(state: &mut State, x: u8) {
    state.i = state.i.wrapping_add(u16::from(state.v[reg(x)]));
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(state: &mut State, x: u8) -> Result<()> {
    let value = state.v[reg(x)];
    let digits = [value / 100, value / 10 % 10, value % 10];
    let address = state.i as usize;
    state.write(address, &digits)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &mut State, x: u8) -> Result<()> {
    let registers = state.v;
    let address = state.i as usize;
    state.write(address, &registers[..=reg(x)])
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &mut State, x: u8) -> Result<()> {
    let count = reg(x) + 1;
    let mut registers = [0; REGISTER_COUNT];
    registers[..count].copy_from_slice(state.read(state.i as usize, count)?);
    state.v[..count].copy_from_slice(&registers[..count]);
    Ok(())
}
