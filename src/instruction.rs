use std::fmt;

use crate::error::Result;
use crate::frame_buffer::FrameBuffer;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// # Instructions
///
/// One variant per original Chip-8 opcode, each carrying only the operands it needs.
/// - `x`/`y` are register indices (0x0..=0xF)
/// - `value`/`mask` are 8-bit immediates
/// - `address` is a 12-bit immediate
/// - `height` is a 4-bit sprite height
///
/// Instructions are decoded fresh from every fetched opcode and dropped after they execute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN
    CallMachineRoutine { address: u16 },
    /// 00E0
    ClearScreen,
    /// 00EE
    ReturnSubroutine,
    /// 1NNN
    Jump { address: u16 },
    /// 2NNN
    CallSubroutine { address: u16 },
    /// 3XNN
    SkipIfEqValue { x: u8, value: u8 },
    /// 4XNN
    SkipIfNotEqValue { x: u8, value: u8 },
    /// 5XY0
    SkipIfEqRegister { x: u8, y: u8 },
    /// 6XNN
    SetRegisterToValue { x: u8, value: u8 },
    /// 7XNN
    AddRegisterValue { x: u8, value: u8 },
    /// 8XY0
    Copy { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddRegisters { x: u8, y: u8 },
    /// 8XY5
    SubRegisters { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8, y: u8 },
    /// 8XY7
    ReverseSub { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0
    SkipIfNotEqRegister { x: u8, y: u8 },
    /// ANNN
    SetIndex { address: u16 },
    /// BNNN
    JumpPlus { address: u16 },
    /// CXNN
    Random { x: u8, mask: u8 },
    /// DXYN
    Draw { x: u8, y: u8, height: u8 },
    /// EX9E
    SkipIfKeyPressed { x: u8 },
    /// EXA1
    SkipIfKeyNotPressed { x: u8 },
    /// FX07
    GetDelay { x: u8 },
    /// FX0A
    GetKeyBlocking { x: u8 },
    /// FX15
    SetDelay { x: u8 },
    /// FX18
    SetSound { x: u8 },
    /// FX1E
    AddToIndex { x: u8 },
    /// FX29
    SetIndexToSpriteChar { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    DumpRegisters { x: u8 },
    /// FX65
    LoadRegisters { x: u8 },
}

/// Selects the Instruction for a given opcode, or `None` if it doesn't name one.
///
/// Families 0x0, 0x8, 0xE and 0xF are narrowed down further by `nnn`, `n`, `nn` and `nn`
/// respectively. Families 0x5 and 0x9 only exist with `n == 0`.
pub fn decode(op: u16) -> Option<Instruction> {
    let (x, y) = (op.x(), op.y());
    let instruction = match op.a() {
        0x0 => match op.nnn() {
            0x0E0 => Instruction::ClearScreen,
            0x0EE => Instruction::ReturnSubroutine,
            address => Instruction::CallMachineRoutine { address },
        },
        0x1 => Instruction::Jump { address: op.nnn() },
        0x2 => Instruction::CallSubroutine { address: op.nnn() },
        0x3 => Instruction::SkipIfEqValue { x, value: op.nn() },
        0x4 => Instruction::SkipIfNotEqValue { x, value: op.nn() },
        0x5 if op.n() == 0x0 => Instruction::SkipIfEqRegister { x, y },
        0x6 => Instruction::SetRegisterToValue { x, value: op.nn() },
        0x7 => Instruction::AddRegisterValue { x, value: op.nn() },
        0x8 => match op.n() {
            0x0 => Instruction::Copy { x, y },
            0x1 => Instruction::Or { x, y },
            0x2 => Instruction::And { x, y },
            0x3 => Instruction::Xor { x, y },
            0x4 => Instruction::AddRegisters { x, y },
            0x5 => Instruction::SubRegisters { x, y },
            0x6 => Instruction::ShiftRight { x, y },
            0x7 => Instruction::ReverseSub { x, y },
            0xE => Instruction::ShiftLeft { x, y },
            _ => return None,
        },
        0x9 if op.n() == 0x0 => Instruction::SkipIfNotEqRegister { x, y },
        0xA => Instruction::SetIndex { address: op.nnn() },
        0xB => Instruction::JumpPlus { address: op.nnn() },
        0xC => Instruction::Random { x, mask: op.nn() },
        0xD => Instruction::Draw {
            x,
            y,
            height: op.n(),
        },
        0xE => match op.nn() {
            0x9E => Instruction::SkipIfKeyPressed { x },
            0xA1 => Instruction::SkipIfKeyNotPressed { x },
            _ => return None,
        },
        0xF => match op.nn() {
            0x07 => Instruction::GetDelay { x },
            0x0A => Instruction::GetKeyBlocking { x },
            0x15 => Instruction::SetDelay { x },
            0x18 => Instruction::SetSound { x },
            0x1E => Instruction::AddToIndex { x },
            0x29 => Instruction::SetIndexToSpriteChar { x },
            0x33 => Instruction::StoreBcd { x },
            0x55 => Instruction::DumpRegisters { x },
            0x65 => Instruction::LoadRegisters { x },
            _ => return None,
        },
        _ => return None,
    };
    Some(instruction)
}

impl Instruction {
    /// Applies the instruction to the machine.
    ///
    /// Expects the pc to already point past this instruction; jumps overwrite it and skips add
    /// to it. An instruction that fails leaves the machine as it found it.
    pub fn execute(&self, state: &mut State, frame_buffer: &mut FrameBuffer) -> Result<()> {
        match *self {
            Instruction::CallMachineRoutine { .. } => {}
            Instruction::ClearScreen => cls(frame_buffer),
            Instruction::ReturnSubroutine => return rts(state),
            Instruction::Jump { address } => jump(state, address),
            Instruction::CallSubroutine { address } => call(state, address),
            Instruction::SkipIfEqValue { x, value } => ske(state, x, value),
            Instruction::SkipIfNotEqValue { x, value } => skne(state, x, value),
            Instruction::SkipIfEqRegister { x, y } => skre(state, x, y),
            Instruction::SetRegisterToValue { x, value } => load(state, x, value),
            Instruction::AddRegisterValue { x, value } => add(state, x, value),
            Instruction::Copy { x, y } => mv(state, x, y),
            Instruction::Or { x, y } => or(state, x, y),
            Instruction::And { x, y } => and(state, x, y),
            Instruction::Xor { x, y } => xor(state, x, y),
            Instruction::AddRegisters { x, y } => addr(state, x, y),
            Instruction::SubRegisters { x, y } => sub(state, x, y),
            Instruction::ShiftRight { x, y } => shr(state, x, y),
            Instruction::ReverseSub { x, y } => subn(state, x, y),
            Instruction::ShiftLeft { x, y } => shl(state, x, y),
            Instruction::SkipIfNotEqRegister { x, y } => skrne(state, x, y),
            Instruction::SetIndex { address } => loadi(state, address),
            Instruction::JumpPlus { address } => jumpi(state, address),
            Instruction::Random { x, mask } => rand(state, x, mask),
            Instruction::Draw { x, y, height } => return draw(state, frame_buffer, x, y, height),
            Instruction::SkipIfKeyPressed { x } => skpr(state, x),
            Instruction::SkipIfKeyNotPressed { x } => skup(state, x),
            Instruction::GetDelay { x } => moved(state, x),
            Instruction::GetKeyBlocking { x } => keyd(state, x),
            Instruction::SetDelay { x } => setd(state, x),
            Instruction::SetSound { x } => sets(state, x),
            Instruction::AddToIndex { x } => addi(state, x),
            Instruction::SetIndexToSpriteChar { .. } => {}
            Instruction::StoreBcd { x } => return bcd(state, x),
            Instruction::DumpRegisters { x } => return stor(state, x),
            Instruction::LoadRegisters { x } => return read(state, x),
        }
        Ok(())
    }

    /// Whether executing this instruction changes what's on screen
    pub fn touches_screen(&self) -> bool {
        matches!(self, Instruction::ClearScreen | Instruction::Draw { .. })
    }

    /// Re-assembles the opcode this instruction decodes from.
    /// Operands wider than their field are truncated, the same way `execute` treats them.
    pub fn opcode(&self) -> u16 {
        let xy = |family: u16, x: u8, y: u8, n: u16| {
            family << 12 | u16::from(x & 0xF) << 8 | u16::from(y & 0xF) << 4 | n & 0xF
        };
        let xnn =
            |family: u16, x: u8, nn: u8| family << 12 | u16::from(x & 0xF) << 8 | u16::from(nn);

        match *self {
            Instruction::CallMachineRoutine { address } => address & 0x0FFF,
            Instruction::ClearScreen => 0x00E0,
            Instruction::ReturnSubroutine => 0x00EE,
            Instruction::Jump { address } => 0x1000 | address & 0x0FFF,
            Instruction::CallSubroutine { address } => 0x2000 | address & 0x0FFF,
            Instruction::SkipIfEqValue { x, value } => xnn(0x3, x, value),
            Instruction::SkipIfNotEqValue { x, value } => xnn(0x4, x, value),
            Instruction::SkipIfEqRegister { x, y } => xy(0x5, x, y, 0x0),
            Instruction::SetRegisterToValue { x, value } => xnn(0x6, x, value),
            Instruction::AddRegisterValue { x, value } => xnn(0x7, x, value),
            Instruction::Copy { x, y } => xy(0x8, x, y, 0x0),
            Instruction::Or { x, y } => xy(0x8, x, y, 0x1),
            Instruction::And { x, y } => xy(0x8, x, y, 0x2),
            Instruction::Xor { x, y } => xy(0x8, x, y, 0x3),
            Instruction::AddRegisters { x, y } => xy(0x8, x, y, 0x4),
            Instruction::SubRegisters { x, y } => xy(0x8, x, y, 0x5),
            Instruction::ShiftRight { x, y } => xy(0x8, x, y, 0x6),
            Instruction::ReverseSub { x, y } => xy(0x8, x, y, 0x7),
            Instruction::ShiftLeft { x, y } => xy(0x8, x, y, 0xE),
            Instruction::SkipIfNotEqRegister { x, y } => xy(0x9, x, y, 0x0),
            Instruction::SetIndex { address } => 0xA000 | address & 0x0FFF,
            Instruction::JumpPlus { address } => 0xB000 | address & 0x0FFF,
            Instruction::Random { x, mask } => xnn(0xC, x, mask),
            Instruction::Draw { x, y, height } => xy(0xD, x, y, u16::from(height)),
            Instruction::SkipIfKeyPressed { x } => xnn(0xE, x, 0x9E),
            Instruction::SkipIfKeyNotPressed { x } => xnn(0xE, x, 0xA1),
            Instruction::GetDelay { x } => xnn(0xF, x, 0x07),
            Instruction::GetKeyBlocking { x } => xnn(0xF, x, 0x0A),
            Instruction::SetDelay { x } => xnn(0xF, x, 0x15),
            Instruction::SetSound { x } => xnn(0xF, x, 0x18),
            Instruction::AddToIndex { x } => xnn(0xF, x, 0x1E),
            Instruction::SetIndexToSpriteChar { x } => xnn(0xF, x, 0x29),
            Instruction::StoreBcd { x } => xnn(0xF, x, 0x33),
            Instruction::DumpRegisters { x } => xnn(0xF, x, 0x55),
            Instruction::LoadRegisters { x } => xnn(0xF, x, 0x65),
        }
    }
}

/// Disassembles the instruction into the usual Chip-8 assembly mnemonics.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Instruction::CallMachineRoutine { address } => write!(f, "SYS {:#05X}", address),
            Instruction::ClearScreen => write!(f, "CLS"),
            Instruction::ReturnSubroutine => write!(f, "RET"),
            Instruction::Jump { address } => write!(f, "JP {:#05X}", address),
            Instruction::CallSubroutine { address } => write!(f, "CALL {:#05X}", address),
            Instruction::SkipIfEqValue { x, value } => write!(f, "SE V{:X}, {:#04X}", x, value),
            Instruction::SkipIfNotEqValue { x, value } => {
                write!(f, "SNE V{:X}, {:#04X}", x, value)
            }
            Instruction::SkipIfEqRegister { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::SetRegisterToValue { x, value } => {
                write!(f, "LD V{:X}, {:#04X}", x, value)
            }
            Instruction::AddRegisterValue { x, value } => {
                write!(f, "ADD V{:X}, {:#04X}", x, value)
            }
            Instruction::Copy { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddRegisters { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::SubRegisters { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Instruction::ReverseSub { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            Instruction::SkipIfNotEqRegister { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::SetIndex { address } => write!(f, "LD I, {:#05X}", address),
            Instruction::JumpPlus { address } => write!(f, "JP V0, {:#05X}", address),
            Instruction::Random { x, mask } => write!(f, "RND V{:X}, {:#04X}", x, mask),
            Instruction::Draw { x, y, height } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, height),
            Instruction::SkipIfKeyPressed { x } => write!(f, "SKP V{:X}", x),
            Instruction::SkipIfKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            Instruction::GetDelay { x } => write!(f, "LD V{:X}, DT", x),
            Instruction::GetKeyBlocking { x } => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Instruction::AddToIndex { x } => write!(f, "ADD I, V{:X}", x),
            Instruction::SetIndexToSpriteChar { x } => write!(f, "LD F, V{:X}", x),
            Instruction::StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            Instruction::DumpRegisters { x } => write!(f, "LD [I], V{:X}", x),
            Instruction::LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::*;

    #[test]
    fn test_decodes_every_family() {
        let cases = [
            (0x0123, Instruction::CallMachineRoutine { address: 0x123 }),
            (0x00E0, Instruction::ClearScreen),
            (0x00EE, Instruction::ReturnSubroutine),
            (0x1ABC, Instruction::Jump { address: 0xABC }),
            (0x2123, Instruction::CallSubroutine { address: 0x123 }),
            (0x3111, Instruction::SkipIfEqValue { x: 0x1, value: 0x11 }),
            (0x4111, Instruction::SkipIfNotEqValue { x: 0x1, value: 0x11 }),
            (0x5120, Instruction::SkipIfEqRegister { x: 0x1, y: 0x2 }),
            (0x6122, Instruction::SetRegisterToValue { x: 0x1, value: 0x22 }),
            (0x7122, Instruction::AddRegisterValue { x: 0x1, value: 0x22 }),
            (0x8120, Instruction::Copy { x: 0x1, y: 0x2 }),
            (0x8121, Instruction::Or { x: 0x1, y: 0x2 }),
            (0x8122, Instruction::And { x: 0x1, y: 0x2 }),
            (0x8123, Instruction::Xor { x: 0x1, y: 0x2 }),
            (0x8124, Instruction::AddRegisters { x: 0x1, y: 0x2 }),
            (0x8125, Instruction::SubRegisters { x: 0x1, y: 0x2 }),
            (0x8126, Instruction::ShiftRight { x: 0x1, y: 0x2 }),
            (0x8127, Instruction::ReverseSub { x: 0x1, y: 0x2 }),
            (0x812E, Instruction::ShiftLeft { x: 0x1, y: 0x2 }),
            (0x9120, Instruction::SkipIfNotEqRegister { x: 0x1, y: 0x2 }),
            (0xAABC, Instruction::SetIndex { address: 0xABC }),
            (0xBABC, Instruction::JumpPlus { address: 0xABC }),
            (0xC10F, Instruction::Random { x: 0x1, mask: 0x0F }),
            (0xD125, Instruction::Draw { x: 0x1, y: 0x2, height: 0x5 }),
            (0xE19E, Instruction::SkipIfKeyPressed { x: 0x1 }),
            (0xE1A1, Instruction::SkipIfKeyNotPressed { x: 0x1 }),
            (0xF107, Instruction::GetDelay { x: 0x1 }),
            (0xF10A, Instruction::GetKeyBlocking { x: 0x1 }),
            (0xF115, Instruction::SetDelay { x: 0x1 }),
            (0xF118, Instruction::SetSound { x: 0x1 }),
            (0xF11E, Instruction::AddToIndex { x: 0x1 }),
            (0xF129, Instruction::SetIndexToSpriteChar { x: 0x1 }),
            (0xF133, Instruction::StoreBcd { x: 0x1 }),
            (0xF155, Instruction::DumpRegisters { x: 0x1 }),
            (0xF165, Instruction::LoadRegisters { x: 0x1 }),
        ];
        assert_eq!(cases.len(), 35);
        for &(op, expected) in cases.iter() {
            assert_eq!(decode(op), Some(expected), "decoding {:04X}", op);
        }
    }

    #[test]
    fn test_decodes_00e0_as_cls() {
        assert_eq!(decode(0x00E0), Some(Instruction::ClearScreen));
    }

    #[test]
    fn test_5xyn_and_9xyn_need_zero_n() {
        assert_eq!(decode(0x5231), None);
        assert_eq!(decode(0x523F), None);
        assert_eq!(decode(0x9231), None);
    }

    #[test]
    fn test_rejects_unmapped_sub_opcodes() {
        for &op in [0x8128, 0x812D, 0x812F, 0xE100, 0xE19F, 0xF100, 0xF1FF, 0xF108].iter() {
            assert_eq!(decode(op), None, "decoding {:04X}", op);
        }
    }

    #[test]
    fn test_0nnn_is_a_machine_routine() {
        assert_eq!(
            decode(0x0000),
            Some(Instruction::CallMachineRoutine { address: 0x000 })
        );
        assert_eq!(
            decode(0x00EF),
            Some(Instruction::CallMachineRoutine { address: 0x0EF })
        );
    }

    #[test]
    fn test_counts_valid_words() {
        let valid = (0..=u16::MAX).filter(|&op| decode(op).is_some()).count();
        // 0x0, 1, 2, 3, 4, 6, 7, A, B, C, D take every word; 5 and 9 take one in sixteen;
        // 8 takes nine in sixteen; E takes two per x; F takes nine per x
        let expected = 11 * 0x1000 + 2 * 0x100 + 9 * 0x100 + 2 * 0x10 + 9 * 0x10;
        assert_eq!(valid, expected);
    }

    #[test]
    fn test_opcode_reassembles_decoded_word() {
        for op in 0..=u16::MAX {
            if let Some(instruction) = decode(op) {
                assert_eq!(instruction.opcode(), op, "re-assembling {}", instruction);
            }
        }
    }

    #[test]
    fn test_oversized_operands_are_truncated() {
        let wide = Instruction::SetRegisterToValue { x: 0x10, value: 0x1 };
        assert_eq!(wide.opcode(), 0x6001);
        assert_eq!(
            decode(wide.opcode()),
            Some(Instruction::SetRegisterToValue { x: 0x0, value: 0x1 })
        );

        let mut state = State::new();
        let mut frame_buffer = FrameBuffer::new();
        wide.execute(&mut state, &mut frame_buffer).unwrap();
        assert_eq!(state.v[0x0], 0x1);

        let draw = Instruction::Draw { x: 0x11, y: 0x22, height: 0x13 };
        assert_eq!(draw.opcode(), 0xD123);
        state.i = 0x300;
        state.v[0x1] = 0x4;
        draw.execute(&mut state, &mut frame_buffer).unwrap();
        assert_eq!(state.v[0xF], 0x0);

        let dump = Instruction::DumpRegisters { x: 0xFF };
        assert_eq!(dump.opcode(), 0xFF55);
        dump.execute(&mut state, &mut frame_buffer).unwrap();
        assert_eq!(state.memory[0x300..0x302], [0x1, 0x4]);
    }

    #[test]
    fn test_touches_screen() {
        assert!(Instruction::ClearScreen.touches_screen());
        assert!(Instruction::Draw { x: 0, y: 0, height: 1 }.touches_screen());
        assert!(!Instruction::Jump { address: 0x200 }.touches_screen());
    }

    #[test]
    fn test_disassembles() {
        let listing: Vec<String> = [0x00E0, 0x1234, 0x6105, 0x8124, 0xA234, 0xD015, 0xF155, 0xF265]
            .iter()
            .filter_map(|&op| decode(op))
            .map(|instruction| instruction.to_string())
            .collect();
        assert_eq!(
            listing,
            [
                "CLS",
                "JP 0x234",
                "LD V1, 0x05",
                "ADD V1, V2",
                "LD I, 0x234",
                "DRW V0, V1, 5",
                "LD [I], V1",
                "LD V2, [I]",
            ]
        );
    }
}
