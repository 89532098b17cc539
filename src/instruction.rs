use crate::error::Result;
use crate::opcode::Opcode;
use crate::operations::*;

/// How the program counter moves once an operation is done.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// PC += 2
    Next,
    /// PC += 2, plus another 2 when the condition held
    Skip(bool),
    /// PC = addr
    Jump(u16),
    /// The keypad asked to quit mid-instruction; PC stays put
    Cancel,
}

pub type Operation = fn(Opcode, &mut Machine) -> Result<Flow>;

/// Selects the correct Operation for a given Opcode
pub fn decode(op: Opcode) -> Option<Operation> {
    let operation: Operation = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => cls,
        (0x0, 0x0, 0xE, 0xE) => ret,
        (0x1, ..) => jp,
        (0x2, ..) => call,
        (0x3, ..) => se,
        (0x4, ..) => sne,
        (0x5, .., 0x0) => se_reg,
        (0x6, ..) => ld,
        (0x7, ..) => add,
        (0x8, .., 0x0) => ld_reg,
        (0x8, .., 0x1) => or,
        (0x8, .., 0x2) => and,
        (0x8, .., 0x3) => xor,
        (0x8, .., 0x4) => add_reg,
        (0x8, .., 0x5) => sub,
        (0x8, .., 0x6) => shr,
        (0x8, .., 0x7) => subn,
        (0x8, .., 0xE) => shl,
        (0x9, .., 0x0) => sne_reg,
        (0xA, ..) => ld_i,
        (0xB, ..) => jp_v0,
        (0xC, ..) => rnd,
        (0xD, ..) => drw,
        (0xE, _, 0x9, 0xE) => skp,
        (0xE, _, 0xA, 0x1) => sknp,
        (0xF, _, 0x0, 0x7) => ld_from_dt,
        (0xF, _, 0x0, 0xA) => ld_key,
        (0xF, _, 0x1, 0x5) => ld_dt,
        (0xF, _, 0x1, 0x8) => ld_st,
        (0xF, _, 0x1, 0xE) => add_i,
        (0xF, _, 0x2, 0x9) => ld_font,
        (0xF, _, 0x3, 0x3) => bcd,
        (0xF, _, 0x5, 0x5) => store,
        (0xF, _, 0x6, 0x5) => load,
        _ => return None,
    };
    Some(operation)
}
