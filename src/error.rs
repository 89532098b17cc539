use thiserror::Error;

use crate::display::DisplayError;
use crate::opcode::Opcode;

/// Faults that stop the machine.
///
/// Cancellation is not a fault: a quit request from the keypad or a stop
/// request between ticks ends `Chip8::run` with `Ok(())`.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("unknown opcode: {0}")]
    UnknownOpcode(Opcode),

    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },

    #[error("unable to read program: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to get key from keypad: {0}")]
    Keypad(String),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error("stack overflow calling a subroutine at pc 0x{pc:04X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow returning from a subroutine at pc 0x{pc:04X}")]
    StackUnderflow { pc: u16 },

    #[error("clock speed must be a positive number of Hz, got {0}")]
    InvalidClockSpeed(u32),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
