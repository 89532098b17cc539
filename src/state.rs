use std::fmt;

use crate::constants::{PROGRAM_START, REGISTER_COUNT, STACK_SIZE};
use crate::error::{Chip8Error, Result};

/// The Chip8 register file and call stack
///
/// ## Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register
///
/// ## Counter
/// - (pc) a 16-bit program counter, starting at 0x200
///
/// ## Stack
/// - (sp) an 8-bit stack pointer indexing the next free slot
/// - 16 return addresses
///
/// ## Timers
/// - 2 8-bit timers (delay & sound), counting down at 60Hz
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
        }
    }

    /// Writes `addr` into the slot at `sp`, then increments `sp`.
    pub fn push(&mut self, addr: u16) -> Result<()> {
        if self.sp as usize >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow { pc: self.pc });
        }
        self.stack[self.sp as usize] = addr;
        self.sp += 1;
        Ok(())
    }

    /// Decrements `sp` and returns the address most recently pushed.
    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow { pc: self.pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
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

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "I=0x{:04X} PC=0x{:04X} V={:02X?} SP=0x{:02X} stack={:04X?} DT={} ST={}",
            self.i, self.pc, self.v, self.sp, self.stack, self.delay_timer, self.sound_timer
        )
    }
}
