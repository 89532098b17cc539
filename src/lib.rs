//! A Chip-8 virtual machine.
//!
//! The machine itself knows nothing about windows or keyboards; it talks to the
//! outside world through the [`Display`] and [`Keypad`] traits and is paced by
//! a [`Clock`].

pub use chip8::{Chip8, Cycle, Options};
pub use clock::{Clock, StopHandle, Tick};
pub use constants::CLOCK_SPEED;
pub use display::{Display, DisplayError, NullDisplay};
pub use error::{Chip8Error, Result};
pub use graphics::Graphics;
pub use instruction::Flow;
pub use keypad::{Keypad, KeypadError, NullKeypad};
pub use memory::Memory;
pub use opcode::Opcode;
pub use state::State;

mod chip8;
mod clock;
pub mod constants;
mod display;
mod error;
mod graphics;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
mod state;
