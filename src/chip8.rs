use std::io::Read;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::clock::{Clock, StopHandle, Tick};
use crate::constants::{ADDRESS_MASK, CLOCK_SPEED, TIMER_FREQUENCY};
use crate::display::Display;
use crate::error::{Chip8Error, Result};
use crate::graphics::Graphics;
use crate::instruction::{self, Flow};
use crate::keypad::{Keypad, KeypadError};
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::operations::Machine;
use crate::state::State;

/// Settings fixed when the machine is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Instructions executed per second.
    pub clock_speed: u32,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            clock_speed: CLOCK_SPEED,
        }
    }
}

/// What a single `step` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cycle {
    Executed(Opcode),
    /// The keypad asked to quit.
    Cancelled,
    /// A stop was requested through the `StopHandle`.
    Stopped,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns:
///  - `memory` with the sprite sheet and the loaded program
///  - `state`, the registers, stack and timers
///  - `graphics`, the frame buffer
///  - the `display` and `keypad` it talks to
///  - a `clock` pacing execution
///
/// Supplies interfaces for:
/// - loading programs
/// - executing single instructions or running until stopped
/// - stopping from another thread
/// - inspecting its state and frame buffer
pub struct Chip8<D: Display, K: Keypad> {
    memory: Memory,
    state: State,
    graphics: Graphics,
    display: D,
    keypad: K,
    rng: Box<dyn RngCore>,
    options: Options,
    clock: Clock,
    /// Timer ticks owed, scaled by `clock_speed`
    timer_accumulator: u32,
}

impl<D: Display, K: Keypad> Chip8<D, K> {
    pub fn new(options: Options, display: D, keypad: K) -> Result<Self> {
        let clock = Clock::new(options.clock_speed)?;
        Ok(Chip8 {
            memory: Memory::new(),
            state: State::new(),
            graphics: Graphics::new(),
            display,
            keypad,
            rng: Box::new(StdRng::from_entropy()),
            options,
            clock,
            timer_accumulator: 0,
        })
    }

    /// Replaces the source of random bytes used by `Cxkk`.
    pub fn with_rng<R: RngCore + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Load a program from a byte slice
    pub fn load(&mut self, program: &[u8]) -> Result<usize> {
        let size = self.memory.load(program)?;
        log::info!("loaded {} byte program", size);
        Ok(size)
    }

    /// Load a program from a source file or stream
    pub fn load_from(&mut self, reader: &mut dyn Read) -> Result<usize> {
        let size = self.memory.load_from(reader)?;
        log::info!("loaded {} byte program", size);
        Ok(size)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn graphics(&self) -> &Graphics {
        &self.graphics
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    /// A handle that stops the machine at its next tick, from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.clock.stop_handle()
    }

    pub fn stop(&self) {
        self.clock.stop_handle().stop();
    }

    /// Gets the opcode currently pointed at by the pc.
    pub fn opcode(&self) -> Opcode {
        Opcode::fetch(&self.memory, self.state.pc)
    }

    /// Executes a single opcode against the machine and moves the pc on.
    ///
    /// Fails with `UnknownOpcode` for anything outside the instruction table.
    pub fn dispatch(&mut self, op: Opcode) -> Result<Flow> {
        let operation = instruction::decode(op).ok_or(Chip8Error::UnknownOpcode(op))?;
        let mut machine = Machine {
            state: &mut self.state,
            memory: &mut self.memory,
            graphics: &mut self.graphics,
            display: &mut self.display,
            keypad: &mut self.keypad,
            rng: &mut *self.rng,
        };
        let flow = operation(op, &mut machine)?;

        let pc = self.state.pc;
        let next = match flow {
            Flow::Next => pc.wrapping_add(2),
            Flow::Skip(true) => pc.wrapping_add(4),
            Flow::Skip(false) => pc.wrapping_add(2),
            Flow::Jump(addr) => addr,
            // Left on the instruction so a resumed machine retries it
            Flow::Cancel => pc,
        };
        self.state.pc = next & ADDRESS_MASK;
        Ok(flow)
    }

    /// Waits for the next clock tick, then fetches and executes one instruction.
    pub fn step(&mut self) -> Result<Cycle> {
        if self.clock.wait_tick() == Tick::Stopped {
            return Ok(Cycle::Stopped);
        }
        match self.keypad.poll() {
            Ok(()) => {}
            Err(KeypadError::Cancelled) => return Ok(Cycle::Cancelled),
            Err(KeypadError::Device(reason)) => return Err(Chip8Error::Keypad(reason)),
        }

        let op = self.opcode();
        if self.dispatch(op)? == Flow::Cancel {
            return Ok(Cycle::Cancelled);
        }
        self.advance_timers();
        log::trace!("op={} {}", op, self.state);
        Ok(Cycle::Executed(op))
    }

    /// Steps until the machine is stopped, the keypad asks to quit, or an
    /// instruction fails.
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "running at {}Hz from pc 0x{:04X}",
            self.options.clock_speed,
            self.state.pc
        );
        loop {
            let cycle = self.step().map_err(|err| {
                log::debug!("halted: {} ({})", err, self.state);
                err
            })?;
            match cycle {
                Cycle::Executed(_) => continue,
                Cycle::Cancelled => {
                    log::info!("quit requested at pc 0x{:04X}", self.state.pc);
                    return Ok(());
                }
                Cycle::Stopped => {
                    log::info!("stopped at pc 0x{:04X}", self.state.pc);
                    return Ok(());
                }
            }
        }
    }

    /// Counts the timers down at 60Hz, measured in executed instructions.
    ///
    /// Each instruction owes `TIMER_FREQUENCY / clock_speed` timer ticks; the
    /// remainder carries over to the next instruction.
    fn advance_timers(&mut self) {
        self.timer_accumulator += TIMER_FREQUENCY;
        while self.timer_accumulator >= self.options.clock_speed {
            self.timer_accumulator -= self.options.clock_speed;
            self.state.tick_timers();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NullDisplay;
    use crate::keypad::NullKeypad;

    fn chip8(program: &[u8]) -> Chip8<NullDisplay, NullKeypad> {
        let options = Options {
            clock_speed: 10_000,
        };
        let mut chip8 = Chip8::new(options, NullDisplay, NullKeypad).unwrap();
        chip8.load(program).unwrap();
        chip8
    }

    #[test]
    fn test_new_rejects_zero_clock() {
        let options = Options { clock_speed: 0 };
        assert!(matches!(
            Chip8::new(options, NullDisplay, NullKeypad),
            Err(Chip8Error::InvalidClockSpeed(0))
        ));
    }

    #[test]
    fn test_new_machine() {
        let chip8 = chip8(&[]);
        assert_eq!(chip8.state().pc, 0x200);
        assert_eq!(chip8.memory().read(0x000), 0xF0);
    }

    #[test]
    fn test_chip8_gets_op() {
        let chip8 = chip8(&[0xAA, 0xBB]);
        assert_eq!(chip8.opcode(), Opcode(0xAABB));
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = chip8(&[0xA1, 0x00]);
        assert_eq!(chip8.step().unwrap(), Cycle::Executed(Opcode(0xA100)));
        assert_eq!(chip8.state().pc, 0x202);
        assert_eq!(chip8.state().i, 0x100);
    }

    #[test]
    fn test_step_unknown_opcode() {
        let mut chip8 = chip8(&[0x01, 0x23]);
        match chip8.step() {
            Err(Chip8Error::UnknownOpcode(op)) => assert_eq!(op, Opcode(0x0123)),
            other => panic!("expected UnknownOpcode, got {:?}", other),
        }
        assert_eq!(chip8.state().pc, 0x200);
    }

    #[test]
    fn test_run_stops_on_unknown_opcode() {
        // LD V0, 0x05; ADD V0, 0x01; then zeroed memory, which is SYS 0x000
        let mut chip8 = chip8(&[0x60, 0x05, 0x70, 0x01]);
        assert!(matches!(
            chip8.run(),
            Err(Chip8Error::UnknownOpcode(Opcode(0x0000)))
        ));
        assert_eq!(chip8.state().v[0], 0x06);
        assert_eq!(chip8.state().pc, 0x204);
    }

    #[test]
    fn test_stop_before_run() {
        // JP 0x200, forever
        let mut chip8 = chip8(&[0x12, 0x00]);
        chip8.stop();
        chip8.run().unwrap();
        assert_eq!(chip8.step().unwrap(), Cycle::Stopped);
    }

    #[test]
    fn test_timers_count_down_every_instruction_at_60hz() {
        let mut chip8 = Chip8::new(Options::default(), NullDisplay, NullKeypad).unwrap();
        // LD V1, 0x03; LD DT, V1; JP 0x204
        chip8.load(&[0x61, 0x03, 0xF1, 0x15, 0x12, 0x04]).unwrap();
        chip8.step().unwrap();
        chip8.step().unwrap();
        // the instruction that set the timer also counts as a tick
        assert_eq!(chip8.state().delay_timer, 2);
        chip8.step().unwrap();
        assert_eq!(chip8.state().delay_timer, 1);
    }

    #[test]
    fn test_timers_scale_with_clock_speed() {
        let mut chip8 = chip8(&[0x12, 0x00]);
        chip8.state_mut().delay_timer = 10;
        chip8.state_mut().sound_timer = 10;
        // 10_000Hz / 60Hz = 166.7 instructions per timer tick
        for _ in 0..166 {
            chip8.step().unwrap();
        }
        assert_eq!(chip8.state().delay_timer, 10);
        chip8.step().unwrap();
        assert_eq!(chip8.state().delay_timer, 9);
        assert_eq!(chip8.state().sound_timer, 9);
    }

    fn chip8_at(clock_speed: u32) -> Chip8<NullDisplay, NullKeypad> {
        Chip8::new(Options { clock_speed }, NullDisplay, NullKeypad).unwrap()
    }

    #[test]
    fn test_timers_keep_60hz_at_uneven_clock() {
        let mut chip8 = chip8_at(100);
        chip8.state_mut().delay_timer = 200;
        chip8.state_mut().sound_timer = 200;
        // one second of instructions
        for _ in 0..100 {
            chip8.advance_timers();
        }
        assert_eq!(chip8.state().delay_timer, 140);
        assert_eq!(chip8.state().sound_timer, 140);
    }

    #[test]
    fn test_timers_keep_60hz_below_60hz_clock() {
        let mut chip8 = chip8_at(30);
        chip8.state_mut().delay_timer = 50;
        // one second of instructions, two timer ticks each
        for _ in 0..30 {
            chip8.advance_timers();
        }
        assert_eq!(chip8.state().delay_timer, 0);
        chip8.state_mut().delay_timer = 50;
        chip8.advance_timers();
        assert_eq!(chip8.state().delay_timer, 48);
    }

    #[test]
    fn test_pc_stays_within_12_bits() {
        let mut chip8 = chip8(&[]);
        chip8.state_mut().v[0x0] = 0xFF;
        assert_eq!(chip8.dispatch(Opcode(0xBFFF)).unwrap(), Flow::Jump(0x10FE));
        assert_eq!(chip8.state().pc, 0x0FE);

        chip8.state_mut().pc = 0xFFE;
        chip8.dispatch(Opcode(0x6000)).unwrap();
        assert_eq!(chip8.state().pc, 0x000);
    }

    struct UnpluggedKeypad;

    impl Keypad for UnpluggedKeypad {
        fn poll(&mut self) -> std::result::Result<(), KeypadError> {
            Err(KeypadError::Device("unplugged".to_string()))
        }

        fn wait_key(&mut self) -> std::result::Result<u8, KeypadError> {
            Err(KeypadError::Device("unplugged".to_string()))
        }

        fn is_pressed(&mut self, _key: u8) -> std::result::Result<bool, KeypadError> {
            Ok(false)
        }
    }

    #[test]
    fn test_step_fails_when_poll_fails() {
        let options = Options {
            clock_speed: 10_000,
        };
        let mut chip8 = Chip8::new(options, NullDisplay, UnpluggedKeypad).unwrap();
        chip8.load(&[0x60, 0x01]).unwrap();
        match chip8.step() {
            Err(Chip8Error::Keypad(reason)) => assert_eq!(reason, "unplugged"),
            other => panic!("expected Keypad error, got {:?}", other),
        }
        assert_eq!(chip8.state().pc, 0x200);
        assert_eq!(chip8.state().v[0x0], 0x00);
    }
}
