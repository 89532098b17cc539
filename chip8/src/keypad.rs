use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::EventPump;

use emu8::{Keypad, KeypadError};

use crate::keymap::keymap;

/// # SdlKeypad
/// Tracks which Chip-8 keys are held by draining the SDL2 event queue.
///
/// Escape or closing the window asks the machine to quit. SDL also turns
/// SIGINT and SIGTERM into a quit event, so Ctrl-C ends the run the same way.
pub struct SdlKeypad {
    events: EventPump,
    pressed: [bool; 16],
}

impl SdlKeypad {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        Ok(SdlKeypad {
            events: sdl.event_pump()?,
            pressed: [false; 16],
        })
    }

    /// Applies one event to the held keys, returning the Chip-8 key it pressed.
    fn handle(&mut self, event: Event) -> Result<Option<u8>, KeypadError> {
        match event {
            Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } => Err(KeypadError::Cancelled),
            Event::KeyDown {
                keycode: Some(key),
                repeat,
                ..
            } => {
                let kc = keymap(key);
                if let Some(kc) = kc {
                    self.pressed[kc as usize] = true;
                }
                Ok(kc.filter(|_| !repeat))
            }
            Event::KeyUp {
                keycode: Some(key), ..
            } => {
                if let Some(kc) = keymap(key) {
                    self.pressed[kc as usize] = false;
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

impl Keypad for SdlKeypad {
    fn poll(&mut self) -> Result<(), KeypadError> {
        while let Some(event) = self.events.poll_event() {
            self.handle(event)?;
        }
        Ok(())
    }

    fn wait_key(&mut self) -> Result<u8, KeypadError> {
        loop {
            let event = self.events.wait_event();
            if let Some(kc) = self.handle(event)? {
                log::debug!("key 0x{:X} pressed", kc);
                return Ok(kc);
            }
        }
    }

    fn is_pressed(&mut self, key: u8) -> Result<bool, KeypadError> {
        self.poll()?;
        Ok(self.pressed[(key & 0x0F) as usize])
    }
}
