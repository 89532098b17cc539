use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KeypadError {
    /// The user asked to quit. Not a fault; the machine stops cleanly.
    #[error("quit requested")]
    Cancelled,

    #[error("{0}")]
    Device(String),
}

/// # Keypad
/// The 16-key hexadecimal keypad, keys `0x0..=0xF`.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
pub trait Keypad {
    /// Drains pending input events. Called once per clock tick, between
    /// instructions, so a frontend can report `Cancelled` promptly.
    fn poll(&mut self) -> Result<(), KeypadError> {
        Ok(())
    }

    /// Blocks until a key is pressed and returns it.
    fn wait_key(&mut self) -> Result<u8, KeypadError>;

    /// Whether `key` is held down right now. Must not block.
    fn is_pressed(&mut self, key: u8) -> Result<bool, KeypadError>;
}

/// A keypad with nothing attached: no key is ever down and waiting for one fails.
#[derive(Debug, Default)]
pub struct NullKeypad;

impl Keypad for NullKeypad {
    fn wait_key(&mut self) -> Result<u8, KeypadError> {
        Err(KeypadError::Device("null keypad not usable".to_string()))
    }

    fn is_pressed(&mut self, _key: u8) -> Result<bool, KeypadError> {
        Ok(false)
    }
}

impl<K: Keypad + ?Sized> Keypad for &mut K {
    fn poll(&mut self) -> Result<(), KeypadError> {
        (**self).poll()
    }

    fn wait_key(&mut self) -> Result<u8, KeypadError> {
        (**self).wait_key()
    }

    fn is_pressed(&mut self, key: u8) -> Result<bool, KeypadError> {
        (**self).is_pressed(key)
    }
}
