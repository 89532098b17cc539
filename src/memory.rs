use std::io::Read;

use crate::constants::{FONT_START, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::{Chip8Error, Result};

/// # Memory
/// 4096 bytes of addressable memory.
///
/// ```text
/// +---------------+= 0xFFF End of Chip-8 RAM
/// | 0x200 to 0xFFF|
/// | Program / Data|
/// +---------------+= 0x200 Start of Chip-8 programs
/// | 0x000 to 0x1FF|
/// |  Sprite sheet |
/// +---------------+= 0x000
/// ```
///
/// Every address wraps modulo the memory size, so no access can fall off the end.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the sprite sheet baked in at `FONT_START`.
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        bytes[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    /// Copies a program into memory at `PROGRAM_START`.
    ///
    /// Programs that would not fit are rejected outright rather than truncated,
    /// and memory is left untouched.
    pub fn load(&mut self, program: &[u8]) -> Result<usize> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(program.len())
    }

    /// Reads a whole program from `reader` (a ROM file, stdin, ...) and loads it.
    pub fn load_from(&mut self, reader: &mut dyn Read) -> Result<usize> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load(&program)
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[Self::wrap(addr)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[Self::wrap(addr)] = value;
    }

    /// The big-endian word at `addr` and `addr + 1`.
    pub fn word(&self, addr: u16) -> u16 {
        u16::from(self.read(addr)) << 8 | u16::from(self.read(addr.wrapping_add(1)))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn wrap(addr: u16) -> usize {
        addr as usize % MEMORY_SIZE
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed_after_font() {
        let memory = Memory::new();
        assert_eq!(memory.as_slice()[..80], SPRITE_SHEET[..]);
        assert!(memory.as_slice()[80..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_program() {
        let mut memory = Memory::new();
        let written = memory.load(&[0x00, 0xE0]).unwrap();
        assert_eq!(written, 2);
        assert_eq!(memory.word(0x200), 0x00E0);
    }

    #[test]
    fn test_load_program_that_fills_memory() {
        let mut memory = Memory::new();
        let program = vec![0xAB; MAX_PROGRAM_SIZE];
        assert_eq!(memory.load(&program).unwrap(), MAX_PROGRAM_SIZE);
        assert_eq!(memory.read(0xFFF), 0xAB);
    }

    #[test]
    fn test_load_rejects_oversized_program() {
        let mut memory = Memory::new();
        let program = vec![0xAB; MAX_PROGRAM_SIZE + 1];
        match memory.load(&program) {
            Err(Chip8Error::ProgramTooLarge { size, max_size }) => {
                assert_eq!(size, 3585);
                assert_eq!(max_size, 3584);
            }
            other => panic!("expected ProgramTooLarge, got {:?}", other),
        }
        assert_eq!(memory.read(0x200), 0);
    }

    #[test]
    fn test_load_from_reader() {
        let mut memory = Memory::new();
        let mut reader: &[u8] = &[0xA1, 0x23, 0x60, 0x01];
        assert_eq!(memory.load_from(&mut reader).unwrap(), 4);
        assert_eq!(memory.word(0x202), 0x6001);
    }

    #[test]
    fn test_addresses_wrap() {
        let mut memory = Memory::new();
        memory.write(0x1000, 0x42);
        assert_eq!(memory.read(0x0000), 0x42);
        memory.write(0xFFF, 0x12);
        assert_eq!(memory.word(0xFFF), 0x1242);
    }
}
