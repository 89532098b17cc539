/// Bytes of addressable memory.
pub const MEMORY_SIZE: usize = 4096;

/// Address at which programs are loaded and execution begins.
pub const PROGRAM_START: u16 = 0x200;

/// The program counter and jump targets are 12-bit addresses.
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// The largest program that fits between `PROGRAM_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const REGISTER_COUNT: usize = 16;

/// VF doubles as the carry, borrow, shift and collision flag.
pub const FLAG_REGISTER: usize = 0xF;

/// Levels of subroutine nesting.
pub const STACK_SIZE: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Sprites are always a single byte wide.
pub const SPRITE_WIDTH: usize = 8;

/// Default CPU clock speed in Hz.
pub const CLOCK_SPEED: u32 = 60;

/// The delay and sound timers count down at 60Hz regardless of the CPU clock.
pub const TIMER_FREQUENCY: u32 = 60;

pub const FONT_START: u16 = 0x000;
pub const FONT_GLYPH_SIZE: u16 = 5;

/// # Sprite Sheet
/// The hexadecimal digits 0..F, each 4 pixels wide and 5 rows tall.
/// Digit `d` lives at `FONT_START + d * FONT_GLYPH_SIZE`.
///
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
