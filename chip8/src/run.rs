use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use display::SdlDisplay;
use emu8::{Chip8, Chip8Error, DisplayError, Options};

use crate::keypad::SdlKeypad;

/// Where `run` gets its program and how it shows it.
pub struct Config {
    /// Read from stdin when absent
    pub program: Option<PathBuf>,
    pub options: Options,
    pub scale: u32,
}

/// Opens a window, loads the program and runs it until it quits or fails.
pub fn run(config: Config) -> Result<(), Chip8Error> {
    let sdl = sdl2::init().map_err(DisplayError)?;
    let display = SdlDisplay::new(&sdl, config.scale).map_err(DisplayError)?;
    let keypad = SdlKeypad::new(&sdl).map_err(Chip8Error::Keypad)?;

    let mut chip8 = Chip8::new(config.options, display, keypad)?;
    match config.program {
        Some(path) => {
            log::debug!("loading {}", path.display());
            let mut reader = BufReader::new(File::open(path)?);
            chip8.load_from(&mut reader)?;
        }
        None => {
            log::debug!("loading from stdin");
            chip8.load_from(&mut io::stdin().lock())?;
        }
    }

    chip8.run()
}
