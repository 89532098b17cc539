use thiserror::Error;

use crate::graphics::Graphics;

#[derive(Debug, Error)]
#[error("unable to render frame: {0}")]
pub struct DisplayError(pub String);

/// # Display
/// Something that can show the Chip-8 frame buffer.
///
/// The machine calls `render` synchronously after every instruction that
/// changes the frame buffer. A failure to render stops the machine, since the
/// screen is its only output.
pub trait Display {
    fn render(&mut self, graphics: &Graphics) -> Result<(), DisplayError>;
}

/// A display that draws nothing, for running headless.
#[derive(Debug, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn render(&mut self, _graphics: &Graphics) -> Result<(), DisplayError> {
        Ok(())
    }
}

impl<D: Display + ?Sized> Display for &mut D {
    fn render(&mut self, graphics: &Graphics) -> Result<(), DisplayError> {
        (**self).render(graphics)
    }
}
