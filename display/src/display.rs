use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;

use emu8::{Display, DisplayError, Graphics};

/// # SdlDisplay
/// Shows the Chip-8 frame buffer in an SDL2 window.
///
/// Each Chip-8 pixel is drawn as a `scale` x `scale` square, white when lit
/// and black otherwise. The machine calls `render` after every CLS and DRW.
pub struct SdlDisplay {
    canvas: WindowCanvas,
    width: u32,
    height: u32,
}

impl SdlDisplay {
    /// Opens a window bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, String> {
        let graphics = Graphics::new();
        let (width, height) = (graphics.width() as u32, graphics.height() as u32);

        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window("Emu-8", width * scale, height * scale)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        canvas.clear();
        canvas.present();

        Ok(SdlDisplay {
            canvas,
            width,
            height,
        })
    }

    /// Copies a frame buffer into a locked RGB24 texture.
    ///
    /// Every pixel becomes three equal bytes, 0 or 255. Rows start `pitch`
    /// bytes apart, which SDL may pad beyond `3 * width`.
    fn frame_to_sdl_texture(graphics: &Graphics, buffer: &mut [u8], pitch: usize) {
        for (y, row) in graphics.rows().enumerate() {
            let line = &mut buffer[y * pitch..y * pitch + row.len() * 3];
            for (pixel, rgb) in row.iter().zip(line.chunks_mut(3)) {
                for channel in rgb.iter_mut() {
                    *channel = pixel * 255;
                }
            }
        }
    }
}

impl Display for SdlDisplay {
    fn render(&mut self, graphics: &Graphics) -> Result<(), DisplayError> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, self.width, self.height)
            .map_err(|e| DisplayError(e.to_string()))?;

        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                SdlDisplay::frame_to_sdl_texture(graphics, buffer, pitch);
            })
            .map_err(DisplayError)?;

        self.canvas
            .copy(&texture, None, None)
            .map_err(DisplayError)?;
        self.canvas.present();
        Ok(())
    }
}
