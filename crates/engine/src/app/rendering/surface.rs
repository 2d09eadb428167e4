use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

/// RGBA framebuffer presented to a window, rebuilt when the window size
/// changes.
pub struct PixelSurface {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl PixelSurface {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        let pixels = Self::build_pixels(Arc::clone(&window), width, height)?;
        Ok(Self {
            window,
            pixels,
            width,
            height,
        })
    }

    /// Returns `true` when the framebuffer was rebuilt. A minimized window
    /// keeps the previous buffer.
    pub fn sync_size(&mut self) -> Result<bool, Error> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 || (size.width, size.height) == self.size() {
            return Ok(false);
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), size.width, size.height)?;
        self.width = size.width;
        self.height = size.height;
        Ok(true)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn frame_mut(&mut self) -> &mut [u8] {
        self.pixels.frame_mut()
    }

    pub fn present(&self) -> Result<(), Error> {
        self.pixels.render()
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }
}
