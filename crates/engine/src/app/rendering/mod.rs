mod surface;

pub use surface::PixelSurface;
