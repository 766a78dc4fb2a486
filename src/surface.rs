//! Drawing seam between the simulation and whatever paints it.

use crate::error::SurfaceError;

/// Browser-reported geometry the sizing step works from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas `clientWidth` / `clientHeight`; zero before layout.
    pub client_width: f64,
    pub client_height: f64,
    /// `window.innerWidth` / `innerHeight`.
    pub window_width: f64,
    pub window_height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// A viewport whose canvas fills the window at 1x.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            client_width: width,
            client_height: height,
            window_width: width,
            window_height: height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Displayed canvas size in CSS pixels, using the window size for any
    /// axis the canvas reports as zero.
    pub fn logical_size(&self) -> (f64, f64) {
        let w = if self.client_width > 0.0 { self.client_width } else { self.window_width };
        let h = if self.client_height > 0.0 { self.client_height } else { self.window_height };
        (w, h)
    }

    pub fn pixel_ratio(&self) -> f64 {
        if self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }
}

/// 2D drawing operations the rain needs. Coordinates are CSS pixels once
/// [`Surface::resize_backing`] has installed the scale transform.
pub trait Surface {
    /// Sets the backing store to `width` x `height` device pixels and scales
    /// drawing by `scale`.
    fn resize_backing(&mut self, width: u32, height: u32, scale: f64) -> Result<(), SurfaceError>;

    fn set_fill(&mut self, style: &str);

    fn set_font(&mut self, font: &str);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError>;

    /// Width of `text` in the current font, in CSS pixels.
    fn measure_text(&mut self, text: &str) -> Result<f64, SurfaceError>;
}
