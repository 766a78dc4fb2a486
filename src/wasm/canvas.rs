use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::error::SurfaceError;
use crate::surface::{Surface, Viewport};

/// [`Surface`] backed by a 2D canvas context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    pub fn viewport(&self, window: &Window) -> Viewport {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport {
            client_width: self.canvas.client_width() as f64,
            client_height: self.canvas.client_height() as f64,
            window_width: dim(window.inner_width()),
            window_height: dim(window.inner_height()),
            device_pixel_ratio: window.device_pixel_ratio(),
        }
    }
}

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl Surface for CanvasSurface {
    fn resize_backing(&mut self, width: u32, height: u32, scale: f64) -> Result<(), SurfaceError> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.ctx
            .set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)
            .map_err(|e| SurfaceError::new("setTransform", describe(&e)))
    }

    fn set_fill(&mut self, style: &str) {
        self.ctx.set_fill_style_str(style);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ctx
            .fill_text(text, x, y)
            .map_err(|e| SurfaceError::new("fillText", describe(&e)))
    }

    fn measure_text(&mut self, text: &str) -> Result<f64, SurfaceError> {
        self.ctx
            .measure_text(text)
            .map(|m| m.width())
            .map_err(|e| SurfaceError::new("measureText", describe(&e)))
    }
}
