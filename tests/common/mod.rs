#![allow(dead_code)]

use rain_wasm::error::SurfaceError;
use rain_wasm::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Backing(u32, u32, f64),
    Fill(String),
    Font(String),
    Rect(f64, f64, f64, f64),
    Text(String, f64, f64),
}

/// Records every drawing call; text measures as `text_width`.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
    pub text_width: f64,
    pub fail_text: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            text_width: 100.0,
            ..Self::default()
        }
    }

    pub fn take(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn resize_backing(&mut self, width: u32, height: u32, scale: f64) -> Result<(), SurfaceError> {
        self.ops.push(Op::Backing(width, height, scale));
        Ok(())
    }

    fn set_fill(&mut self, style: &str) {
        self.ops.push(Op::Fill(style.to_string()));
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(Op::Font(font.to_string()));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(Op::Rect(x, y, w, h));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError> {
        if self.fail_text {
            return Err(SurfaceError::new("fillText", "context lost"));
        }
        self.ops.push(Op::Text(text.to_string(), x, y));
        Ok(())
    }

    fn measure_text(&mut self, _text: &str) -> Result<f64, SurfaceError> {
        Ok(self.text_width)
    }
}
