//! PNG rendering of labelled QR codes.

use ab_glyph::FontArc;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::error::AppError;
use crate::infrastructure::rendering::{label, qr};

/// Default pixel size of one QR module.
pub const DEFAULT_MODULE_PX: u32 = 10;

/// Renders a QR payload plus a text label into PNG bytes.
///
/// Rendering is CPU-bound; callers run it on the blocking pool.
pub trait QrRenderer: Send + Sync {
    fn render_png(&self, payload: &str, label: &str) -> Result<Vec<u8>, AppError>;
}

/// Production renderer: `qrcode` symbol with an `imageproc` text band.
pub struct LabeledQrRenderer {
    font: Option<FontArc>,
    module_px: u32,
}

impl LabeledQrRenderer {
    pub fn new(font: Option<FontArc>) -> Self {
        Self {
            font,
            module_px: DEFAULT_MODULE_PX,
        }
    }

    pub fn with_module_px(mut self, module_px: u32) -> Self {
        self.module_px = module_px.max(1);
        self
    }
}

impl QrRenderer for LabeledQrRenderer {
    fn render_png(&self, payload: &str, text: &str) -> Result<Vec<u8>, AppError> {
        let symbol = qr::generate_qr(payload, self.module_px)?;
        let labelled = label::append_label(&symbol, text, self.font.as_ref());

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(labelled).write_to(&mut cursor, ImageFormat::Png)?;

        Ok(cursor.into_inner())
    }
}
