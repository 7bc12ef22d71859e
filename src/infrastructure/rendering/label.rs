//! Text label compositing beneath a QR image.

use ab_glyph::{Font, PxScale, ScaleFont};
use image::{DynamicImage, GrayImage, Rgba, RgbaImage, imageops};
use imageproc::drawing::draw_text_mut;

/// Label font size in pixels.
pub const LABEL_FONT_SIZE: f32 = 28.0;

/// Vertical padding above and below the label text.
pub const LABEL_PADDING: u32 = 12;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const ELLIPSIS: &str = "...";

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Compute the line height for the given font and scale.
pub fn line_height<F: Font>(font: &F, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Shortens `text` with a trailing ellipsis until it fits in `max_width`.
pub fn fit_text<F: Font>(font: &F, scale: PxScale, text: &str, max_width: u32) -> String {
    if measure_text_width(font, scale, text) <= max_width {
        return text.to_string();
    }

    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}{}", chars.iter().collect::<String>().trim_end(), ELLIPSIS);
        if measure_text_width(font, scale, &candidate) <= max_width {
            return candidate;
        }
    }

    String::new()
}

/// Appends a white band beneath `qr` with `text` centred in it.
///
/// Without a font the band is still appended so every generated image has
/// the same layout; it simply stays blank.
pub fn append_label<F: Font>(qr: &GrayImage, text: &str, font: Option<&F>) -> RgbaImage {
    let scale = PxScale::from(LABEL_FONT_SIZE);
    let text_height = match font {
        Some(f) => line_height(f, scale),
        None => LABEL_FONT_SIZE.ceil() as u32,
    };
    let band = text_height + 2 * LABEL_PADDING;

    let width = qr.width();
    let mut canvas = RgbaImage::from_pixel(width, qr.height() + band, WHITE);
    let qr_rgba = DynamicImage::ImageLuma8(qr.clone()).to_rgba8();
    imageops::replace(&mut canvas, &qr_rgba, 0, 0);

    if let Some(font) = font {
        let max_width = width.saturating_sub(2 * LABEL_PADDING);
        let label = fit_text(font, scale, text, max_width);
        let text_width = measure_text_width(font, scale, &label) as i32;
        let x = ((width as i32) - text_width).max(0) / 2;
        let y = (qr.height() + LABEL_PADDING) as i32;
        draw_text_mut(&mut canvas, BLACK, x, y, scale, font, &label);
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::FontArc;
    use image::Luma;

    fn qr_stub(side: u32) -> GrayImage {
        GrayImage::from_pixel(side, side, Luma([0u8]))
    }

    #[test]
    fn test_append_label_without_font_adds_blank_band() {
        let qr = qr_stub(100);
        let out = append_label::<FontArc>(&qr, "Example", None);

        assert_eq!(out.width(), 100);
        assert!(out.height() > 100);
        assert_eq!(*out.get_pixel(50, 50), BLACK);
        assert_eq!(*out.get_pixel(50, out.height() - 1), WHITE);
    }

    #[test]
    fn test_append_label_band_height() {
        let qr = qr_stub(64);
        let out = append_label::<FontArc>(&qr, "", None);

        assert_eq!(
            out.height(),
            64 + LABEL_FONT_SIZE.ceil() as u32 + 2 * LABEL_PADDING
        );
    }

    #[test]
    fn test_append_label_with_system_font_draws_text() {
        // Only meaningful where a system font is installed.
        let Some(font) = crate::infrastructure::rendering::font::load_font(None) else {
            return;
        };
        let qr = GrayImage::from_pixel(300, 300, Luma([255u8]));
        let out = append_label(&qr, "Example", Some(&font));

        let band_has_ink = (300..out.height())
            .any(|y| (0..out.width()).any(|x| out.get_pixel(x, y)[0] < 128));
        assert!(band_has_ink);
    }

    #[test]
    fn test_fit_text_truncates_long_labels() {
        let Some(font) = crate::infrastructure::rendering::font::load_font(None) else {
            return;
        };
        let scale = PxScale::from(LABEL_FONT_SIZE);
        let long = "A very long display name that cannot possibly fit";

        let fitted = fit_text(&font, scale, long, 120);
        assert!(fitted.ends_with(ELLIPSIS));
        assert!(measure_text_width(&font, scale, &fitted) <= 120);
        assert_eq!(fit_text(&font, scale, "Hi", 120), "Hi");
    }
}
