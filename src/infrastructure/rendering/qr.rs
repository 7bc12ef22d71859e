//! QR symbol rasterisation.

use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};

use crate::error::AppError;

/// Light modules around the symbol required by the QR specification.
pub const QUIET_ZONE_MODULES: u32 = 4;

/// Encodes `data` as a QR symbol and rasterises it.
///
/// Every module becomes a `module_px` × `module_px` square; the quiet zone is
/// included, so the image is `(modules + 8) * module_px` pixels on each side.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the payload does not fit in a QR symbol.
pub fn generate_qr(data: &str, module_px: u32) -> Result<GrayImage, AppError> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| {
        AppError::internal(
            "QR encode error",
            serde_json::json!({ "reason": e.to_string() }),
        )
    })?;

    let module_px = module_px.max(1);
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let side = (modules + 2 * QUIET_ZONE_MODULES) * module_px;

    let mut img = GrayImage::from_pixel(side, side, Luma([255u8]));

    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }

        let x = (i as u32 % modules + QUIET_ZONE_MODULES) * module_px;
        let y = (i as u32 / modules + QUIET_ZONE_MODULES) * module_px;
        for dy in 0..module_px {
            for dx in 0..module_px {
                img.put_pixel(x + dx, y + dy, Luma([0u8]));
            }
        }
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_qr_is_square() {
        let img = generate_qr("http://localhost:5000/r/AB12cd", 10).unwrap();
        assert!(img.width() > 0);
        assert_eq!(img.width(), img.height());
    }

    #[test]
    fn generate_qr_has_white_quiet_zone() {
        let img = generate_qr("https://example.com", 4).unwrap();
        for i in 0..QUIET_ZONE_MODULES * 4 {
            assert_eq!(img.get_pixel(i, i)[0], 255);
        }
    }

    #[test]
    fn generate_qr_has_dark_finder_pattern() {
        let module_px = 5;
        let img = generate_qr("https://example.com", module_px).unwrap();
        let origin = QUIET_ZONE_MODULES * module_px;
        assert_eq!(img.get_pixel(origin, origin)[0], 0);
    }

    #[test]
    fn generate_qr_side_matches_module_scale() {
        let small = generate_qr("same payload", 2).unwrap();
        let large = generate_qr("same payload", 4).unwrap();
        assert_eq!(large.width(), small.width() * 2);
    }

    #[test]
    fn generate_qr_rejects_oversized_payload() {
        let data = "x".repeat(8000);
        assert!(generate_qr(&data, 1).is_err());
    }
}
