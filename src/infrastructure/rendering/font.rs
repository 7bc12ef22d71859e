//! Label font loading with fallback.
//!
//! Resolution order: the configured font file, then well-known system
//! fonts. A font that fails to load or parse is logged and skipped.

use ab_glyph::FontArc;
use std::path::Path;

/// Loads the label font.
///
/// Returns `None` when neither the configured path nor any system candidate
/// yields a usable TTF/OTF; labels are then left blank.
pub fn load_font(configured: Option<&Path>) -> Option<FontArc> {
    if let Some(path) = configured {
        match load_font_file(path) {
            Ok(font) => {
                tracing::info!(path = %path.display(), "Using configured label font");
                return Some(font);
            }
            Err(reason) => {
                tracing::warn!(path = %path.display(), "Failed to load label font: {reason}; falling back");
            }
        }
    }

    for candidate in system_font_candidates() {
        let path = Path::new(candidate);
        if let Ok(font) = load_font_file(path) {
            tracing::info!(path = %candidate, "Using system font for labels");
            return Some(font);
        }
    }

    tracing::warn!("No usable label font found (set FONT_PATH or install system fonts); labels will be blank");
    None
}

fn load_font_file(path: &Path) -> Result<FontArc, String> {
    let data = std::fs::read(path).map_err(|e| e.to_string())?;
    FontArc::try_from_vec(data).map_err(|_| "failed to parse font data (TTF/OTF)".to_string())
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/Library/Fonts/Arial.ttf",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &["C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\segoeui.ttf"]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        ]
    }
}
