//! Image rendering collaborators.
//!
//! QR encoding, PNG encoding and glyph rasterisation are delegated to
//! `qrcode`, `image`, `imageproc` and `ab_glyph`; this module only wires
//! them together and stores the results.
//!
//! - [`qr`] - QR symbol rasterisation
//! - [`label`] - Text band compositing
//! - [`font`] - Label font loading with fallback
//! - [`renderer`] - [`QrRenderer`] trait and the production implementation
//! - [`image_store`] - Generated PNG files on disk

pub mod font;
pub mod image_store;
pub mod label;
pub mod qr;
pub mod renderer;

pub use image_store::ImageStore;
pub use renderer::{LabeledQrRenderer, QrRenderer};
