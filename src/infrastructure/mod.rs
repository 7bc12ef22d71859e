//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - JSON file and PostgreSQL repository implementations
//! - [`rendering`] - QR/label rendering and PNG file storage

pub mod persistence;
pub mod rendering;
