//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_normalizer`] - Destination URL normalization
//! - [`base_url`] - Base URL extraction from HTTP headers

pub mod base_url;
pub mod code_generator;
pub mod url_normalizer;
