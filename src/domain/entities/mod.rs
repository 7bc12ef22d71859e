//! Core domain entities.
//!
//! - [`RedirectRecord`] - A short code mapped to a destination URL and display metadata
//! - [`NewRedirect`] - Input for inserting a record
//! - [`RetentionPolicy`] - How long records remain resolvable

pub mod redirect;
pub mod retention;

pub use redirect::{NewRedirect, RedirectRecord};
pub use retention::RetentionPolicy;
