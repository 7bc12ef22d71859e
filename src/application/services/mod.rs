//! Business logic services for the application layer.

pub mod generation_service;
pub mod redirect_service;

pub use generation_service::{Generated, GenerationService, Submission};
pub use redirect_service::{CodePolicy, RedirectService};
