//! Application layer services implementing business logic.
//!
//! Services consume repository traits and rendering collaborators and give
//! HTTP handlers a small API.
//!
//! # Available Services
//!
//! - [`services::redirect_service::RedirectService`] - Code allocation, resolution and retention
//! - [`services::generation_service::GenerationService`] - Submission workflow

pub mod services;
