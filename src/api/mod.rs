//! HTTP layer for redirects, image delivery and health checks.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for JSON responses
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, rate limiting and tracing middleware

pub mod dto;
pub mod handlers;
pub mod middleware;
