//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//! - [`retention_worker`] - Background sweep enforcing the retention policy
//!
//! The domain layer has no knowledge of HTTP, templates or a concrete
//! storage engine. Services in [`crate::application::services`] consume the
//! repository traits.

pub mod entities;
pub mod repositories;
pub mod retention_worker;
