//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contracts; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! - [`RedirectRepository`] - Short code → record mapping
//! - [`CounterRepository`] - Global generation counter

pub mod counter_repository;
pub mod redirect_repository;

pub use counter_repository::CounterRepository;
pub use redirect_repository::RedirectRepository;

#[cfg(test)]
pub use counter_repository::MockCounterRepository;
#[cfg(test)]
pub use redirect_repository::MockRedirectRepository;
