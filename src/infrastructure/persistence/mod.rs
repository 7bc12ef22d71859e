//! Repository implementations.
//!
//! Two interchangeable storage strategies implement the domain traits:
//!
//! - [`JsonFileStore`] - flat keyed-record JSON file plus counter file
//! - [`PgRedirectRepository`] / [`PgCounterRepository`] - PostgreSQL tables via SQLx

pub mod json_file_store;
pub mod pg_counter_repository;
pub mod pg_redirect_repository;

pub use json_file_store::JsonFileStore;
pub use pg_counter_repository::PgCounterRepository;
pub use pg_redirect_repository::PgRedirectRepository;
