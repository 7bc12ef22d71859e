//! Short code generation and validation utilities.
//!
//! Codes are drawn uniformly from `[A-Za-z0-9]`. They are not secrets: the
//! only correctness concern is collisions, which the caller handles by
//! re-drawing against the store.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Code length used when no explicit length is configured.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest code accepted by the redirect resolver.
pub const MAX_CODE_LENGTH: usize = 64;

/// Generates a random alphanumeric code of exactly `length` characters.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Returns true if `code` has the shape of a short code.
///
/// Used by the resolver to answer 404 for path garbage without a store lookup.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Source of candidate short codes.
///
/// Production uses [`RandomCodeSource`]; tests substitute a scripted sequence
/// to exercise the collision path deterministically.
pub trait CodeSource: Send + Sync {
    fn next_code(&self, length: usize) -> String;
}

/// [`CodeSource`] backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeSource;

impl CodeSource for RandomCodeSource {
    fn next_code(&self, length: usize) -> String {
        generate_code(length)
    }
}
