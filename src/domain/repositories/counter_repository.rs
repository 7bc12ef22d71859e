//! Repository trait for the global generation counter.

use crate::error::AppError;
use async_trait::async_trait;

/// Durable, monotonically increasing count of successful generations.
///
/// `increment` performs read + increment + persist as one critical section
/// and returns the new value. A crash between the increment and the
/// persist loses at most that one count.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterRepository: Send + Sync {
    async fn increment(&self) -> Result<u64, AppError>;

    async fn current(&self) -> Result<u64, AppError>;
}
