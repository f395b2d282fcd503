//! Retry execution engine with policy-based configuration
//!
//! A reusable retry engine for the fetch pipeline. An operation is tried
//! up to `RetryPolicy::max_attempts` times; the delay between attempts
//! comes from the policy's strategy (fixed by default), every attempt is
//! reported to a `RetryObserver`, and the final failure surfaces with the
//! attempt count and total elapsed time attached.
//!
//! # Example
//!
//! ```rust,no_run
//! use muninn_core::retry::{retry_with_policy, RetryError};
//! use muninn_core::types::RetryPolicy;
//!
//! async fn example() -> Result<String, RetryError<std::io::Error>> {
//!     let policy = RetryPolicy::default();
//!
//!     retry_with_policy(&policy, || async {
//!         // Your fallible operation here
//!         Ok("success".to_string())
//!     }).await
//! }
//! ```

mod error;
mod executor;
mod observer;
mod strategies;

pub use error::RetryError;
pub use executor::{retry_with_policy, RetryExecutor, RetryExecutorBuilder, SimpleRetryExecutor};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use strategies::{
    calculate_delay, AlwaysRetry, ClosurePredicate, HttpStatusError, HttpStatusPredicate,
    NeverRetry, RetryPredicate,
};
