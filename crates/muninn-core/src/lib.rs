//! # muninn-core
//!
//! Core library for the Muninn CLI providing:
//! - Configuration file parsing (muninn.yaml)
//! - Type definitions for sources, transforms, and retry policies
//! - Retry execution engine with policy-based configuration

pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use config::SyncConfig;
pub use error::{Error, Result};
