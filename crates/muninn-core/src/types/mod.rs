//! Type definitions for sources, transforms, and runtime configuration

mod runtime_config;
mod source;

pub use runtime_config::{
    NetworkConfig, RetryPoliciesConfig, RetryPolicy, RetryStrategy, RuntimeConfig,
};
pub use source::{SourceSpec, SyncConfigFile, TransformSpec};
