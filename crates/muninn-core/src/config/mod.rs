//! Configuration file loading, validation, and generation

mod loader;

pub use loader::{generate_default_config, SyncConfig};
