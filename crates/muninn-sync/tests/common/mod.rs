//! Shared helpers for sync integration tests
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

pub mod mock_server;

#[allow(unused_imports)]
pub use mock_server::*;
