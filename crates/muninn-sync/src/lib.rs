//! # muninn-sync
//!
//! The sync engine behind the Muninn CLI:
//! - `fetch`: bounded, retrying HTTP fetch of JSON payloads
//! - `transform`: per-source normalization of decoded payloads
//! - `sink`: scoped writes of record sets to local destinations
//! - `orchestrator`: the sequential batch loop with per-source fault
//!   isolation

pub mod error;
pub mod fetch;
pub mod orchestrator;
pub mod sink;
pub mod transform;

pub use error::{FetchError, SinkError, SyncError, TransformError};
pub use fetch::{FetchClient, Fetcher};
pub use orchestrator::{SourceOutcome, SyncOrchestrator, SyncReport};
pub use sink::{JsonFileSink, RecordSink};
