//! Batch sync orchestration
//!
//! The orchestrator walks the source registry in order, strictly one
//! source at a time: fetch with retries, transform, persist. A failing
//! source is logged and recorded; it never aborts the batch, and the
//! batch itself cannot fail.

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use muninn_core::types::{RetryPolicy, SourceSpec};
use tracing::{error, info};

use crate::error::SyncError;
use crate::fetch::Fetcher;
use crate::sink::RecordSink;
use crate::transform;

/// Sequential batch runner over a source registry
pub struct SyncOrchestrator<'a> {
    fetcher: &'a dyn Fetcher,
    sink: &'a dyn RecordSink,
    default_policy: RetryPolicy,
    dry_run: bool,
}

impl<'a> SyncOrchestrator<'a> {
    /// Create an orchestrator
    ///
    /// `default_policy` applies to every source without its own retry
    /// override.
    pub fn new(
        fetcher: &'a dyn Fetcher,
        sink: &'a dyn RecordSink,
        default_policy: RetryPolicy,
    ) -> Self {
        Self {
            fetcher,
            sink,
            default_policy,
            dry_run: false,
        }
    }

    /// Fetch and transform but skip the persistence sink
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the batch over `sources` in registry order
    ///
    /// Every source is processed exactly once. The report carries one
    /// outcome per source, in order.
    pub async fn run(&self, sources: &[SourceSpec]) -> SyncReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(sources.len());

        for source in sources {
            info!(
                source = %source.name,
                endpoint = %source.endpoint,
                "syncing source"
            );

            match self.sync_source(source).await {
                Ok(records) => {
                    info!(
                        source = %source.name,
                        records,
                        destination = %source.destination,
                        "source synced"
                    );
                    outcomes.push(SourceOutcome::Succeeded {
                        name: source.name.clone(),
                        records,
                        destination: source.destination.clone(),
                    });
                }
                Err(err) => {
                    error!(
                        source = %source.name,
                        error = %err,
                        "source failed, continuing batch"
                    );
                    outcomes.push(SourceOutcome::Failed {
                        name: source.name.clone(),
                        error: err,
                    });
                }
            }
        }

        SyncReport {
            started_at,
            elapsed: start.elapsed(),
            outcomes,
        }
    }

    async fn sync_source(&self, source: &SourceSpec) -> Result<usize, SyncError> {
        let policy = source.retry.as_ref().unwrap_or(&self.default_policy);

        let payload = self.fetcher.fetch(&source.endpoint, policy).await?;

        let transform = transform::from_spec(&source.transform);
        let records = transform
            .apply(payload)
            .map_err(|err| SyncError::Transform {
                name: source.name.clone(),
                source: err,
            })?;

        if !self.dry_run {
            self.sink.write(&source.destination, &records)?;
        }

        Ok(records.len())
    }
}

/// Outcome of one source within a batch
#[derive(Debug)]
pub enum SourceOutcome {
    /// Fetch, transform, and persist all succeeded
    Succeeded {
        name: String,
        records: usize,
        destination: Utf8PathBuf,
    },

    /// The source failed at some stage; the batch continued
    Failed { name: String, error: SyncError },
}

impl SourceOutcome {
    /// The source's name
    pub fn name(&self) -> &str {
        match self {
            Self::Succeeded { name, .. } => name,
            Self::Failed { name, .. } => name,
        }
    }

    /// Whether the source synced successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// The failure, if any
    pub fn failure(&self) -> Option<&SyncError> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Per-source outcomes of one batch run
#[derive(Debug)]
pub struct SyncReport {
    /// When the batch started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the batch
    pub elapsed: Duration,

    /// One outcome per source, in registry order
    pub outcomes: Vec<SourceOutcome>,
}

impl SyncReport {
    /// Number of sources that synced successfully
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of sources that failed
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}
