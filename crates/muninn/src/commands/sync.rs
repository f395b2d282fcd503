//! Sync command
//!
//! Runs the batch over the configured source registry. A failing source
//! is reported in the summary but never fails the command; only usage
//! errors (bad config, unknown source name) exit nonzero.

use anyhow::{Context, Result};
use camino::Utf8Path;
use muninn_core::SyncConfig;
use muninn_sync::{FetchClient, JsonFileSink, SourceOutcome, SyncOrchestrator};

use crate::cli::SyncArgs;
use crate::output;

pub async fn run(args: SyncArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config =
        SyncConfig::load_and_validate(config_path).context("Failed to load configuration")?;

    let sources = match &args.source {
        Some(name) => {
            let spec = config
                .source(name)
                .with_context(|| format!("Unknown source: {name}"))?;
            vec![spec.clone()]
        }
        None => config.sources().to_vec(),
    };

    if sources.is_empty() {
        output::warning("No sources configured; nothing to sync");
        return Ok(());
    }

    let client =
        FetchClient::new(&config.runtime().network).context("Failed to build HTTP client")?;
    let sink = JsonFileSink::new();
    let orchestrator = SyncOrchestrator::new(&client, &sink, config.sync_policy().clone())
        .with_dry_run(args.dry_run);

    output::header(&format!(
        "Syncing {} ({} sources)",
        config.name(),
        sources.len()
    ));

    let report = orchestrator.run(&sources).await;

    for outcome in &report.outcomes {
        match outcome {
            SourceOutcome::Succeeded {
                name,
                records,
                destination,
            } => {
                if args.dry_run {
                    output::success(&format!("{name}: {records} records (dry run, not written)"));
                } else {
                    output::success(&format!("{name}: {records} records -> {destination}"));
                }
            }
            SourceOutcome::Failed { name, error } => {
                output::error(&format!("{name}: {error}"));
            }
        }
    }

    output::info(&format!(
        "{} of {} sources synced in {:.1}s",
        report.succeeded(),
        report.outcomes.len(),
        report.elapsed.as_secs_f64()
    ));

    Ok(())
}
