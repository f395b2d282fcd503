//! Source registry types
//!
//! A source binds a remote endpoint to a transform and a local
//! destination. The registry is an ordered list; the orchestrator
//! processes it strictly in order.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{RetryPolicy, RuntimeConfig};

/// The parsed muninn.yaml file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SyncConfigFile {
    /// Config format version
    pub version: String,

    /// Project name
    pub name: String,

    /// Ordered source registry
    pub sources: Vec<SourceSpec>,

    /// Runtime overrides (timeouts, retry policies)
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// One external endpoint plus its transform and destination binding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceSpec {
    /// Unique source name, used as the transform key and in logs
    pub name: String,

    /// HTTP endpoint to fetch (GET, JSON body expected)
    pub endpoint: String,

    /// Local file the normalized record set is written to
    pub destination: Utf8PathBuf,

    /// Transform applied to the decoded payload
    #[serde(default)]
    pub transform: TransformSpec,

    /// Per-source retry policy override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryPolicy>,
}

/// Declarative transform selection for a source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum TransformSpec {
    /// Pass records through unchanged
    #[default]
    Identity,

    /// Rename fields on every record; unmapped fields pass through
    FieldMap { fields: BTreeMap<String, String> },
}
