//! Configuration file loading and parsing

use crate::error::{Error, Result};
use crate::types::{RetryPolicy, RuntimeConfig, SourceSpec, SyncConfigFile};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::fs;

/// Configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["muninn.yaml", "muninn.yml"];

/// Retry policy key used for batch sync fetches
const SYNC_OPERATION: &str = "sync";

/// Loaded Muninn configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// The parsed configuration
    pub config: SyncConfigFile,

    /// Path to the configuration file
    pub config_path: Utf8PathBuf,

    /// Working directory (the config file's parent)
    pub working_dir: Utf8PathBuf,
}

impl SyncConfig {
    /// Load configuration from the specified path or search for it
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (config_path, content) = if let Some(p) = path {
            let content = fs::read_to_string(p).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::config_not_found(p.as_str())
                } else {
                    Error::Io(e)
                }
            })?;
            (p.to_owned(), content)
        } else {
            Self::find_config()?
        };

        let working_dir = config_path
            .parent()
            .map(|p| p.to_owned())
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        let config: SyncConfigFile = serde_yaml_ng::from_str(&content)?;

        Ok(Self {
            config,
            config_path,
            working_dir,
        })
    }

    /// Load configuration and reject invalid registries up front
    pub fn load_and_validate(path: Option<&Utf8Path>) -> Result<Self> {
        let loaded = Self::load(path)?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate the source registry and retry policies
    ///
    /// Checks that source names are unique, endpoints are http(s) URLs,
    /// destinations are set, and every retry policy in play has at least
    /// one attempt and a nonzero per-attempt deadline.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for source in &self.config.sources {
            if source.name.is_empty() {
                return Err(Error::missing_field("sources[].name"));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(Error::duplicate_source(&source.name));
            }

            let parsed = url::Url::parse(&source.endpoint)
                .map_err(|_| Error::invalid_endpoint(&source.name, &source.endpoint))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::invalid_endpoint(&source.name, &source.endpoint));
            }

            if source.destination.as_str().is_empty() {
                return Err(Error::missing_field(format!(
                    "sources[{}].destination",
                    source.name
                )));
            }

            if let Some(policy) = &source.retry {
                validate_policy(policy, &format!("sources[{}].retry", source.name))?;
            }
        }

        let policies = &self.config.runtime.retry_policies;
        validate_policy(&policies.default, "runtime.retry-policies.default")?;
        for (name, policy) in &policies.operations {
            validate_policy(policy, &format!("runtime.retry-policies.operations[{name}]"))?;
        }

        Ok(())
    }

    /// Find configuration file in current directory or parent directories
    fn find_config() -> Result<(Utf8PathBuf, String)> {
        let cwd = std::env::current_dir().map_err(Error::Io)?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))?;

        let mut current = cwd.as_path();

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let content = fs::read_to_string(&path)?;
                    return Ok((path, content));
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::config_not_found(
            "muninn.yaml (searched current and parent directories)",
        ))
    }

    /// Project name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The ordered source registry
    pub fn sources(&self) -> &[SourceSpec] {
        &self.config.sources
    }

    /// Runtime configuration
    pub fn runtime(&self) -> &RuntimeConfig {
        &self.config.runtime
    }

    /// Look up a source by name
    pub fn source(&self, name: &str) -> Option<&SourceSpec> {
        self.config.sources.iter().find(|s| s.name == name)
    }

    /// The retry policy governing batch sync fetches
    ///
    /// Sources may still carry their own override; the orchestrator
    /// resolves that per source.
    pub fn sync_policy(&self) -> &RetryPolicy {
        self.config.runtime.retry_policies.policy_for(SYNC_OPERATION)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(&self.config).map_err(Error::from)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Utf8Path) -> Result<()> {
        let content = self.to_yaml()?;
        fs::write(path, content)?;
        Ok(())
    }
}

fn validate_policy(policy: &RetryPolicy, context: &str) -> Result<()> {
    if policy.max_attempts < 1 {
        return Err(Error::invalid_config(format!(
            "{context}: max-attempts must be at least 1"
        )));
    }
    if policy.attempt_timeout_ms == 0 {
        return Err(Error::invalid_config(format!(
            "{context}: attempt-timeout-ms must be positive"
        )));
    }
    Ok(())
}

/// Generate a starter muninn.yaml
pub fn generate_default_config(name: &str) -> String {
    format!(
        r#"---
# Muninn source registry
version: "1.0"
name: {name}

sources:
  - name: users
    endpoint: https://jsonplaceholder.typicode.com/users
    destination: data/users.json
    transform:
      type: field-map
      fields:
        name: full-name

runtime:
  retry-policies:
    operations:
      sync:
        max-attempts: 3
        strategy: fixed-delay
        initial-delay-ms: 1500
        attempt-timeout-ms: 4000
"#
    )
}
