//! Config commands

use anyhow::{bail, Context, Result};
use camino::Utf8Path;
use muninn_core::config::generate_default_config;
use muninn_core::SyncConfig;

use crate::cli::{ConfigCommands, ConfigInitArgs, ConfigShowArgs, ConfigValidateArgs};
use crate::output;

pub fn run(command: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    match command {
        ConfigCommands::Init(args) => init(args),
        ConfigCommands::Validate(args) => validate(args, config_path),
        ConfigCommands::Show(args) => show(args, config_path),
    }
}

fn init(args: ConfigInitArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.output);
    }

    std::fs::write(&args.output, generate_default_config(&args.name))
        .with_context(|| format!("Failed to write {}", args.output))?;

    output::success(&format!("Wrote {}", args.output));
    Ok(())
}

fn validate(args: ConfigValidateArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let path = args.file.as_deref().or(config_path);
    let config = SyncConfig::load_and_validate(path)?;

    output::success(&format!(
        "{} is valid ({} sources)",
        config.config_path,
        config.sources().len()
    ));
    Ok(())
}

fn show(args: ConfigShowArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = SyncConfig::load_and_validate(config_path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config.config)?);
    } else {
        print!("{}", config.to_yaml()?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_init_writes_a_loadable_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = Utf8PathBuf::from_path_buf(dir.path().join("muninn.yaml")).unwrap();

        init(ConfigInitArgs {
            name: "fresh".into(),
            output: output.clone(),
            force: false,
        })
        .unwrap();

        let config = SyncConfig::load_and_validate(Some(output.as_path())).unwrap();
        assert_eq!(config.name(), "fresh");
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = Utf8PathBuf::from_path_buf(dir.path().join("muninn.yaml")).unwrap();
        std::fs::write(&output, "existing").unwrap();

        let err = init(ConfigInitArgs {
            name: "fresh".into(),
            output: output.clone(),
            force: false,
        })
        .unwrap_err();
        assert!(err.to_string().contains("already exists"));

        // And the original content survived
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "existing");
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = Utf8PathBuf::from_path_buf(dir.path().join("muninn.yaml")).unwrap();
        std::fs::write(&output, "existing").unwrap();

        init(ConfigInitArgs {
            name: "fresh".into(),
            output: output.clone(),
            force: true,
        })
        .unwrap();

        assert!(SyncConfig::load(Some(output.as_path())).is_ok());
    }

    #[test]
    fn test_validate_reports_invalid_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("muninn.yaml")).unwrap();
        std::fs::write(
            &path,
            r#"
version: "1.0"
name: broken
sources:
  - name: users
    endpoint: "not a url"
    destination: a.json
"#,
        )
        .unwrap();

        let result = validate(
            ConfigValidateArgs {
                file: Some(path.clone()),
            },
            None,
        );
        assert!(result.is_err());
    }
}
