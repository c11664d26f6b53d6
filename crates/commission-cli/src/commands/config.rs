//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use commission_core::CommissionConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "output.absent_placeholder")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Get { key } => get_config(&key),
        ConfigCommand::Set { key, value } => set_config(&key, &value),
        ConfigCommand::Path => show_path(),
    }
}

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("commission")
        .join("config.json")
}

fn load_or_default(config_path: &Path) -> anyhow::Result<CommissionConfig> {
    if config_path.exists() {
        Ok(CommissionConfig::from_file(config_path)?)
    } else {
        Ok(CommissionConfig::default())
    }
}

fn show_config() -> anyhow::Result<()> {
    let config_path = default_config_path();

    if !config_path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = load_or_default(&config_path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = CommissionConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(key: &str) -> anyhow::Result<()> {
    let config = load_or_default(&default_config_path())?;

    // Convert config to JSON for key lookup
    let json = serde_json::to_value(&config)?;
    let value = lookup_key(&json, key)?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(key: &str, value: &str) -> anyhow::Result<()> {
    let config_path = default_config_path();

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let config = load_or_default(&config_path)?;

    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    let config = apply_setting(&config, key, parsed_value.clone())?;
    config.save(&config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

/// Navigate a dotted key path.
fn lookup_key<'a>(json: &'a serde_json::Value, key: &str) -> anyhow::Result<&'a serde_json::Value> {
    let mut current = json;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }
    Ok(current)
}

/// Return a copy of `config` with the dotted `key` set to `value`.
///
/// Only existing keys can be set, and the result must still be a valid
/// configuration.
fn apply_setting(
    config: &CommissionConfig,
    key: &str,
    value: serde_json::Value,
) -> anyhow::Result<CommissionConfig> {
    let mut json = serde_json::to_value(config)?;

    let parts: Vec<&str> = key.split('.').collect();
    let mut current = &mut json;

    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path"))?;
            if !obj.contains_key(*part) {
                anyhow::bail!("Configuration key not found: {}", key);
            }
            obj.insert((*part).to_string(), value.clone());
        } else {
            current = current
                .get_mut(*part)
                .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
        }
    }

    let config: CommissionConfig = serde_json::from_value(json)?;
    config.validate()?;
    Ok(config)
}

fn show_path() -> anyhow::Result<()> {
    let config_path = default_config_path();

    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'commission config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_key() {
        let json = serde_json::to_value(CommissionConfig::default()).unwrap();
        assert_eq!(
            lookup_key(&json, "output.absent_placeholder").unwrap(),
            &serde_json::Value::String("-".to_string())
        );
        assert!(lookup_key(&json, "output.missing").is_err());
    }

    #[test]
    fn test_apply_setting() {
        let config = apply_setting(
            &CommissionConfig::default(),
            "extraction.max_document_bytes",
            serde_json::json!(2048),
        )
        .unwrap();
        assert_eq!(config.extraction.max_document_bytes, 2048);

        let config = apply_setting(
            &config,
            "codes.skip_header_row",
            serde_json::json!(false),
        )
        .unwrap();
        assert!(!config.codes.skip_header_row);
        assert_eq!(config.extraction.max_document_bytes, 2048);
    }

    #[test]
    fn test_apply_setting_rejects_bad_values() {
        let config = CommissionConfig::default();
        assert!(apply_setting(&config, "output.unknown", serde_json::json!(1)).is_err());
        assert!(apply_setting(&config, "nope.key", serde_json::json!(1)).is_err());
        assert!(apply_setting(&config, "extraction.voucher_marker", serde_json::json!("")).is_err());
        assert!(
            apply_setting(&config, "extraction.max_document_bytes", serde_json::json!("big"))
                .is_err()
        );
    }
}
