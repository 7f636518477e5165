use crate::cmd::load_config;
use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use roadmap_core::config::{PipelineConfig, WarnLevel};
use roadmap_core::{io, paths};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write the built-in tables to .roadmap/config.yaml (never overwrites)
    Init,

    /// Print the effective configuration
    Show,

    /// Validate the config for weight, range and threshold mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    explicit: Option<&Path>,
    subcmd: ConfigSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| paths::config_path(root));
    match subcmd {
        ConfigSubcommand::Init => init(&path),
        ConfigSubcommand::Show => show(root, explicit, json),
        ConfigSubcommand::Validate => validate(&path, json),
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(path: &Path) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(&PipelineConfig::default())?;
    let written = io::write_if_missing(path, yaml.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    if written {
        println!("Wrote {}", path.display());
    } else {
        println!("{} already exists; left unchanged.", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, explicit: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load_config(root, explicit)?;
    if json {
        print_json(&config)
    } else {
        print!("{}", serde_yaml::to_string(&config)?);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(path: &Path, json: bool) -> anyhow::Result<()> {
    let config = if path.exists() {
        PipelineConfig::read_unchecked(path)
            .with_context(|| format!("failed to parse {}", path.display()))?
    } else {
        PipelineConfig::default()
    };
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
