pub mod analyze;
pub mod artifacts;
pub mod config;
pub mod extract;
pub mod score;
pub mod validate;

use anyhow::Context;
use roadmap_core::config::PipelineConfig;
use std::path::Path;

/// The explicit `--config` file, or the project's own config, or the
/// built-in tables.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match explicit {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => PipelineConfig::load_or_default(root).context("failed to load config"),
    }
}
