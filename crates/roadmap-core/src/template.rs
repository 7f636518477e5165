use crate::classifier::DomainDistribution;
use crate::config::{DomainRule, TemplateConfig};
use crate::paths;
use crate::types::TemplateSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// PathProbe
// ---------------------------------------------------------------------------

/// Existence check used by template discovery. Injected so discovery can run
/// against a fake filesystem.
pub trait PathProbe {
    fn exists(&self, path: &Path) -> bool;
}

impl<F> PathProbe for F
where
    F: Fn(&Path) -> bool,
{
    fn exists(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDiscovery {
    pub source: TemplateSource,
    /// Resolved directory; `None` for inline generation.
    pub path: Option<PathBuf>,
    pub priority: u8,
}

impl TemplateDiscovery {
    pub fn inline() -> Self {
        Self {
            source: TemplateSource::Inline,
            path: None,
            priority: TemplateSource::Inline.priority(),
        }
    }

    /// `<dir>/<template_type>.md`, or `None` when generating inline.
    pub fn template_file(&self, template_type: &str) -> Option<PathBuf> {
        self.path
            .as_ref()
            .map(|dir| dir.join(format!("{template_type}.md")))
    }
}

/// Return the first configured location that exists, in priority order.
/// Inline generation needs no check and always terminates the search.
pub fn discover(root: &Path, config: &TemplateConfig, probe: &dyn PathProbe) -> TemplateDiscovery {
    let mut locations: Vec<_> = config
        .locations
        .iter()
        .filter(|l| l.source != TemplateSource::Inline)
        .collect();
    locations.sort_by_key(|l| l.source.priority());

    for loc in locations {
        let dir = match paths::resolve_location(root, &loc.path) {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!(source = %loc.source, error = %e, "skipping template location");
                continue;
            }
        };
        if probe.exists(&dir) {
            tracing::debug!(source = %loc.source, path = %dir.display(), "found template directory");
            return TemplateDiscovery {
                source: loc.source,
                path: Some(dir),
                priority: loc.source.priority(),
            };
        }
    }

    tracing::info!("no template directory found, generating inline");
    TemplateDiscovery::inline()
}

// ---------------------------------------------------------------------------
// Type selection
// ---------------------------------------------------------------------------

/// Template type for the dominant domain. An empty distribution or an
/// unmapped domain gets `default_type`.
pub fn select_template_type(
    dist: &DomainDistribution,
    domains: &[DomainRule],
    config: &TemplateConfig,
) -> String {
    if dist.is_empty() {
        return config.default_type.clone();
    }
    dist.top()
        .and_then(|top| domains.iter().find(|d| d.name == top.domain))
        .and_then(|d| d.template.clone())
        .unwrap_or_else(|| config.default_type.clone())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSelection {
    pub template_type: String,
    pub discovery: TemplateDiscovery,
    /// File to load, when a directory was found.
    pub template_file: Option<PathBuf>,
}

pub fn select_template(
    root: &Path,
    dist: &DomainDistribution,
    domains: &[DomainRule],
    config: &TemplateConfig,
    probe: &dyn PathProbe,
) -> TemplateSelection {
    let template_type = select_template_type(dist, domains, config);
    let discovery = discover(root, config, probe);
    let template_file = discovery.template_file(&template_type);
    TemplateSelection {
        template_type,
        discovery,
        template_file,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
