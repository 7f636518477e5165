use crate::error::{Result, RoadmapError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ROADMAP_DIR: &str = ".roadmap";
pub const CONFIG_FILE: &str = ".roadmap/config.yaml";

pub const LOCAL_TEMPLATES_DIR: &str = "./templates/roadmaps/";
pub const USER_TEMPLATES_DIR: &str = "~/.claude/templates/roadmaps/";
pub const PLUGIN_TEMPLATES_DIR: &str = "plugins/superclaude/templates/roadmaps/";

pub const TASKLISTS_DIR: &str = "tasklists";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn roadmap_dir(root: &Path) -> PathBuf {
    root.join(ROADMAP_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Expand a leading `~/` against the user's home directory.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = home::home_dir().ok_or(RoadmapError::HomeNotFound)?;
            Ok(home.join(rest))
        }
        None if path == "~" => home::home_dir().ok_or(RoadmapError::HomeNotFound),
        None => Ok(PathBuf::from(path)),
    }
}

/// Resolve a template location against the project root. Absolute and
/// home-relative paths are left as they are.
pub fn resolve_location(root: &Path, path: &str) -> Result<PathBuf> {
    let expanded = expand_home(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(root.join(expanded))
    }
}

/// File stem of a specification path, used as the title placeholder.
pub fn spec_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.roadmap/config.yaml")
        );
        assert_eq!(roadmap_dir(root), PathBuf::from("/tmp/proj/.roadmap"));
    }

    #[test]
    fn relative_location_joins_root() {
        let root = Path::new("/tmp/proj");
        let p = resolve_location(root, "plugins/x/").unwrap();
        assert_eq!(p, PathBuf::from("/tmp/proj/plugins/x/"));
    }

    #[test]
    fn absolute_location_untouched() {
        let root = Path::new("/tmp/proj");
        let p = resolve_location(root, "/opt/templates").unwrap();
        assert_eq!(p, PathBuf::from("/opt/templates"));
    }

    #[test]
    fn home_location_expands() {
        if let Some(home) = home::home_dir() {
            let p = resolve_location(Path::new("/tmp/proj"), "~/.claude/t").unwrap();
            assert_eq!(p, home.join(".claude/t"));
        }
    }

    #[test]
    fn stem_of_spec() {
        assert_eq!(spec_stem(Path::new("docs/auth-spec.md")), "auth-spec");
        assert_eq!(spec_stem(Path::new("/")), "unknown");
    }
}
