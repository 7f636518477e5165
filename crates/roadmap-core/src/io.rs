use crate::error::{Result, RoadmapError};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

/// Read a specification document. A path that does not resolve is
/// `SpecNotFound`; content checks are left to [`crate::extract::validate_spec`].
pub fn read_spec(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(RoadmapError::SpecNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/config.yaml");
        atomic_write(&path, b"version: 1").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "version: 1");
    }

    #[test]
    fn write_if_missing_skips_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.yaml");
        std::fs::write(&path, b"original").unwrap();
        assert!(!write_if_missing(&path, b"new").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn read_spec_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = read_spec(&dir.path().join("nonexistent.md")).unwrap_err();
        assert!(matches!(err, RoadmapError::SpecNotFound(_)));
        assert!(err.to_string().starts_with("Specification file not found:"));
    }

    #[test]
    fn read_spec_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_spec(dir.path()),
            Err(RoadmapError::SpecNotFound(_))
        ));
    }

    #[test]
    fn read_spec_empty_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.md");
        std::fs::write(&path, "").unwrap();
        assert_eq!(read_spec(&path).unwrap(), "");
    }
}
