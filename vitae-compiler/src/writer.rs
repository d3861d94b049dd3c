//! Atomic artifact writer.
//!
//! 1. Compare with the bytes already on disk → skip if identical.
//! 2. Create the parent directory.
//! 3. Write to `<path>.vitae.tmp`.
//! 4. Rename to the final path (atomic on POSIX); drop the tmp on failure.

use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::Artifact;
use crate::error::{io_err, WriteError};

/// Outcome of an individual artifact write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File already held exactly these bytes.
    Unchanged { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::Unchanged { path } => path,
        }
    }
}

/// Write `artifact` to `<dir>/<artifact filename>`.
pub fn write_artifact(dir: &Path, artifact: &Artifact) -> Result<WriteResult, WriteError> {
    let path = dir.join(artifact.filename());
    let tmp = PathBuf::from(format!("{}.vitae.tmp", path.display()));
    atomic_write_with_tmp(&path, artifact.body(), &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &[u8], tmp: &Path) -> Result<WriteResult, WriteError> {
    if let Ok(existing) = fs::read(path) {
        if existing == content {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = fs::rename(tmp, path) {
        let _ = fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source(text: &str) -> Artifact {
        Artifact::source("classic", text.to_string())
    }

    #[test]
    fn first_write_returns_written() {
        let tmp = TempDir::new().unwrap();
        let result = write_artifact(tmp.path(), &source("hello")).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(result.path(), tmp.path().join("classic.tex"));
        assert_eq!(fs::read_to_string(result.path()).unwrap(), "hello");
    }

    #[test]
    fn second_write_same_content_returns_unchanged() {
        let tmp = TempDir::new().unwrap();
        write_artifact(tmp.path(), &source("same")).unwrap();
        let result = write_artifact(tmp.path(), &source("same")).unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
    }

    #[test]
    fn changed_content_returns_written() {
        let tmp = TempDir::new().unwrap();
        write_artifact(tmp.path(), &source("v1")).unwrap();
        let result = write_artifact(tmp.path(), &source("v2")).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(fs::read_to_string(result.path()).unwrap(), "v2");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let result = write_artifact(tmp.path(), &source("data")).unwrap();
        let tmp_path = PathBuf::from(format!("{}.vitae.tmp", result.path().display()));
        assert!(!tmp_path.exists(), ".vitae.tmp must be cleaned up");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out").join("nested");
        let artifact = Artifact::pdf("classic", b"%PDF-1.5\n".to_vec());
        let result = write_artifact(&dir, &artifact).unwrap();
        assert_eq!(fs::read(dir.join("classic.pdf")).unwrap(), b"%PDF-1.5\n");
        assert!(matches!(result, WriteResult::Written { .. }));
    }

    #[test]
    fn rename_failure_removes_tmp() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory at the destination makes the rename fail.
        let path = tmp.path().join("classic.tex");
        fs::create_dir_all(path.join("occupied")).unwrap();
        let tmp_path = tmp.path().join("classic.tex.vitae.tmp");
        let err = atomic_write_with_tmp(&path, b"x", &tmp_path).unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
        assert!(!tmp_path.exists());
    }
}
