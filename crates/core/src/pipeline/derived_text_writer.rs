use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to stage content for {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to replace {path}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persists derived text beside its source file.
///
/// The derived path is the source path with `.{suffix}` appended. Content
/// is staged to a temporary file in the destination directory and renamed
/// into place, so an existing output is replaced atomically and a crash
/// never leaves a half-written file at the destination.
pub struct DerivedTextWriter {
    suffix: &'static str,
}

impl DerivedTextWriter {
    pub fn new(suffix: &'static str) -> Self {
        Self { suffix }
    }

    pub fn derived_path(&self, source: &Path) -> PathBuf {
        let mut name = OsString::from(source.as_os_str());
        name.push(".");
        name.push(self.suffix);
        PathBuf::from(name)
    }

    /// Write `content` to the derived path. Returns whether a file was
    /// written: an existing output (without `overwrite`) and empty content
    /// are both idempotent skips, not errors.
    pub fn persist(
        &self,
        source: &Path,
        content: &str,
        overwrite: bool,
    ) -> Result<bool, PersistError> {
        if content.is_empty() {
            log::info!("nothing to write for {}", source.display());
            return Ok(false);
        }
        let target = self.derived_path(source);
        if !overwrite && target.exists() {
            log::info!("output already exists, skipping {}", target.display());
            return Ok(false);
        }

        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        let stage_err = |e: std::io::Error| PersistError::Stage {
            path: target.clone(),
            source: e,
        };
        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(stage_err)?;
        staged.write_all(content.as_bytes()).map_err(stage_err)?;
        staged.persist(&target).map_err(|e| PersistError::Commit {
            path: target.clone(),
            source: e.error,
        })?;
        log::debug!("wrote {}", target.display());
        Ok(true)
    }
}
