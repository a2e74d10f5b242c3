use std::io;
use std::path::{Path, PathBuf};

/// Owner of one ephemeral on-disk artifact.
///
/// `allocate` reserves a uniquely named file in the system temp directory;
/// the file is removed when the guard drops, whichever way control leaves
/// the enclosing stage. Dropping after the file is already gone is a no-op.
#[derive(Debug)]
pub struct ScratchPath {
    path: PathBuf,
}

impl ScratchPath {
    pub fn allocate(prefix: &str, suffix: &str) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile()?;
        // Detach from tempfile's own cleanup; this guard owns the lifetime.
        let path = file.into_temp_path().keep().map_err(|e| e.error)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchPath {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("removed scratch file {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("failed to remove scratch file {}: {e}", self.path.display()),
        }
    }
}
