//! Crash-safe file output
//!
//! Files are written to a hidden sibling temp file and renamed into place,
//! so a process killed mid-write never leaves a truncated file at the final
//! path.

use crate::ArchiveError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Creates a directory and all missing parents
///
/// Idempotent, and safe when concurrent callers create overlapping prefixes.
pub async fn ensure_dir(path: &Path) -> Result<(), ArchiveError> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| ArchiveError::filesystem(path, e))
}

/// Writes `contents` to `dest`, replacing any existing file
pub async fn write_atomic(dest: &Path, contents: &[u8]) -> Result<(), ArchiveError> {
    let mut file = PartialFile::create(dest).await?;
    if let Err(e) = file.write(contents).await {
        file.discard().await;
        return Err(e);
    }
    file.commit().await?;
    Ok(())
}

/// A file being written under a temp name until committed
pub struct PartialFile {
    file: File,
    temp: PathBuf,
    dest: PathBuf,
    written: u64,
}

impl PartialFile {
    /// Opens a fresh temp file next to `dest`, creating parent directories
    pub async fn create(dest: &Path) -> Result<Self, ArchiveError> {
        if let Some(parent) = dest.parent() {
            ensure_dir(parent).await?;
        }

        let temp = temp_path_for(dest);
        let file = File::create(&temp)
            .await
            .map_err(|e| ArchiveError::filesystem(&temp, e))?;

        Ok(Self {
            file,
            temp,
            dest: dest.to_path_buf(),
            written: 0,
        })
    }

    /// Appends a chunk
    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), ArchiveError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| ArchiveError::filesystem(&self.temp, e))?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flushes the temp file and renames it over the destination
    pub async fn commit(mut self) -> Result<u64, ArchiveError> {
        self.flush().await?;
        drop(self.file);

        fs::rename(&self.temp, &self.dest)
            .await
            .map_err(|e| ArchiveError::filesystem(&self.dest, e))?;
        Ok(self.written)
    }

    /// Flushes the temp file and links it into place only if the
    /// destination does not exist yet
    ///
    /// The check and the link are one filesystem operation, so two writers
    /// racing for the same destination cannot overwrite each other. The
    /// filesystem must support hard links.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(bytes))` - The file now sits at the destination
    /// * `Ok(None)` - Another file was already there; it is left untouched
    /// * `Err(ArchiveError)` - Flushing or linking failed
    pub async fn commit_new(mut self) -> Result<Option<u64>, ArchiveError> {
        if let Err(e) = self.flush().await {
            self.discard().await;
            return Err(e);
        }
        drop(self.file);

        let linked = fs::hard_link(&self.temp, &self.dest).await;
        remove_temp(&self.temp).await;

        match linked {
            Ok(()) => Ok(Some(self.written)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(ArchiveError::filesystem(&self.dest, e)),
        }
    }

    /// Drops the temp file without touching the destination
    pub async fn discard(self) {
        drop(self.file);
        remove_temp(&self.temp).await;
    }

    async fn flush(&mut self) -> Result<(), ArchiveError> {
        self.file
            .flush()
            .await
            .map_err(|e| ArchiveError::filesystem(&self.temp, e))
    }
}

async fn remove_temp(temp: &Path) {
    if let Err(e) = fs::remove_file(temp).await {
        tracing::debug!("Failed to remove temp file {}: {}", temp.display(), e);
    }
}

/// Hidden, per-writer unique temp path in the destination's directory
fn temp_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    dest.with_file_name(format!(".{}.{}.{}.part", name, std::process::id(), n))
}
