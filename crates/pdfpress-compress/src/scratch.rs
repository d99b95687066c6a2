//! Per-job scratch files.
//!
//! # Design
//! - The scratch directory is created once at startup and never mutated.
//! - Every job derives its paths from a fresh UUID, so concurrent jobs are disjoint.
//! - Both scratch files are unlinked when the job is dropped, which covers
//!   early returns, panics, and cancelled request futures.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::error::{CompressError, CompressResult};

/// Process-wide directory holding per-job scratch files.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Ensure the directory exists and return a handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::Io`] if the directory cannot be created.
    pub fn prepare(root: impl Into<PathBuf>) -> CompressResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|source| CompressError::io("scratch.prepare", &root, source))?;
        Ok(Self { root })
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Allocate scratch paths for a new job. No file is created yet.
    #[must_use]
    pub fn job(&self) -> CompressionJob {
        let token = Uuid::new_v4();
        CompressionJob {
            token,
            input: self.root.join(format!("{token}_input.pdf")),
            output: self.root.join(format!("{token}_output.pdf")),
        }
    }
}

/// Scratch files of a single compression request.
#[derive(Debug)]
pub struct CompressionJob {
    token: Uuid,
    input: PathBuf,
    output: PathBuf,
}

impl CompressionJob {
    /// Job token.
    #[must_use]
    pub const fn token(&self) -> Uuid {
        self.token
    }

    /// Input scratch path.
    #[must_use]
    pub fn input_path(&self) -> &Path {
        &self.input
    }

    /// Output scratch path.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Write the uploaded bytes to the input path and return the size on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::Io`] if the file cannot be written or measured.
    pub async fn write_input(&self, bytes: &[u8]) -> CompressResult<u64> {
        tokio::fs::write(&self.input, bytes)
            .await
            .map_err(|source| CompressError::io("scratch.write_input", &self.input, source))?;
        let metadata = tokio::fs::metadata(&self.input)
            .await
            .map_err(|source| CompressError::io("scratch.measure_input", &self.input, source))?;
        Ok(metadata.len())
    }

    /// Read the compressor output into memory and unlink it.
    ///
    /// Returns `Ok(None)` when the compressor left no output file.
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::Io`] for any read failure other than a missing file.
    pub async fn take_output(&self) -> CompressResult<Option<Vec<u8>>> {
        let bytes = match tokio::fs::read(&self.output).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CompressError::io(
                    "scratch.read_output",
                    &self.output,
                    source,
                ));
            }
        };
        remove_quietly(&self.output);
        Ok(Some(bytes))
    }

    /// Unlink the input file as soon as the compressor is done with it.
    pub fn discard_input(&self) {
        remove_quietly(&self.input);
    }
}

impl Drop for CompressionJob {
    fn drop(&mut self) {
        remove_quietly(&self.input);
        remove_quietly(&self.output);
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(
            path = %path.display(),
            error = %err,
            "failed to remove scratch file"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pdfpress_test_support::scratch_entries;

    #[test]
    fn prepare_creates_missing_directories() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path().join("nested").join("scratch");
        let scratch = ScratchDir::prepare(&root)?;
        assert!(root.is_dir());
        assert_eq!(scratch.path(), root.as_path());
        // Preparing an existing directory is a no-op.
        ScratchDir::prepare(&root)?;
        Ok(())
    }

    #[test]
    fn prepare_fails_when_path_is_a_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("occupied");
        std::fs::write(&file, b"x")?;
        let err = ScratchDir::prepare(&file).err();
        assert!(matches!(
            err,
            Some(CompressError::Io {
                operation: "scratch.prepare",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn jobs_get_distinct_token_derived_paths() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let scratch = ScratchDir::prepare(temp.path())?;
        let first = scratch.job();
        let second = scratch.job();
        assert_ne!(first.token(), second.token());
        assert_eq!(
            first.input_path(),
            temp.path().join(format!("{}_input.pdf", first.token()))
        );
        assert_eq!(
            first.output_path(),
            temp.path().join(format!("{}_output.pdf", first.token()))
        );
        assert_ne!(first.input_path(), second.input_path());
        Ok(())
    }

    #[tokio::test]
    async fn drop_removes_both_files() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let scratch = ScratchDir::prepare(temp.path())?;
        let job = scratch.job();
        let size = job.write_input(b"%PDF-1.4 body").await?;
        assert_eq!(size, 13);
        tokio::fs::write(job.output_path(), b"%PDF-out").await?;
        assert_eq!(scratch_entries(temp.path())?.len(), 2);
        drop(job);
        assert!(scratch_entries(temp.path())?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn take_output_reads_and_unlinks() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let scratch = ScratchDir::prepare(temp.path())?;
        let job = scratch.job();
        assert!(job.take_output().await?.is_none());
        tokio::fs::write(job.output_path(), b"%PDF-out").await?;
        assert_eq!(job.take_output().await?.as_deref(), Some(&b"%PDF-out"[..]));
        assert!(!job.output_path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn discard_input_is_idempotent() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let scratch = ScratchDir::prepare(temp.path())?;
        let job = scratch.job();
        job.write_input(b"").await?;
        job.discard_input();
        job.discard_input();
        assert!(!job.input_path().exists());
        Ok(())
    }
}
