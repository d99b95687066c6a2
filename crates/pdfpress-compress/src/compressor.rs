//! External compressor seam and its Ghostscript implementation.
//!
//! # Design
//! - The tool is always invoked with an explicit argument vector, never a shell string.
//! - stderr is captured for the logs; callers only see the failure kind.
//! - Each invocation is bounded by a timeout; the child is killed when the
//!   wait is abandoned.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::quality::QualityProfile;

/// Upper bound on a `--version` probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Ways an external compressor run can fail.
#[derive(Debug, Error)]
pub enum CompressorFailure {
    /// The binary could not be started.
    #[error("compressor could not be started")]
    Spawn {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Waiting on the child failed.
    #[error("compressor wait failed")]
    Wait {
        /// Underlying IO error.
        source: io::Error,
    },
    /// The binary exited with a failure status.
    #[error("compressor exited unsuccessfully")]
    Exit {
        /// Exit code, absent when the child was terminated by a signal.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },
    /// The binary did not finish within the configured bound.
    #[error("compressor timed out")]
    Timeout {
        /// Configured bound.
        after: Duration,
    },
    /// The binary reported success without writing the output file.
    #[error("compressor produced no output")]
    MissingOutput {
        /// Expected output path.
        path: PathBuf,
    },
}

/// External PDF compressor.
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Compress `input` into `output` using the given profile.
    async fn compress(
        &self,
        input: &Path,
        output: &Path,
        profile: QualityProfile,
    ) -> Result<(), CompressorFailure>;

    /// Check that the tool is invocable, returning its version string.
    async fn probe(&self) -> Option<String>;
}

/// Ghostscript `pdfwrite` compressor.
#[derive(Debug, Clone)]
pub struct GhostscriptCompressor {
    program: PathBuf,
    timeout: Duration,
}

impl GhostscriptCompressor {
    /// Build a compressor that runs `program` and waits at most `timeout`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Argument vector for a single compression run.
    #[must_use]
    pub fn arguments(input: &Path, output: &Path, profile: QualityProfile) -> Vec<OsString> {
        let mut output_flag = OsString::from("-sOutputFile=");
        output_flag.push(output);
        vec![
            OsString::from("-sDEVICE=pdfwrite"),
            OsString::from("-dCompatibilityLevel=1.4"),
            OsString::from(format!("-dPDFSETTINGS={}", profile.settings_flag())),
            OsString::from("-dNOPAUSE"),
            OsString::from("-dQUIET"),
            OsString::from("-dBATCH"),
            output_flag,
            input.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl Compressor for GhostscriptCompressor {
    async fn compress(
        &self,
        input: &Path,
        output: &Path,
        profile: QualityProfile,
    ) -> Result<(), CompressorFailure> {
        let child = Command::new(&self.program)
            .args(Self::arguments(input, output, profile))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CompressorFailure::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let Ok(waited) = tokio::time::timeout(self.timeout, child.wait_with_output()).await else {
            warn!(
                program = %self.program.display(),
                timeout_secs = self.timeout.as_secs(),
                "compressor timed out; child killed"
            );
            return Err(CompressorFailure::Timeout {
                after: self.timeout,
            });
        };
        let finished = waited.map_err(|source| CompressorFailure::Wait { source })?;

        if finished.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&finished.stderr).trim().to_string();
        warn!(
            program = %self.program.display(),
            code = ?finished.status.code(),
            stderr = %stderr,
            "compressor exited unsuccessfully"
        );
        Err(CompressorFailure::Exit {
            code: finished.status.code(),
            stderr,
        })
    }

    async fn probe(&self) -> Option<String> {
        let run = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();
        match tokio::time::timeout(PROBE_TIMEOUT, run).await {
            Ok(Ok(finished)) if finished.status.success() => {
                let version = String::from_utf8_lossy(&finished.stdout).trim().to_string();
                debug!(program = %self.program.display(), version = %version, "compressor probe ok");
                Some(version)
            }
            Ok(Ok(finished)) => {
                debug!(
                    program = %self.program.display(),
                    code = ?finished.status.code(),
                    "compressor probe exited unsuccessfully"
                );
                None
            }
            Ok(Err(err)) => {
                debug!(program = %self.program.display(), error = %err, "compressor probe failed to start");
                None
            }
            Err(_) => {
                debug!(program = %self.program.display(), "compressor probe timed out");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_follow_pdfwrite_template() {
        let args = GhostscriptCompressor::arguments(
            Path::new("/scratch/a_input.pdf"),
            Path::new("/scratch/a_output.pdf"),
            QualityProfile::Medium,
        );
        let rendered: Vec<_> = args.iter().map(|arg| arg.to_string_lossy()).collect();
        assert_eq!(
            rendered,
            [
                "-sDEVICE=pdfwrite",
                "-dCompatibilityLevel=1.4",
                "-dPDFSETTINGS=/ebook",
                "-dNOPAUSE",
                "-dQUIET",
                "-dBATCH",
                "-sOutputFile=/scratch/a_output.pdf",
                "/scratch/a_input.pdf",
            ]
        );
    }

    #[test]
    fn arguments_keep_paths_with_spaces_as_single_arguments() {
        let args = GhostscriptCompressor::arguments(
            Path::new("/scratch dir/in.pdf"),
            Path::new("/scratch dir/out.pdf"),
            QualityProfile::Low,
        );
        assert_eq!(args.len(), 8);
        assert_eq!(args[2], "-dPDFSETTINGS=/screen");
        assert_eq!(args[6], "-sOutputFile=/scratch dir/out.pdf");
        assert_eq!(args[7], "/scratch dir/in.pdf");
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_failure() {
        let compressor = GhostscriptCompressor::new(
            "/nonexistent/pdfpress-gs-missing",
            Duration::from_secs(5),
        );
        let result = compressor
            .compress(
                Path::new("/tmp/in.pdf"),
                Path::new("/tmp/out.pdf"),
                QualityProfile::High,
            )
            .await;
        assert!(matches!(result, Err(CompressorFailure::Spawn { .. })));
        assert!(compressor.probe().await.is_none());
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use anyhow::Result;
        use pdfpress_test_support::{FAKE_VERSION, FakeBehavior, FakeCompressor, sample_pdf};

        struct Fixture {
            _bin: tempfile::TempDir,
            work: tempfile::TempDir,
            fake: FakeCompressor,
        }

        fn fixture(behavior: FakeBehavior) -> Result<Fixture> {
            let bin = tempfile::tempdir()?;
            let work = tempfile::tempdir()?;
            let fake = FakeCompressor::install(bin.path(), behavior)?;
            Ok(Fixture {
                _bin: bin,
                work,
                fake,
            })
        }

        #[tokio::test]
        async fn successful_run_writes_output_and_passes_template() -> Result<()> {
            let fx = fixture(FakeBehavior::Shrink)?;
            let input = fx.work.path().join("in.pdf");
            let output = fx.work.path().join("out.pdf");
            std::fs::write(&input, sample_pdf(4096))?;

            let compressor = GhostscriptCompressor::new(&fx.fake.program, Duration::from_secs(10));
            compressor
                .compress(&input, &output, QualityProfile::High)
                .await?;

            assert!(std::fs::read(&output)?.starts_with(b"%PDF-"));
            let calls = fx.fake.invocations()?;
            assert_eq!(calls.len(), 1);
            assert!(calls[0].contains("-dPDFSETTINGS=/printer"));
            assert!(calls[0].contains(&format!("-sOutputFile={}", output.display())));
            Ok(())
        }

        #[tokio::test]
        async fn failing_run_captures_stderr() -> Result<()> {
            let fx = fixture(FakeBehavior::Fail)?;
            let compressor = GhostscriptCompressor::new(&fx.fake.program, Duration::from_secs(10));
            let result = compressor
                .compress(
                    &fx.work.path().join("in.pdf"),
                    &fx.work.path().join("out.pdf"),
                    QualityProfile::Low,
                )
                .await;
            match result {
                Err(CompressorFailure::Exit { code, stderr }) => {
                    assert_eq!(code, Some(1));
                    assert!(stderr.contains("syntaxerror"));
                }
                other => panic!("unexpected result: {other:?}"),
            }
            Ok(())
        }

        #[tokio::test]
        async fn hanging_run_times_out() -> Result<()> {
            let fx = fixture(FakeBehavior::Hang)?;
            let compressor =
                GhostscriptCompressor::new(&fx.fake.program, Duration::from_millis(200));
            let started = std::time::Instant::now();
            let result = compressor
                .compress(
                    &fx.work.path().join("in.pdf"),
                    &fx.work.path().join("out.pdf"),
                    QualityProfile::Medium,
                )
                .await;
            assert!(matches!(result, Err(CompressorFailure::Timeout { .. })));
            assert!(started.elapsed() < Duration::from_secs(10));
            Ok(())
        }

        #[tokio::test]
        async fn probe_reports_version() -> Result<()> {
            let fx = fixture(FakeBehavior::Shrink)?;
            let compressor = GhostscriptCompressor::new(&fx.fake.program, Duration::from_secs(10));
            assert_eq!(compressor.probe().await.as_deref(), Some(FAKE_VERSION));
            assert!(fx.fake.invocations()?.is_empty());
            Ok(())
        }
    }
}
