//! Scripted stand-in for the Ghostscript binary.
//!
//! # Design
//! - Writes a POSIX shell script that understands the subset of the
//!   Ghostscript command line the service emits.
//! - Records every invocation's arguments so tests can assert on them.
//! - Behaviour is fixed at creation time; each test builds its own script.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Version string reported by the fake compressor for `--version`.
pub const FAKE_VERSION: &str = "10.02.1";

/// What the fake compressor does when asked to compress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBehavior {
    /// Write a small PDF to the requested output path and exit 0.
    Shrink,
    /// Copy the input to the output unchanged and exit 0.
    Copy,
    /// Print a diagnostic to stderr and exit 1 without writing output.
    Fail,
    /// Exit 0 without creating the output file.
    NoOutput,
    /// Sleep well past any test timeout.
    Hang,
}

/// Handle on a fake compressor script written to disk.
#[derive(Debug, Clone)]
pub struct FakeCompressor {
    /// Path of the executable script.
    pub program: PathBuf,
    /// File that accumulates one line of arguments per invocation.
    pub args_log: PathBuf,
}

impl FakeCompressor {
    /// Write a fake compressor into `dir` with the given behaviour.
    ///
    /// The argument log lives next to the script, so `dir` should not be the
    /// scratch directory under test.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be written or made executable.
    pub fn install(dir: &Path, behavior: FakeBehavior) -> Result<Self> {
        let program = dir.join("fake-gs");
        let args_log = dir.join("fake-gs.args");
        fs::write(&program, script(&args_log, behavior))?;
        make_executable(&program)?;
        Ok(Self { program, args_log })
    }

    /// Argument lines recorded so far, one entry per compress invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    pub fn invocations(&self) -> Result<Vec<String>> {
        if !self.args_log.exists() {
            return Ok(Vec::new());
        }
        Ok(fs::read_to_string(&self.args_log)?
            .lines()
            .map(str::to_string)
            .collect())
    }
}

fn script(args_log: &Path, behavior: FakeBehavior) -> String {
    let action = match behavior {
        FakeBehavior::Shrink => {
            "head -c 5 \"$input\" | grep -q '%PDF-' || { echo 'Error: /undefined in input' >&2; exit 1; }\n\
             printf '%%PDF-1.4\\n%% fake compressed\\n%%%%EOF\\n' > \"$output\""
        }
        FakeBehavior::Copy => "cp \"$input\" \"$output\"",
        FakeBehavior::Fail => "echo 'Error: /syntaxerror in pdfwrite' >&2\nexit 1",
        FakeBehavior::NoOutput => "true",
        FakeBehavior::Hang => "exec sleep 30",
    };
    format!(
        r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "{FAKE_VERSION}"
  exit 0
fi
echo "$*" >> "{log}"
output=""
input=""
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) output="${{arg#-sOutputFile=}}" ;;
    -*) ;;
    *) input="$arg" ;;
  esac
done
{action}
exit 0
"#,
        log = args_log.display(),
    )
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_parses_output_flag_and_logs_arguments() {
        let text = script(Path::new("/tmp/log"), FakeBehavior::Shrink);
        assert!(text.starts_with("#!/bin/sh\n"));
        assert!(text.contains("-sOutputFile=*) output=\"${arg#-sOutputFile=}\""));
        assert!(text.contains(">> \"/tmp/log\""));
        assert!(text.contains(FAKE_VERSION));
    }

    #[test]
    fn behaviours_render_distinct_actions() {
        let log = Path::new("/tmp/log");
        assert!(script(log, FakeBehavior::Fail).contains("exit 1"));
        assert!(script(log, FakeBehavior::Hang).contains("sleep 30"));
        assert!(script(log, FakeBehavior::Copy).contains("cp \"$input\" \"$output\""));
        assert!(!script(log, FakeBehavior::NoOutput).contains("> \"$output\""));
    }

    #[cfg(unix)]
    #[test]
    fn install_writes_executable_script() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir()?;
        let fake = FakeCompressor::install(dir.path(), FakeBehavior::Shrink)?;
        let mode = fs::metadata(&fake.program)?.permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
        assert!(fake.invocations()?.is_empty());
        Ok(())
    }
}
