//! Building and running Terraform child processes.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, error, instrument};

use crate::core::platform::Platform;

/// Destination for child stdout and stderr. Both streams always share it.
#[derive(Debug)]
pub enum OutputSink {
    Console,
    LogFile { path: PathBuf, file: File },
}

impl OutputSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open_log(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        Ok(OutputSink::LogFile {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn is_log_file(&self) -> bool {
        matches!(self, OutputSink::LogFile { .. })
    }

    fn stdio_pair(&self) -> Result<(Stdio, Stdio)> {
        match self {
            OutputSink::Console => Ok((Stdio::inherit(), Stdio::inherit())),
            OutputSink::LogFile { path, file } => {
                let stdout = file
                    .try_clone()
                    .with_context(|| format!("clone handle for {}", path.display()))?;
                let stderr = file
                    .try_clone()
                    .with_context(|| format!("clone handle for {}", path.display()))?;
                Ok((stdout.into(), stderr.into()))
            }
        }
    }
}

/// Build the command for `program args...`.
///
/// Windows goes through `cmd.exe /C` so the shell resolves the program path
/// and extension.
pub fn build_command(program: &Path, args: &[&str], platform: &Platform) -> Command {
    let mut cmd = if platform.is_windows() {
        let mut cmd = Command::new("cmd.exe");
        cmd.arg("/C").arg(program);
        cmd
    } else {
        Command::new(program)
    };
    cmd.args(args);
    cmd
}

/// Run `cmd` to completion with stdin detached and output sent to `sink`.
#[instrument(skip_all, fields(program = ?cmd.get_program()))]
pub fn run_to_sink(mut cmd: Command, sink: &OutputSink) -> Result<ExitStatus> {
    let (stdout, stderr) = sink.stdio_pair()?;
    cmd.stdin(Stdio::null()).stdout(stdout).stderr(stderr);

    debug!(args = ?cmd.get_args().collect::<Vec<_>>(), "spawning child process");
    let status = match cmd.status() {
        Ok(status) => status,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };
    debug!(exit_code = ?status.code(), "command finished");
    Ok(status)
}
