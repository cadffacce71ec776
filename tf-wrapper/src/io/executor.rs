//! Executor abstraction for Terraform invocation.
//!
//! The [`Executor`] trait decouples dispatch from the actual child process.
//! Tests use scripted executors that record steps without spawning anything.

use anyhow::{Result, bail};
use tracing::{info, instrument, warn};

use crate::core::platform::Platform;
use crate::core::step::Step;
use crate::io::env::ChildEnv;
use crate::io::process::{OutputSink, build_command, run_to_sink};
use crate::io::resolver::Executable;

/// Abstraction over Terraform execution backends.
pub trait Executor {
    /// Run `step` to completion. A non-success exit status is an error.
    fn exec(&self, step: Step) -> Result<()>;
}

/// Executor that spawns the resolved Terraform binary.
pub struct TerraformExecutor {
    executable: Executable,
    platform: Platform,
    sink: OutputSink,
    env: ChildEnv,
}

impl TerraformExecutor {
    pub fn new(
        executable: Executable,
        platform: Platform,
        sink: OutputSink,
        env: ChildEnv,
    ) -> Self {
        Self {
            executable,
            platform,
            sink,
            env,
        }
    }

    /// Arguments for `step`, with `-no-color` when writing to the log file.
    pub fn args_for(&self, step: Step) -> Vec<&'static str> {
        step.command_args(self.sink.is_log_file())
    }
}

impl Executor for TerraformExecutor {
    #[instrument(skip_all, fields(step = step.command()))]
    fn exec(&self, step: Step) -> Result<()> {
        let args = self.args_for(step);
        let mut cmd = build_command(&self.executable.program, &args, &self.platform);
        self.env.apply(&mut cmd);

        info!(program = %self.executable.program.display(), ?args, "running terraform");
        let status = run_to_sink(cmd, &self.sink)?;
        if !status.success() {
            warn!(exit_code = ?status.code(), "terraform failed");
            bail!("terraform {} failed with {}", step.command(), status);
        }
        Ok(())
    }
}
