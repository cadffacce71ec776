//! Orchestration for one wrapper invocation.
//!
//! Order: validate flags, resolve the executable, load `wrapper.cfg`, open the
//! log file, provision credentials, then dispatch.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::core::credentials::required_env;
use crate::core::platform::Platform;
use crate::dispatch::dispatch;
use crate::io::config::load_config;
use crate::io::download::HttpFetcher;
use crate::io::env::{StdioPrompter, process_lookup, provision_env};
use crate::io::executor::TerraformExecutor;
use crate::io::process::OutputSink;
use crate::io::resolver::{ResolveRequest, resolve_executable};

/// Terraform release downloaded when none is installed.
pub const TERRAFORM_VERSION: &str = "1.9.8";
/// Configuration file read from the working directory.
pub const CONFIG_FILE_NAME: &str = "wrapper.cfg";
/// Log file receiving Terraform output unless `-console` is set.
pub const LOG_FILE_NAME: &str = "terraform.log";

/// Run the wrapper in the current working directory.
///
/// Every returned error is fatal; the caller prints it and exits nonzero.
pub fn run_session(cli: &Cli) -> Result<()> {
    let mode = cli.mode()?;
    let workdir = PathBuf::from(".");
    let platform = Platform::current();
    debug!(?mode, os = platform.os, arch = platform.arch, "starting session");

    let request = ResolveRequest {
        workdir: workdir.clone(),
        search_path: std::env::var_os("PATH"),
        platform,
        version: TERRAFORM_VERSION.to_string(),
    };
    let executable = resolve_executable(&request, HttpFetcher::new)
        .context("Error preparing Terraform executable")?;
    info!(
        program = %executable.program.display(),
        source = ?executable.source,
        "terraform resolved"
    );

    let config =
        load_config(&workdir.join(CONFIG_FILE_NAME)).context("Error loading configuration")?;

    let sink = open_sink(&workdir, cli.console)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let specs = required_env(config.credential_modes());
    let env = {
        let mut prompter = StdioPrompter::new(&mut input, io::stdout());
        provision_env(&specs, &config, process_lookup, &mut prompter)
            .context("Error reading credentials")?
    };
    debug!(
        provisioned = ?env.iter().map(|(name, _)| name).collect::<Vec<_>>(),
        "credentials ready"
    );

    let executor = TerraformExecutor::new(executable, platform, sink, env);
    let mut out = io::stdout();
    dispatch(&executor, mode, &mut input, &mut out)?;
    out.flush()?;
    Ok(())
}

fn open_sink(workdir: &Path, console: bool) -> Result<OutputSink> {
    if console {
        return Ok(OutputSink::Console);
    }
    println!("Redirecting Terraform output to {LOG_FILE_NAME}...");
    OutputSink::open_log(&workdir.join(LOG_FILE_NAME)).context("Failed to open log file")
}
