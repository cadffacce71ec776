//! Credential provisioning for the Terraform child process.
//!
//! Values are collected into a [`ChildEnv`] and applied to each child
//! [`Command`] instead of mutating the wrapper's own environment.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::credentials::EnvVarSpec;
use crate::io::config::Config;

/// Asks the operator for a value.
pub trait Prompter {
    /// Show `message` and return the raw response line (without trimming).
    fn prompt(&mut self, message: &str) -> Result<String>;
}

/// Prompter over any line reader and writer (stdin/stdout in the binary).
pub struct StdioPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for StdioPrompter<R, W> {
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{message}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;
        let mut line = String::new();
        // End of input leaves `line` empty.
        self.input.read_line(&mut line).context("read prompt response")?;
        Ok(line)
    }
}

/// Where a provisioned value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvSource {
    Inherited,
    Config,
    Prompt,
}

/// Variables to set on child processes, in addition to the inherited environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildEnv {
    vars: BTreeMap<String, String>,
}

impl ChildEnv {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set every provisioned variable on `cmd`.
    pub fn apply(&self, cmd: &mut Command) {
        cmd.envs(&self.vars);
    }

    fn set(&mut self, name: &str, value: String) {
        self.vars.insert(name.to_string(), value);
    }
}

/// Provision each variable in `specs`, in order.
///
/// A variable already present according to `lookup` is left alone and
/// inherited by the child. Otherwise the config value is used verbatim, and
/// failing that the operator is prompted; the trimmed response is used even
/// when empty.
#[instrument(skip_all, fields(vars = specs.len()))]
pub fn provision_env<L, P>(
    specs: &[EnvVarSpec],
    config: &Config,
    lookup: L,
    prompter: &mut P,
) -> Result<ChildEnv>
where
    L: Fn(&str) -> Option<OsString>,
    P: Prompter,
{
    let mut env = ChildEnv::default();
    for spec in specs {
        let source = provision_one(spec, config, &lookup, prompter, &mut env)?;
        debug!(name = spec.name, ?source, "provisioned variable");
    }
    Ok(env)
}

fn provision_one<L, P>(
    spec: &EnvVarSpec,
    config: &Config,
    lookup: &L,
    prompter: &mut P,
    env: &mut ChildEnv,
) -> Result<EnvSource>
where
    L: Fn(&str) -> Option<OsString>,
    P: Prompter,
{
    if lookup(spec.name).is_some() {
        return Ok(EnvSource::Inherited);
    }
    if let Some(value) = config.get(spec.name) {
        env.set(spec.name, value.to_string());
        return Ok(EnvSource::Config);
    }
    let response = prompter
        .prompt(spec.prompt)
        .with_context(|| format!("prompt for {}", spec.name))?;
    env.set(spec.name, response.trim().to_string());
    Ok(EnvSource::Prompt)
}

/// Look a variable up in the wrapper's own process environment.
pub fn process_lookup(name: &str) -> Option<OsString> {
    std::env::var_os(name)
}
