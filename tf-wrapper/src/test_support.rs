//! Test-only helpers: scripted executor/prompter, in-memory archives, and a
//! fake Terraform binary.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, bail};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::core::step::Step;
use crate::io::download::Fetcher;
use crate::io::env::Prompter;
use crate::io::executor::Executor;

/// Executor that records each step and fails the configured ones.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    fail: Vec<Step>,
    steps: RefCell<Vec<Step>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            fail: steps.into_iter().collect(),
            steps: RefCell::default(),
        }
    }

    /// Steps executed so far, in order.
    pub fn steps(&self) -> Vec<Step> {
        self.steps.borrow().clone()
    }
}

impl Executor for ScriptedExecutor {
    fn exec(&self, step: Step) -> Result<()> {
        self.steps.borrow_mut().push(step);
        if self.fail.contains(&step) {
            bail!("scripted failure for {}", step.command());
        }
        Ok(())
    }
}

/// Prompter that answers from a queue and records each message.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    responses: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        self.responses
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted response for {message:?}"))
    }
}

/// Fetcher that serves fixed bytes (or a fixed error) and records URLs.
#[derive(Debug)]
pub struct FakeFetcher {
    body: std::result::Result<Vec<u8>, String>,
    requested: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(body: Vec<u8>) -> Self {
        Self {
            body: Ok(body),
            requested: RefCell::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            body: Err(message.to_string()),
            requested: RefCell::default(),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        self.requested.borrow_mut().push(url.to_string());
        match &self.body {
            Ok(body) => {
                dest.write_all(body)?;
                Ok(body.len() as u64)
            }
            Err(message) => Err(anyhow!("{message}")),
        }
    }
}

/// One entry of an in-memory zip.
#[derive(Debug, Clone)]
pub struct ZipEntry {
    pub name: &'static str,
    pub contents: Option<&'static [u8]>,
    pub mode: u32,
}

impl ZipEntry {
    pub fn file(name: &'static str, contents: &'static [u8], mode: u32) -> Self {
        Self {
            name,
            contents: Some(contents),
            mode,
        }
    }

    pub fn dir(name: &'static str) -> Self {
        Self {
            name,
            contents: None,
            mode: 0o755,
        }
    }
}

/// Build a zip archive in memory.
pub fn zip_bytes(entries: &[ZipEntry]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        let options = SimpleFileOptions::default().unix_permissions(entry.mode);
        match entry.contents {
            Some(contents) => {
                writer.start_file(entry.name, options).expect("start file");
                writer.write_all(contents).expect("write entry");
            }
            None => writer
                .add_directory(entry.name, options)
                .expect("add directory"),
        }
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Shell script standing in for Terraform.
///
/// It echoes its arguments and the API token variables to stdout, writes a
/// line to stderr, and exits 1 when a `fail-<command>` file sits next to it.
#[cfg(unix)]
pub const FAKE_TERRAFORM: &str = r#"#!/bin/sh
echo "fake-terraform $*"
echo "DT_ENV_URL=${DT_ENV_URL-<unset>}"
echo "DT_API_TOKEN=${DT_API_TOKEN-<unset>}"
echo "fake-terraform stderr $1" >&2
if [ -f "${0%/*}/fail-$1" ]; then
  exit 1
fi
exit 0
"#;

/// Write [`FAKE_TERRAFORM`] as an executable `terraform` in `dir`.
#[cfg(unix)]
pub fn write_fake_terraform(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("terraform");
    fs::write(&path, FAKE_TERRAFORM).expect("write fake terraform");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake terraform");
    path
}

/// Make the fake Terraform in `dir` fail for `step`.
pub fn fail_step(dir: &Path, step: Step) {
    fs::write(dir.join(format!("fail-{}", step.command())), b"").expect("write fail marker");
}
