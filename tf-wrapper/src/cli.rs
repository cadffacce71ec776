//! Command-line flags.
//!
//! Operators are used to the single-dash spelling (`-apply`, `-apply=false`),
//! so the known flags are rewritten to their double-dash form before clap sees
//! them. A flag given without a value means `true`; an explicit value must be
//! attached with `=`.

use std::ffi::OsString;

use anyhow::Result;
use clap::{ArgAction, Parser};

use crate::dispatch::Mode;

const SINGLE_DASH_FLAGS: [&str; 3] = ["-apply", "-destroy", "-console"];

#[derive(Debug, Parser)]
#[command(
    name = "tf-wrapper",
    version,
    about = "Provision Terraform and drive init/plan/apply/destroy",
    args_override_self = true
)]
pub struct Cli {
    /// Run 'terraform apply' to publish configuration without menu.
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = parse_switch
    )]
    pub apply: bool,

    /// Run 'terraform destroy' to remove configuration without menu.
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = parse_switch
    )]
    pub destroy: bool,

    /// Output Terraform stdout/stderr onto console instead of log file.
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = parse_switch
    )]
    pub console: bool,
}

impl Cli {
    /// Dispatch mode selected by the flags. Errors when both actions are requested.
    pub fn mode(&self) -> Result<Mode> {
        Mode::from_flags(self.apply, self.destroy)
    }
}

/// Boolean switch values: `1 t T TRUE true True` and `0 f F FALSE false False`.
fn parse_switch(value: &str) -> Result<bool, String> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(format!("invalid boolean value {other:?}")),
    }
}

/// Rewrite `-apply`, `-destroy` and `-console` (with or without `=value`) to
/// `--apply` etc.
///
/// Everything else passes through untouched so clap still reports unknown
/// arguments.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(flag) if is_single_dash_flag(flag) => OsString::from(format!("-{flag}")),
            _ => arg,
        })
        .collect()
}

fn is_single_dash_flag(arg: &str) -> bool {
    let name = arg.split_once('=').map_or(arg, |(name, _)| name);
    SINGLE_DASH_FLAGS.contains(&name)
}
