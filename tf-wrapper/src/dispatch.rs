//! Command dispatch: `init`, then a flag-mode action or the interactive menu.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::core::menu::{INVALID_CHOICE, MENU, MenuChoice, PROMPT};
use crate::core::step::Step;
use crate::io::executor::Executor;

/// What to do after `init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Menu loop until the operator exits.
    Interactive,
    /// `-apply`: publish and exit.
    Publish,
    /// `-destroy`: remove and exit.
    Remove,
}

impl Mode {
    /// Select the mode from the two action flags, which are mutually exclusive.
    pub fn from_flags(apply: bool, destroy: bool) -> Result<Self> {
        match (apply, destroy) {
            (true, true) => bail!("Cannot use both -apply and -destroy flags simultaneously."),
            (true, false) => Ok(Mode::Publish),
            (false, true) => Ok(Mode::Remove),
            (false, false) => Ok(Mode::Interactive),
        }
    }
}

/// Why the menu loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// Operator chose option 4.
    Exit,
    /// Input closed before an exit choice.
    EndOfInput,
}

/// Run `init`, then the action selected by `mode`.
///
/// Failures of `init` and of flag-mode actions are returned; failures inside
/// the menu are reported to `out` and the loop continues.
pub fn dispatch<E, R, W>(executor: &E, mode: Mode, input: &mut R, out: &mut W) -> Result<()>
where
    E: Executor,
    R: BufRead,
    W: Write,
{
    executor
        .exec(Step::Init)
        .context("Error initializing Terraform")?;
    debug!(?mode, "initialized");

    match mode {
        Mode::Publish => run_flag_step(executor, Step::Publish, out),
        Mode::Remove => run_flag_step(executor, Step::Remove, out),
        Mode::Interactive => {
            let exit = run_menu(executor, input, out)?;
            debug!(?exit, "menu finished");
            Ok(())
        }
    }
}

fn run_flag_step<E: Executor, W: Write>(executor: &E, step: Step, out: &mut W) -> Result<()> {
    writeln!(out, "\n{}", step.start_message())?;
    executor
        .exec(step)
        .with_context(|| format!("Failed to {} configuration", step.verb()))?;
    writeln!(out, "{}", step.done_message())?;
    Ok(())
}

/// Print the menu and run selections until the operator exits.
///
/// Invalid input re-prompts; there is no iteration limit.
pub fn run_menu<E, R, W>(executor: &E, input: &mut R, out: &mut W) -> Result<MenuExit>
where
    E: Executor,
    R: BufRead,
    W: Write,
{
    loop {
        write!(out, "{MENU}{PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("read menu choice")? == 0 {
            writeln!(out, "\nExiting.")?;
            return Ok(MenuExit::EndOfInput);
        }

        match MenuChoice::parse(&line) {
            MenuChoice::Run(step) => {
                writeln!(out, "\n{}", step.start_message())?;
                info!(step = step.command(), "menu action");
                if let Err(err) = executor.exec(step) {
                    warn!(step = step.command(), err = %err, "menu action failed");
                    writeln!(out, "Failed to {} configuration: {err:#}", step.verb())?;
                }
                writeln!(out, "{}", step.done_message())?;
            }
            MenuChoice::Exit => {
                writeln!(out, "Exiting.")?;
                return Ok(MenuExit::Exit);
            }
            MenuChoice::Invalid => writeln!(out, "{INVALID_CHOICE}")?,
        }
    }
}
