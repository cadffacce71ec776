//! Terraform lifecycle steps and their fixed argument lists.

/// One lifecycle action the wrapper can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Init,
    Preview,
    Publish,
    Remove,
}

impl Step {
    /// Terraform arguments for this step. Not configurable.
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Step::Init => &["init"],
            Step::Preview => &["plan"],
            Step::Publish => &["apply", "-auto-approve"],
            Step::Remove => &["destroy", "-auto-approve"],
        }
    }

    /// Terraform subcommand name (`plan`, `apply`, ...).
    pub fn command(self) -> &'static str {
        self.args()[0]
    }

    /// Operator-facing verb used in status messages.
    pub fn verb(self) -> &'static str {
        match self {
            Step::Init => "initialize",
            Step::Preview => "preview",
            Step::Publish => "publish",
            Step::Remove => "remove",
        }
    }

    /// Full argument list; `-no-color` is appended when output goes to a log file.
    pub fn command_args(self, no_color: bool) -> Vec<&'static str> {
        let mut args = self.args().to_vec();
        if no_color {
            args.push("-no-color");
        }
        args
    }

    pub fn start_message(self) -> String {
        format!(
            "Running Terraform {} to {} configuration...",
            self.command(),
            self.verb()
        )
    }

    pub fn done_message(self) -> String {
        format!("Completed Terraform {}.", self.command())
    }
}
