//! Interactive menu text and choice parsing.

use crate::core::step::Step;

pub const MENU: &str = "\n--------------------------\n\
Select an option:\n\
1. Preview configuration (terraform plan)\n\
2. Publish configuration (terraform apply)\n\
3. Remove configuration (terraform destroy)\n\
4. Exit\n";

pub const PROMPT: &str = "Enter your choice: ";

pub const INVALID_CHOICE: &str = "Invalid choice. Please enter 1, 2, 3, or 4.";

/// A parsed menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Step),
    Exit,
    Invalid,
}

impl MenuChoice {
    /// Parse one line of operator input. Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "1" => MenuChoice::Run(Step::Preview),
            "2" => MenuChoice::Run(Step::Publish),
            "3" => MenuChoice::Run(Step::Remove),
            "4" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}
