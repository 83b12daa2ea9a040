// Interactive prompts and CLI output helpers

use anyhow::Result;
use inquire::Select;
use owo_colors::OwoColorize;
use std::fmt;
use std::io::IsTerminal;

/// What the reviewer decided about a change set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approve)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => write!(f, "Approve"),
            Self::Reject => write!(f, "Reject"),
        }
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" | "accept" | "yes" => Ok(Self::Approve),
            "reject" | "rejected" | "discard" | "no" => Ok(Self::Reject),
            other => Err(format!("unknown decision '{}'. Available: approve, reject", other)),
        }
    }
}

/// Check if we should use interactive mode
pub fn is_interactive() -> bool {
    // Never be interactive in test environment or CI
    if is_test_env() || is_ci() {
        return false;
    }

    std::io::stdin().is_terminal()
}

/// Whether stdout can take ANSI colour
pub fn stdout_supports_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
}

/// Check if running in test environment
/// 1. Compile-time test flag (cfg!(test))
/// 2. Runtime environment variable (DOCREVIEW_TEST)
fn is_test_env() -> bool {
    cfg!(test) || std::env::var("DOCREVIEW_TEST").is_ok()
}

/// Ask the reviewer to approve or reject the change set
pub fn prompt_verdict() -> Result<Verdict> {
    let choice = Select::new("Apply the proposed changes?", vec![Verdict::Approve, Verdict::Reject])
        .prompt()?;
    Ok(choice)
}

/// Print a header with decoration
pub fn print_header(text: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!("{} {}", "▸".bright_cyan(), text.bright_cyan().bold());
    println!("{}", "━".repeat(60).bright_black());
    println!();
}

pub fn print_success(text: &str) {
    println!("{} {}", "✓".bright_green(), text.green());
}

pub fn print_info(text: &str) {
    println!("{} {}", "→".bright_blue(), text.bright_blue());
}

pub fn print_warning(text: &str) {
    println!("{} {}", "▸".bright_yellow(), text.yellow());
}

pub fn print_error(text: &str) {
    eprintln!("{} {}", "✗".bright_red(), text.red());
}
