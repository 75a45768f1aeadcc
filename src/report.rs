//! Human-readable failure reports
//!
//! ```text
//! Invalid environment variables:
//!
//! SERVER variables:
//!  - DATABASE_URL (required)
//!
//! CLIENT variables:
//!  - NEXT_PUBLIC_API_URL (invalid url: relative URL without a base)
//! ```

use crate::issue::{ErrorReport, Issue};
use crossterm::style::Stylize;
use serde::Deserialize;
use std::io::{IsTerminal, Write};
use std::str::FromStr;
use tracing::warn;

const HEADER: &str = "Invalid environment variables:";

/// When to style report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Style only when stderr is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled_for_stderr(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
            }
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(format!(
                "unknown color mode '{}', expected auto, always or never",
                other
            )),
        }
    }
}

/// Visual role of a piece of report text
#[derive(Debug, Clone, Copy)]
enum Role {
    Header,
    Partition,
    Field,
    Message,
}

fn paint(text: &str, role: Role, styled: bool) -> String {
    if !styled {
        return text.to_string();
    }
    match role {
        Role::Header => text.red().to_string(),
        Role::Partition => text.yellow().to_string(),
        Role::Field => text.bold().to_string(),
        Role::Message => text.dim().to_string(),
    }
}

fn push_issues(out: &mut String, issues: &[Issue], styled: bool) {
    for issue in issues {
        out.push_str(" - ");
        out.push_str(&paint(&issue.field_name(), Role::Field, styled));
        out.push(' ');
        out.push_str(&paint(&format!("({})", issue.message), Role::Message, styled));
        out.push('\n');
    }
}

/// Format a report. One line per issue, grouped by partition for split reports.
pub fn render(report: &ErrorReport, styled: bool) -> String {
    let mut out = paint(HEADER, Role::Header, styled);
    out.push('\n');

    match report {
        ErrorReport::Unified(issues) => push_issues(&mut out, issues, styled),
        ErrorReport::Split(groups) => {
            for group in groups {
                let title = format!("{} variables:", group.partition.as_str().to_uppercase());
                out.push('\n');
                out.push_str(&paint(&title, Role::Partition, styled));
                out.push('\n');
                push_issues(&mut out, &group.issues, styled);
            }
        }
    }

    out
}

/// Write a report to `out`.
///
/// Reporting never fails the caller; a broken stream is only logged.
pub fn emit(report: &ErrorReport, styled: bool, out: &mut dyn Write) {
    let text = render(report, styled);
    if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
        warn!(error = %e, "Failed to write environment report");
    }
}
