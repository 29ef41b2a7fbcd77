//! Colored terminal output.
//!
//! Status lines go to stderr so chat replies on stdout stay clean. Colors are
//! dropped for `NO_COLOR`, `TERM=dumb` or a non-terminal stderr.

use owo_colors::OwoColorize;
use std::env;

/// How much the CLI prints besides errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    Normal,
    /// Only errors and hints
    Quiet,
    /// Normal output plus debug logs
    Verbose,
}

impl OutputLevel {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    pub fn show_user(&self) -> bool {
        matches!(self, Self::Normal | Self::Verbose)
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

pub(crate) fn colors_disabled() -> bool {
    env::var("NO_COLOR").is_ok()
        || env::var("TERM").is_ok_and(|t| t == "dumb")
        || !atty::is(atty::Stream::Stderr)
}

fn print_styled<T>(plain: &str, styled: T, output_level: OutputLevel, always_show: bool)
where
    T: std::fmt::Display,
{
    if !always_show && !output_level.show_user() {
        return;
    }
    if colors_disabled() {
        eprintln!("{plain}");
    } else {
        eprintln!("{styled}");
    }
}

fn print_prefixed<P, M>(prefix: &str, msg: &str, styled_prefix: P, styled_msg: M)
where
    P: std::fmt::Display,
    M: std::fmt::Display,
{
    if colors_disabled() {
        eprintln!("{prefix} {msg}");
    } else {
        eprintln!("{styled_prefix} {styled_msg}");
    }
}

pub fn heading(msg: &str, output_level: OutputLevel) {
    print_styled(msg, msg.bold(), output_level, false);
}

/// Plain line, hidden in quiet mode
pub fn note(msg: &str, output_level: OutputLevel) {
    if output_level.show_user() {
        eprintln!("{msg}");
    }
}

pub fn success(msg: &str, output_level: OutputLevel) {
    print_styled(msg, msg.green(), output_level, false);
}

pub fn warning(msg: &str, output_level: OutputLevel) {
    if output_level.show_user() {
        print_prefixed("Warning:", msg, "Warning:".yellow().bold(), msg.yellow());
    }
}

/// Always shown, even in quiet mode
pub fn error(msg: &str, _output_level: OutputLevel) {
    print_prefixed("Error:", msg, "Error:".red().bold(), msg.red());
}

/// Always shown, even in quiet mode
pub fn hint(msg: &str, _output_level: OutputLevel) {
    print_prefixed("Hint:", msg, "Hint:".blue().bold(), msg.blue());
}

pub fn format_provider(provider: &str) -> String {
    if colors_disabled() {
        provider.to_string()
    } else {
        provider.magenta().bold().to_string()
    }
}

pub fn format_model(model: &str) -> String {
    if colors_disabled() {
        model.to_string()
    } else {
        model.cyan().to_string()
    }
}

pub fn format_command(cmd: &str) -> String {
    if colors_disabled() {
        format!("`{cmd}`")
    } else {
        format!("`{}`", cmd.yellow().bold())
    }
}
