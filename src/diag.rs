//! Diagnostic output
//!
//! Descriptor and flag construction can be traced on stderr. Tracing is
//! off unless `SIGCLI_DEBUG` is set when the first message is printed.

use colored::Colorize;
use std::env;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

/// Environment variable that turns on debug diagnostics
pub const DEBUG_ENV: &str = "SIGCLI_DEBUG";

/// Verbosity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Normal = 1,
    Verbose = 2,
}

impl Verbosity {
    fn from_u8(level: u8) -> Self {
        match level {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            _ => Verbosity::Verbose,
        }
    }
}

const UNSET: u8 = u8::MAX;

static OVERRIDE: AtomicU8 = AtomicU8::new(UNSET);
static FROM_ENV: OnceLock<Verbosity> = OnceLock::new();

/// Parse the value of [`DEBUG_ENV`]
fn parse_toggle(value: Option<&str>) -> Verbosity {
    match value.map(str::trim) {
        None | Some("") | Some("0") => Verbosity::Normal,
        Some(v) if v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("off") => {
            Verbosity::Normal
        }
        Some(_) => Verbosity::Verbose,
    }
}

/// Current verbosity level
pub fn verbosity() -> Verbosity {
    match OVERRIDE.load(Ordering::Relaxed) {
        UNSET => *FROM_ENV.get_or_init(|| parse_toggle(env::var(DEBUG_ENV).ok().as_deref())),
        level => Verbosity::from_u8(level),
    }
}

/// Force a verbosity level, ignoring the environment
pub fn set_verbosity(level: Verbosity) {
    OVERRIDE.store(level as u8, Ordering::Relaxed);
}

/// Print debug message (only in verbose mode)
pub fn print_debug(message: &str) {
    if verbosity() >= Verbosity::Verbose {
        eprintln!("{} {}", "[DEBUG]".dimmed(), message);
    }
}

/// Print warning message
pub fn print_warning(message: &str) {
    if verbosity() >= Verbosity::Normal {
        eprintln!("{} {}", "[WARN]".yellow(), message);
    }
}

/// Print error message
pub fn print_error(message: &str) {
    if verbosity() >= Verbosity::Quiet {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}
