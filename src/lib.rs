//! sigcli - command-line interfaces from declared function signatures
//!
//! A handler's parameter list is declared once as a [`Signature`]. sigcli
//! turns it into clap arguments (required parameters become positional
//! tokens, defaulted ones become `--flags`, booleans become switches) and
//! binds the parsed values back into a call with the same positional,
//! variadic, and keyword shape.

// Public modules
pub mod cli;
pub mod diag;
pub mod error;
pub mod signature;

// Re-export commonly used types
pub use cli::{App, Invocation};
pub use error::{Result, SigcliError};
pub use signature::{options, Param, Signature, Value, ValueType};

/// Current version of sigcli
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
