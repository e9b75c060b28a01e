//! Error types for sigcli

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sigcli operations
pub type Result<T> = std::result::Result<T, SigcliError>;

/// Main error type for sigcli
#[derive(Error, Debug)]
pub enum SigcliError {
    /// Registration-time configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors selecting or invoking a command
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Malformed command-line input, as reported by clap
    #[error("{0}")]
    Usage(#[from] clap::Error),

    /// The selected handler returned an error
    #[error("{0}")]
    Handler(anyhow::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while translating signatures or emitting flags
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Override for '{param}' sets forbidden parser option '{key}'")]
    ForbiddenOption { param: String, key: String },

    #[error("Override for '{param}' sets unknown parser option '{key}'")]
    UnknownOption { param: String, key: String },

    #[error("Parser option '{key}' for '{param}' has an invalid value: {reason}")]
    InvalidOptionValue {
        param: String,
        key: String,
        reason: String,
    },

    #[error("Flag '{flag}' for '{param}' is not a valid spelling: {reason}")]
    InvalidFlag {
        param: String,
        flag: String,
        reason: String,
    },

    #[error("Flag '{0}' is reserved")]
    ReservedFlag(String),

    #[error("Flag '{0}' is registered more than once")]
    DuplicateFlag(String),

    #[error("Destination '{0}' is registered more than once")]
    DuplicateDestination(String),

    #[error("Parameter '{0}' is declared more than once")]
    DuplicateParameter(String),

    #[error("Variadic '{variadic}' must be the last positional, but '{after}' follows it")]
    PositionalAfterVariadic { variadic: String, after: String },

    #[error("Command '{0}' is registered more than once")]
    DuplicateCommand(String),

    #[error("Global argument '{0}' must be added before any command is registered")]
    LateGlobal(String),

    #[error("A main command is already registered ('{0}')")]
    DuplicateMain(String),

    #[error("Failed to load overrides from '{path}': {error}")]
    OverrideFile { path: PathBuf, error: String },
}

/// Errors selecting a command at dispatch time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No command selected")]
    NoCommand,

    #[error("Command '{0}' is not registered")]
    UnknownCommand(String),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl SigcliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SigcliError::Usage(e) => e.exit_code(),
            SigcliError::Dispatch(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps() {
        let err: SigcliError = ConfigError::DuplicateCommand("push".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Command 'push' is registered more than once"
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_dispatch_exit_code() {
        let err: SigcliError = DispatchError::NoCommand.into();
        assert_eq!(err.exit_code(), 2);
    }
}
