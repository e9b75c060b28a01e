//! Caller-supplied refinements of generated flags
//!
//! Overrides are keyed by command identifier and parameter name. Nothing is
//! validated on registration; bad entries surface when the translator or
//! flag emitter consumes them.

use crate::error::{ConfigError, ConfigResult, Result};
use crate::signature::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Extra parser options keyed by option name
pub type ParserOptions = BTreeMap<String, Value>;

/// Options owned by the translator; an override may never set them
pub const FORBIDDEN_OPTIONS: &[&str] = &["dest", "nargs"];

/// Option keys the flag emitter understands
pub const KNOWN_OPTIONS: &[&str] = &["help", "required", "metavar", "hidden", "choices", "action"];

/// One parameter's override
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Override {
    /// Flag spellings that replace the generated ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,

    /// Extra parser options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: ParserOptions,
}

impl Override {
    /// Explicit help text carried in the options
    pub fn help(&self) -> Option<String> {
        self.options.get("help").map(|v| v.to_string())
    }
}

/// Overrides for every command, keyed by command identifier
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct OverrideRegistry {
    entries: HashMap<String, HashMap<String, Override>>,
}

impl OverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the override for one parameter of a command
    pub fn register<I, S>(&mut self, command: &str, param: &str, flags: I, options: ParserOptions)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.entry(command.to_string()).or_default().insert(
            param.to_string(),
            Override {
                flags: flags.into_iter().map(Into::into).collect(),
                options,
            },
        );
    }

    /// Look up the override for one parameter
    pub fn get(&self, command: &str, param: &str) -> Option<&Override> {
        self.entries.get(command).and_then(|params| params.get(param))
    }

    /// All overrides registered for a command
    pub fn for_command(&self, command: &str) -> Option<&HashMap<String, Override>> {
        self.entries.get(command)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another registry into this one; entries in `other` win
    pub fn extend(&mut self, other: OverrideRegistry) {
        for (command, params) in other.entries {
            self.entries.entry(command).or_default().extend(params);
        }
    }

    /// Parse overrides from YAML
    ///
    /// ```yaml
    /// commit:
    ///   all:
    ///     flags: ["-a"]
    ///   message:
    ///     flags: ["-m"]
    ///     options:
    ///       help: Commit message
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load overrides from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::OverrideFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let registry = serde_yaml::from_str(&contents).map_err(|e| ConfigError::OverrideFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(registry)
    }
}

/// Reject options the translator owns, and keys the emitter does not know
pub fn check_options(param: &str, options: &ParserOptions) -> ConfigResult<()> {
    for key in options.keys() {
        if FORBIDDEN_OPTIONS.contains(&key.as_str()) {
            return Err(ConfigError::ForbiddenOption {
                param: param.to_string(),
                key: key.clone(),
            });
        }
        if !KNOWN_OPTIONS.contains(&key.as_str()) {
            return Err(ConfigError::UnknownOption {
                param: param.to_string(),
                key: key.clone(),
            });
        }
    }
    Ok(())
}

/// Build a [`ParserOptions`] map from key/value pairs
pub fn options<I, K, V>(pairs: I) -> ParserOptions
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
