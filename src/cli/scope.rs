//! clap-backed parser scopes
//!
//! A [`ClapScope`] owns one `clap::Command` (the top level or a
//! sub-command) plus the flag registrations made against it, so parsed
//! matches can be read back into a flat [`ParsedValues`] map.

use crate::cli::emit::{FlagAction, FlagSink, FlagSpec};
use crate::error::{ConfigError, ConfigResult};
use crate::signature::{Value, ValueType};
use clap::builder::{PossibleValuesParser, TypedValueParser, ValueParser};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::{BTreeMap, HashSet};

/// Flat mapping from destination name to parsed value
pub type ParsedValues = BTreeMap<String, Value>;

/// Spellings clap reserves for itself
const HELP_FLAGS: &[&str] = &["-h", "--help"];
const VERSION_FLAGS: &[&str] = &["-V", "--version"];

/// One parser scope and the flags registered with it
#[derive(Debug, Clone)]
pub struct ClapScope {
    command: Command,
    specs: Vec<FlagSpec>,
    spellings: HashSet<String>,
    versioned: bool,
    globals: HashSet<String>,
    /// Destinations of shared flags inherited from a parent scope
    inherited: HashSet<String>,
}

impl ClapScope {
    pub fn new(name: impl Into<String>) -> Self {
        ClapScope {
            command: Command::new(name.into()),
            specs: Vec::new(),
            spellings: HashSet::new(),
            versioned: false,
            globals: HashSet::new(),
            inherited: HashSet::new(),
        }
    }

    /// A sub-command scope that sees this scope's shared flags
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut child = ClapScope::new(name);
        for spec in self.specs.iter().filter(|s| self.globals.contains(s.destination())) {
            child.spellings.extend(spec.names.iter().cloned());
            child.inherited.insert(spec.destination().to_string());
        }
        child.inherited.extend(self.inherited.iter().cloned());
        child
    }

    /// Apply a change to the underlying clap command
    pub fn configure(&mut self, f: impl FnOnce(Command) -> Command) {
        let command = std::mem::replace(&mut self.command, Command::new(""));
        self.command = f(command);
    }

    /// Set the version, which reserves `-V`/`--version`
    pub fn set_version(&mut self, version: impl Into<String>) {
        let version = version.into();
        self.versioned = true;
        self.configure(|cmd| cmd.version(version));
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn specs(&self) -> &[FlagSpec] {
        &self.specs
    }

    /// Read every registered flag out of parsed matches
    ///
    /// Flags absent from the command line take their default.
    pub fn collect(&self, matches: &ArgMatches) -> ParsedValues {
        self.specs
            .iter()
            .map(|spec| (spec.destination().to_string(), read_value(spec, matches)))
            .collect()
    }

    /// Read only the flags shared with sub-commands
    pub fn collect_globals(&self, matches: &ArgMatches) -> ParsedValues {
        self.specs
            .iter()
            .filter(|spec| self.globals.contains(spec.destination()))
            .map(|spec| (spec.destination().to_string(), read_value(spec, matches)))
            .collect()
    }

    /// Register a flag shared with every sub-command
    ///
    /// Shared flags must be optional named flags.
    pub fn add_global(&mut self, spec: FlagSpec) -> ConfigResult<()> {
        if spec.is_positional() || spec.required {
            return Err(ConfigError::InvalidFlag {
                param: spec.destination().to_string(),
                flag: spec.names[0].clone(),
                reason: "global arguments must be optional flags".to_string(),
            });
        }
        let dest = spec.destination().to_string();
        self.register(spec, true)?;
        self.globals.insert(dest);
        Ok(())
    }

    fn register(&mut self, spec: FlagSpec, global: bool) -> ConfigResult<()> {
        let dest = spec.destination().to_string();
        if self.inherited.contains(&dest) || self.specs.iter().any(|s| s.destination() == dest) {
            return Err(ConfigError::DuplicateDestination(dest));
        }
        if let Some(variadic) = self.specs.iter().find(|s| s.zero_or_more) {
            if spec.is_positional() {
                return Err(ConfigError::PositionalAfterVariadic {
                    variadic: variadic.destination().to_string(),
                    after: dest,
                });
            }
        }
        for name in &spec.names {
            self.check_spelling(name)?;
        }

        let arg = build_arg(&spec)?.global(global);
        self.configure(|cmd| cmd.arg(arg));
        self.spellings.extend(spec.names.iter().cloned());
        self.specs.push(spec);
        Ok(())
    }

    fn check_spelling(&self, name: &str) -> ConfigResult<()> {
        if HELP_FLAGS.contains(&name) || (self.versioned && VERSION_FLAGS.contains(&name)) {
            return Err(ConfigError::ReservedFlag(name.to_string()));
        }
        if self.spellings.contains(name) {
            return Err(ConfigError::DuplicateFlag(name.to_string()));
        }
        Ok(())
    }
}

impl FlagSink for ClapScope {
    fn add_flag(&mut self, spec: FlagSpec) -> ConfigResult<()> {
        self.register(spec, false)
    }
}

/// Build the clap argument for one registration
fn build_arg(spec: &FlagSpec) -> ConfigResult<Arg> {
    let dest = spec.destination().to_string();
    let mut arg = Arg::new(dest.clone())
        .help(spec.help.clone())
        .hide(spec.hidden)
        .required(spec.required);

    if !spec.is_positional() {
        arg = add_spellings(arg, &dest, &spec.names)?;
    }

    arg = match spec.action {
        FlagAction::StoreTrue => arg.action(ArgAction::SetTrue),
        FlagAction::StoreFalse => arg.action(ArgAction::SetFalse),
        FlagAction::Count => arg.action(ArgAction::Count),
        FlagAction::Store => arg
            .action(ArgAction::Set)
            .value_parser(value_parser(spec.ty.clone(), &spec.choices)),
        FlagAction::Append => arg
            .action(ArgAction::Append)
            .value_parser(value_parser(spec.ty.clone(), &spec.choices)),
        FlagAction::Remaining => arg
            .action(ArgAction::Append)
            .num_args(0..)
            .value_parser(value_parser(spec.ty.clone(), &spec.choices)),
    };

    if !spec.action.is_switch() && spec.action != FlagAction::Count {
        let value_name = spec
            .metavar
            .clone()
            .unwrap_or_else(|| dest.to_uppercase());
        arg = arg.value_name(value_name);
    }

    Ok(arg)
}

/// Attach long and short spellings; the first of each kind is primary
fn add_spellings(mut arg: Arg, dest: &str, names: &[String]) -> ConfigResult<Arg> {
    let mut has_long = false;
    let mut has_short = false;

    for name in names {
        if let Some(long) = name.strip_prefix("--") {
            arg = if has_long {
                arg.visible_alias(long.to_string())
            } else {
                arg.long(long.to_string())
            };
            has_long = true;
        } else if let Some(c) = name.strip_prefix('-').and_then(single_char) {
            arg = if has_short {
                arg.visible_short_alias(c)
            } else {
                arg.short(c)
            };
            has_short = true;
        } else {
            return Err(ConfigError::InvalidFlag {
                param: dest.to_string(),
                flag: name.clone(),
                reason: "expected '--long' or '-x'".to_string(),
            });
        }
    }

    Ok(arg)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Value parser that coerces tokens into [`Value`]s
fn value_parser(ty: Option<ValueType>, choices: &[String]) -> ValueParser {
    let ty = ty.unwrap_or(ValueType::Str);
    if choices.is_empty() {
        ValueParser::new(move |raw: &str| ty.coerce(raw))
    } else {
        ValueParser::new(
            PossibleValuesParser::new(choices.to_vec()).try_map(move |raw: String| ty.coerce(&raw)),
        )
    }
}

/// Parsed value for one flag, or its absent value
fn read_value(spec: &FlagSpec, matches: &ArgMatches) -> Value {
    let dest = spec.destination();
    let supplied = matches!(
        matches.value_source(dest),
        Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
    );
    if !supplied {
        return spec.absent_value();
    }

    match spec.action {
        FlagAction::StoreTrue | FlagAction::StoreFalse => Value::Bool(matches.get_flag(dest)),
        FlagAction::Count => Value::Int(i64::from(matches.get_count(dest))),
        FlagAction::Store => matches
            .get_one::<Value>(dest)
            .cloned()
            .unwrap_or(Value::None),
        FlagAction::Append | FlagAction::Remaining => Value::List(
            matches
                .get_many::<Value>(dest)
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        ),
    }
}
