//! Command registry and dispatch

use crate::cli::bind::{bind, Invocation};
use crate::cli::emit::{emit, flag_spec};
use crate::cli::scope::{ClapScope, ParsedValues};
use crate::diag::{print_debug, print_error};
use crate::error::{ConfigError, DispatchError, Result, SigcliError};
use crate::signature::{
    normalize_doc, summary, translate, Descriptor, OverrideRegistry, Param, ParserOptions, Signature,
};
use clap::{ArgMatches, Command};
use std::ffi::OsString;
use std::path::Path;
use std::process;

/// A command handler
pub type Handler = Box<dyn Fn(&Invocation) -> anyhow::Result<()>>;

/// A registered command
struct CommandEntry {
    /// Command-line name (dash-cased identifier)
    name: String,
    descriptors: Vec<Descriptor>,
    /// Parser scope for sub-commands; `None` for the main command
    scope: Option<ClapScope>,
    handler: Handler,
}

/// CLI application built from handler signatures
pub struct App {
    root: ClapScope,
    overrides: OverrideRegistry,
    main: Option<CommandEntry>,
    /// Created when the first sub-command is registered
    subcommands: Option<Vec<CommandEntry>>,
    has_about: bool,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        App {
            root: ClapScope::new(name),
            overrides: OverrideRegistry::new(),
            main: None,
            subcommands: None,
            has_about: false,
        }
    }

    /// Top-level description shown in help
    pub fn about(mut self, about: impl Into<String>) -> Self {
        let about = about.into();
        self.root.configure(|cmd| cmd.about(about));
        self.has_about = true;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.root.set_version(version);
        self
    }

    /// Overrides applied to signatures registered from now on
    pub fn overrides_mut(&mut self) -> &mut OverrideRegistry {
        &mut self.overrides
    }

    /// Override the flags or parser options of one parameter
    ///
    /// `command` is the signature identifier, not its dash-cased name.
    pub fn arg<I, S>(&mut self, command: &str, param: &str, flags: I, options: ParserOptions) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides.register(command, param, flags, options);
        self
    }

    /// Merge overrides from a YAML file
    pub fn load_overrides(&mut self, path: &Path) -> Result<&mut Self> {
        let loaded = OverrideRegistry::from_yaml_file(path)?;
        self.overrides.extend(loaded);
        Ok(self)
    }

    /// Add an argument shared by every command
    ///
    /// The parameter must have a default, so it becomes an optional flag.
    /// Handlers read it through [`Invocation::global`].
    pub fn global_arg(&mut self, param: Param) -> Result<&mut Self> {
        if self.main.is_some() || self.subcommands.is_some() {
            return Err(ConfigError::LateGlobal(param.name).into());
        }
        let sig = Signature::new(self.root.command().get_name().to_string()).param(param);
        let descriptors = translate(&sig, &self.overrides)?;

        let mut root = self.root.clone();
        for d in &descriptors {
            root.add_global(flag_spec(d)?)?;
        }
        self.root = root;
        Ok(self)
    }

    /// Register the handler invoked when no sub-command is given
    pub fn main<F>(&mut self, sig: Signature, handler: F) -> Result<&mut Self>
    where
        F: Fn(&Invocation) -> anyhow::Result<()> + 'static,
    {
        if let Some(existing) = &self.main {
            return Err(ConfigError::DuplicateMain(existing.name.clone()).into());
        }

        let descriptors = translate(&sig, &self.overrides)?;
        let mut root = self.root.clone();
        for d in &descriptors {
            emit(d, &mut root)?;
        }
        if !self.has_about {
            if let Some(doc) = &sig.doc {
                let (about, long_about) = (summary(doc), normalize_doc(doc));
                root.configure(|cmd| cmd.about(about).long_about(long_about));
            }
        }
        self.root = root;

        print_debug(&format!("registered main command '{}'", sig.name));
        self.main = Some(CommandEntry {
            name: sig.command_name(),
            descriptors,
            scope: None,
            handler: Box::new(handler),
        });
        Ok(self)
    }

    /// Register a handler as a sub-command named after its signature
    pub fn subcommand<F>(&mut self, sig: Signature, handler: F) -> Result<&mut Self>
    where
        F: Fn(&Invocation) -> anyhow::Result<()> + 'static,
    {
        let name = sig.command_name();
        if self.find_subcommand(&name).is_some() {
            return Err(ConfigError::DuplicateCommand(name).into());
        }

        let descriptors = translate(&sig, &self.overrides)?;
        let mut scope = self.root.child(name.clone());
        if let Some(doc) = &sig.doc {
            let (about, long_about) = (summary(doc), normalize_doc(doc));
            scope.configure(|cmd| cmd.about(about).long_about(long_about));
        }
        for d in &descriptors {
            emit(d, &mut scope)?;
        }

        print_debug(&format!("registered sub-command '{}'", name));
        self.subcommands.get_or_insert_with(Vec::new).push(CommandEntry {
            name,
            descriptors,
            scope: Some(scope),
            handler: Box::new(handler),
        });
        Ok(self)
    }

    /// Descriptors of a registered command, by command-line name
    pub fn descriptors(&self, name: &str) -> Option<&[Descriptor]> {
        self.main
            .iter()
            .filter(|main| main.name == name)
            .chain(self.find_subcommand(name))
            .map(|entry| entry.descriptors.as_slice())
            .next()
    }

    /// Build the clap command for the registered handlers
    pub fn command(&self) -> Command {
        let mut cmd = self.root.command().clone();

        if let Some(subcommands) = &self.subcommands {
            if self.main.is_some() {
                cmd = cmd.subcommand_negates_reqs(true);
            }
            for entry in subcommands {
                if let Some(scope) = &entry.scope {
                    cmd = cmd.subcommand(scope.command().clone());
                }
            }
        }

        cmd
    }

    /// Parse `args` and run the selected handler
    ///
    /// The first item of `args` is the program name.
    pub fn try_dispatch_from<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args)?;
        let (entry, call) = self.bind_matches(&matches)?;
        (entry.handler)(&call).map_err(SigcliError::Handler)
    }

    /// Parse the process arguments and run the selected handler
    ///
    /// Exits the process on malformed input, when no command is selected,
    /// or when the handler fails.
    pub fn dispatch(&self) {
        match self.try_dispatch_from(std::env::args_os()) {
            Ok(()) => {}
            Err(SigcliError::Usage(e)) => e.exit(),
            Err(SigcliError::Dispatch(DispatchError::NoCommand)) => {
                eprintln!("{}", self.command().render_help());
                process::exit(2);
            }
            Err(e) => {
                print_error(&e.to_string());
                process::exit(e.exit_code());
            }
        }
    }

    /// Work out which command `matches` selects and bind its arguments
    fn bind_matches(&self, matches: &ArgMatches) -> Result<(&CommandEntry, Invocation)> {
        let (entry, values, globals) = match matches.subcommand() {
            Some((name, sub_matches)) => {
                let entry = self
                    .find_subcommand(name)
                    .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;
                let values = match &entry.scope {
                    Some(scope) => scope.collect(sub_matches),
                    None => ParsedValues::new(),
                };
                (entry, values, self.root.collect_globals(sub_matches))
            }
            None => {
                let main = self.main.as_ref().ok_or(DispatchError::NoCommand)?;
                (main, self.root.collect(matches), self.root.collect_globals(matches))
            }
        };

        print_debug(&format!("parsed args for '{}': {:?}", entry.name, values));
        let mut call = bind(&entry.name, &entry.descriptors, &values);
        call.globals = globals;
        Ok((entry, call))
    }

    fn find_subcommand(&self, name: &str) -> Option<&CommandEntry> {
        self.subcommands
            .as_ref()
            .and_then(|entries| entries.iter().find(|e| e.name == name))
    }
}
