//! Call binding
//!
//! Reassembles a flat map of parsed values into the positional arguments,
//! variadic tail, and keyword arguments of a handler call.

use crate::cli::scope::ParsedValues;
use crate::signature::{Descriptor, ParamKind, Value};
use std::collections::BTreeMap;

/// Arguments for one handler call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    /// Name of the command being invoked
    pub command: String,
    pub positional: Vec<Value>,
    pub variadic: Vec<Value>,
    pub keyword: BTreeMap<String, Value>,
    /// Values of arguments shared by every command
    pub globals: ParsedValues,
    /// Parameter names in declaration order, for lookups by name
    names: Vec<(String, Slot)>,
}

/// Where a named parameter landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Positional(usize),
    Variadic,
    Keyword,
}

impl Invocation {
    /// Argument at `index` of the flattened positional call, variadic tail
    /// included
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.positional
            .get(index)
            .or_else(|| self.variadic.get(index.checked_sub(self.positional.len())?))
    }

    /// Every positional argument, followed by the variadic tail
    pub fn args(&self) -> impl Iterator<Item = &Value> {
        self.positional.iter().chain(self.variadic.iter())
    }

    pub fn kwarg(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Look up a parameter by its declared name
    ///
    /// A variadic parameter resolves to its tail as a list.
    pub fn get(&self, name: &str) -> Option<Value> {
        let slot = self
            .names
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, slot)| *slot)?;
        match slot {
            Slot::Positional(i) => self.positional.get(i).cloned(),
            Slot::Variadic => Some(Value::List(self.variadic.clone())),
            Slot::Keyword => self.keyword.get(name).cloned(),
        }
    }

    /// Total number of positional values, variadic tail included
    pub fn arity(&self) -> usize {
        self.positional.len() + self.variadic.len()
    }
}

/// Bind parsed values to a handler's parameters
///
/// Only entries named by `descriptors` are consulted, so a map that also
/// holds values for other commands binds cleanly. Once a keyword-only
/// descriptor is seen, every later descriptor binds by keyword.
pub fn bind(command: &str, descriptors: &[Descriptor], values: &ParsedValues) -> Invocation {
    let mut call = Invocation {
        command: command.to_string(),
        ..Invocation::default()
    };
    let mut keyword_only = false;

    for d in descriptors {
        if d.kind == ParamKind::KeywordOnly {
            keyword_only = true;
        }
        let value = values
            .get(&d.name)
            .cloned()
            .or_else(|| d.default.clone())
            .unwrap_or(Value::None);

        if keyword_only {
            call.keyword.insert(d.name.clone(), value);
            call.names.push((d.name.clone(), Slot::Keyword));
        } else if d.kind == ParamKind::Variadic {
            match value {
                Value::List(items) => call.variadic.extend(items),
                Value::None => {}
                other => call.variadic.push(other),
            }
            call.names.push((d.name.clone(), Slot::Variadic));
        } else {
            call.names
                .push((d.name.clone(), Slot::Positional(call.positional.len())));
            call.positional.push(value);
        }
    }

    call
}
