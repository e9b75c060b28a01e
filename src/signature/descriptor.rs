//! Signature declarations and parameter descriptors
//!
//! A [`Signature`] is the declared parameter list of a command handler.
//! The translator turns it into one [`Descriptor`] per projected parameter.

use crate::signature::overrides::ParserOptions;
use crate::signature::value::{Value, ValueType};

/// How a parameter is declared in a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// Positional-or-keyword parameter
    Positional,
    /// Collects trailing positional values
    VarPositional,
    /// Must be supplied by name
    KeywordOnly,
    /// Collects arbitrary keywords; never projected onto flags
    VarKeyword,
}

/// A declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: DeclKind,
    /// Declared coercion type, if any
    pub ty: Option<ValueType>,
    /// Declared default, or `None` when the parameter has no default
    pub default: Option<Value>,
    /// Inline flag spellings, kept separate from the coercion type
    pub flags: Vec<String>,
    /// Inline help text
    pub help: Option<String>,
}

impl Param {
    fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Param {
            name: name.into(),
            kind,
            ty: None,
            default: None,
            flags: Vec::new(),
            help: None,
        }
    }

    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Positional)
    }

    pub fn variadic(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::VarPositional)
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::KeywordOnly)
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::VarKeyword)
    }

    pub fn ty(mut self, ty: ValueType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// The declared signature of a command handler
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub name: String,
    pub doc: Option<String>,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Signature {
            name: name.into(),
            doc: None,
            params: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Name of the sub-command this signature registers as
    pub fn command_name(&self) -> String {
        dash_case(&self.name)
    }
}

/// Classification of a projected parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    PositionalRequired,
    PositionalWithDefault,
    Variadic,
    KeywordOnly,
}

/// Normalized representation of one parameter on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub name: String,
    pub kind: ParamKind,
    /// Coercion applied to raw tokens; `None` leaves them as strings
    pub ty: Option<ValueType>,
    /// Declared default; `None` is the "no default" sentinel
    pub default: Option<Value>,
    /// External spellings; the first is canonical
    pub flag_names: Vec<String>,
    pub help: String,
    pub parser_overrides: ParserOptions,
}

impl Descriptor {
    /// Whether this parameter is a presence switch
    ///
    /// Bare positionals always take a token, even when typed `bool`.
    pub fn is_switch(&self) -> bool {
        if self.is_positional() {
            return false;
        }
        self.ty.as_ref().is_some_and(ValueType::is_bool)
            || matches!(self.default, Some(Value::Bool(_)))
    }

    /// Whether this parameter is a bare positional token
    pub fn is_positional(&self) -> bool {
        matches!(self.kind, ParamKind::PositionalRequired | ParamKind::Variadic)
    }

    pub fn canonical_flag(&self) -> &str {
        &self.flag_names[0]
    }

    /// Help text with the default annotation appended
    pub fn rendered_help(&self) -> String {
        let mut out = self.help.clone();
        if let Some(default) = &self.default {
            if !out.is_empty() {
                out.push_str(". ");
            }
            out.push_str(&format!("default: {}", default));
        }
        out
    }
}

/// Render an identifier with underscores as dashes
pub fn dash_case(name: &str) -> String {
    name.replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(kind: ParamKind, ty: Option<ValueType>, default: Option<Value>) -> Descriptor {
        Descriptor {
            name: "x".to_string(),
            kind,
            ty,
            default,
            flag_names: vec!["--x".to_string()],
            help: String::new(),
            parser_overrides: ParserOptions::default(),
        }
    }

    #[test]
    fn test_command_name_is_dash_cased() {
        assert_eq!(Signature::new("sum_many").command_name(), "sum-many");
    }

    #[test]
    fn test_switch_detection() {
        assert!(descriptor(ParamKind::PositionalWithDefault, Some(ValueType::Bool), None).is_switch());
        assert!(descriptor(ParamKind::KeywordOnly, None, Some(Value::Bool(true))).is_switch());
        assert!(!descriptor(ParamKind::PositionalWithDefault, None, Some(Value::None)).is_switch());
        assert!(!descriptor(ParamKind::PositionalRequired, Some(ValueType::Bool), None).is_switch());
        assert!(!descriptor(ParamKind::Variadic, Some(ValueType::Bool), None).is_switch());
    }

    #[test]
    fn test_rendered_help() {
        let mut d = descriptor(ParamKind::PositionalWithDefault, None, Some(Value::from("sup")));
        assert_eq!(d.rendered_help(), "default: sup");
        d.help = "Greeting to use".to_string();
        assert_eq!(d.rendered_help(), "Greeting to use. default: sup");
        d.default = None;
        assert_eq!(d.rendered_help(), "Greeting to use");
    }
}
