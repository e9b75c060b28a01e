//! Flag emission
//!
//! Turns one [`Descriptor`] into a [`FlagSpec`] and registers it with a
//! parser scope through the [`FlagSink`] trait.

use crate::diag::print_debug;
use crate::error::{ConfigError, ConfigResult};
use crate::signature::{check_options, Descriptor, ParamKind, Value, ValueType};

/// What the parser does when it sees a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagAction {
    /// Capture one value
    Store,
    /// Presence sets `true`
    StoreTrue,
    /// Presence sets `false`
    StoreFalse,
    /// Capture a value each time the flag appears
    Append,
    /// Count occurrences
    Count,
    /// Collect the remaining positional tokens
    Remaining,
}

impl FlagAction {
    pub fn is_switch(self) -> bool {
        matches!(self, FlagAction::StoreTrue | FlagAction::StoreFalse)
    }
}

/// One flag registration, as handed to a parser scope
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    pub names: Vec<String>,
    /// Explicit destination; `None` means derived from the bare name
    pub dest: Option<String>,
    /// Coercion; omitted for switches and typeless variadics
    pub ty: Option<ValueType>,
    pub default: Option<Value>,
    pub action: FlagAction,
    /// Accept zero or more tokens
    pub zero_or_more: bool,
    pub help: String,
    pub required: bool,
    pub metavar: Option<String>,
    pub hidden: bool,
    pub choices: Vec<String>,
}

impl FlagSpec {
    /// Name under which the parsed value is stored
    pub fn destination(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.names[0])
    }

    /// Whether this flag is a bare positional token
    pub fn is_positional(&self) -> bool {
        !self.names[0].starts_with('-')
    }

    /// Value stored when the flag is absent from the command line
    pub fn absent_value(&self) -> Value {
        match (self.action, &self.default) {
            (_, Some(default)) => default.clone(),
            (FlagAction::StoreTrue, None) => Value::Bool(false),
            (FlagAction::StoreFalse, None) => Value::Bool(true),
            (FlagAction::Count, None) => Value::Int(0),
            (FlagAction::Append | FlagAction::Remaining, None) => Value::List(Vec::new()),
            (FlagAction::Store, None) => Value::None,
        }
    }
}

/// A parser scope flags can be registered with
pub trait FlagSink {
    fn add_flag(&mut self, spec: FlagSpec) -> ConfigResult<()>;
}

/// Build the registration for one descriptor
pub fn flag_spec(d: &Descriptor) -> ConfigResult<FlagSpec> {
    check_options(&d.name, &d.parser_overrides)?;

    let mut action = match d.kind {
        ParamKind::Variadic => FlagAction::Remaining,
        _ if d.is_switch() => switch_action(&d.default),
        _ => FlagAction::Store,
    };
    if let Some(value) = d.parser_overrides.get("action") {
        action = parse_action(&d.name, value)?;
        if d.kind == ParamKind::Variadic {
            return Err(invalid(&d.name, "action", "variadic parameters collect every remaining token"));
        }
        if d.is_positional() && (action.is_switch() || action == FlagAction::Count) {
            return Err(invalid(&d.name, "action", "positional parameters must take a value"));
        }
    }

    let ty = if action.is_switch() || action == FlagAction::Count {
        None
    } else {
        d.ty.clone()
    };

    let default = match action {
        FlagAction::Remaining => None,
        FlagAction::StoreTrue | FlagAction::StoreFalse => match &d.default {
            Some(Value::Bool(b)) => Some(Value::Bool(*b)),
            _ => Some(Value::Bool(action == FlagAction::StoreFalse)),
        },
        _ => d.default.clone(),
    };

    let dest = match d.kind {
        ParamKind::PositionalRequired => None,
        _ => Some(d.name.clone()),
    };

    let required = match d.parser_overrides.get("required") {
        Some(value) => bool_option(&d.name, "required", value)?,
        None => match d.kind {
            ParamKind::PositionalRequired => true,
            ParamKind::KeywordOnly => d.default.is_none() && !action.is_switch(),
            _ => false,
        },
    };

    Ok(FlagSpec {
        names: d.flag_names.clone(),
        dest,
        ty,
        default,
        action,
        zero_or_more: d.kind == ParamKind::Variadic,
        help: d.rendered_help(),
        required,
        metavar: d
            .parser_overrides
            .get("metavar")
            .map(|v| string_option(&d.name, "metavar", v))
            .transpose()?,
        hidden: d
            .parser_overrides
            .get("hidden")
            .map(|v| bool_option(&d.name, "hidden", v))
            .transpose()?
            .unwrap_or(false),
        choices: d
            .parser_overrides
            .get("choices")
            .map(|v| list_option(&d.name, "choices", v))
            .transpose()?
            .unwrap_or_default(),
    })
}

/// Register one descriptor with a parser scope
///
/// Nothing reaches the sink when the descriptor's overrides are invalid.
pub fn emit(d: &Descriptor, sink: &mut dyn FlagSink) -> ConfigResult<()> {
    let spec = flag_spec(d)?;
    print_debug(&format!(
        "adding flag {:?} dest={} action={:?} type={:?} default={:?}",
        spec.names,
        spec.destination(),
        spec.action,
        spec.ty,
        spec.default
    ));
    sink.add_flag(spec)
}

fn switch_action(default: &Option<Value>) -> FlagAction {
    match default {
        Some(Value::Bool(true)) => FlagAction::StoreFalse,
        _ => FlagAction::StoreTrue,
    }
}

fn invalid(param: &str, key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidOptionValue {
        param: param.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_action(param: &str, value: &Value) -> ConfigResult<FlagAction> {
    match value.as_str() {
        Some("store") => Ok(FlagAction::Store),
        Some("store_true") => Ok(FlagAction::StoreTrue),
        Some("store_false") => Ok(FlagAction::StoreFalse),
        Some("append") => Ok(FlagAction::Append),
        Some("count") => Ok(FlagAction::Count),
        _ => Err(invalid(
            param,
            "action",
            "expected one of store, store_true, store_false, append, count",
        )),
    }
}

fn bool_option(param: &str, key: &str, value: &Value) -> ConfigResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| invalid(param, key, "expected a boolean"))
}

fn string_option(param: &str, key: &str, value: &Value) -> ConfigResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(param, key, "expected a string"))
}

fn list_option(param: &str, key: &str, value: &Value) -> ConfigResult<Vec<String>> {
    match value {
        Value::List(items) => Ok(items.iter().map(|v| v.to_string()).collect()),
        _ => Err(invalid(param, key, "expected a list")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{options, translate, OverrideRegistry, Param, Signature};

    #[derive(Default)]
    struct Recorder {
        specs: Vec<FlagSpec>,
    }

    impl FlagSink for Recorder {
        fn add_flag(&mut self, spec: FlagSpec) -> ConfigResult<()> {
            self.specs.push(spec);
            Ok(())
        }
    }

    fn descriptors(sig: Signature, reg: &OverrideRegistry) -> Vec<Descriptor> {
        translate(&sig, reg).unwrap()
    }

    #[test]
    fn test_required_positional_has_implicit_dest() {
        let ds = descriptors(Signature::new("clone").param(Param::positional("url")), &OverrideRegistry::new());
        let spec = flag_spec(&ds[0]).unwrap();
        assert_eq!(spec.names, vec!["url"]);
        assert_eq!(spec.dest, None);
        assert_eq!(spec.destination(), "url");
        assert!(spec.is_positional());
        assert!(spec.required);
        assert_eq!(spec.action, FlagAction::Store);
    }

    #[test]
    fn test_optional_flag_binds_to_underscore_name() {
        let ds = descriptors(
            Signature::new("f").param(Param::positional("num_times").default(1i64)),
            &OverrideRegistry::new(),
        );
        let spec = flag_spec(&ds[0]).unwrap();
        assert_eq!(spec.names, vec!["--num-times"]);
        assert_eq!(spec.destination(), "num_times");
        assert_eq!(spec.ty, Some(ValueType::Int));
        assert_eq!(spec.help, "default: 1");
    }

    #[test]
    fn test_switches_drop_type() {
        let ds = descriptors(
            Signature::new("f")
                .param(Param::positional("force").default(false))
                .param(Param::positional("color").default(true))
                .param(Param::positional("dry").ty(ValueType::Bool).default(Value::None)),
            &OverrideRegistry::new(),
        );
        let specs: Vec<FlagSpec> = ds.iter().map(|d| flag_spec(d).unwrap()).collect();

        assert_eq!(specs[0].action, FlagAction::StoreTrue);
        assert_eq!(specs[0].default, Some(Value::Bool(false)));
        assert_eq!(specs[1].action, FlagAction::StoreFalse);
        assert_eq!(specs[1].default, Some(Value::Bool(true)));
        assert_eq!(specs[2].action, FlagAction::StoreTrue);
        assert_eq!(specs[2].default, Some(Value::Bool(false)));
        assert!(specs.iter().all(|s| s.ty.is_none()));
    }

    #[test]
    fn test_variadic_collects_remaining() {
        let ds = descriptors(Signature::new("add").param(Param::variadic("files")), &OverrideRegistry::new());
        let spec = flag_spec(&ds[0]).unwrap();
        assert_eq!(spec.action, FlagAction::Remaining);
        assert!(spec.zero_or_more);
        assert_eq!(spec.dest, Some("files".to_string()));
        assert_eq!(spec.ty, None);
        assert_eq!(spec.default, None);
        assert_eq!(spec.absent_value(), Value::List(vec![]));
    }

    #[test]
    fn test_keyword_only_without_default_is_required() {
        let ds = descriptors(
            Signature::new("f")
                .param(Param::keyword_only("token"))
                .param(Param::keyword_only("level").default(2i64)),
            &OverrideRegistry::new(),
        );
        assert!(flag_spec(&ds[0]).unwrap().required);
        assert!(!flag_spec(&ds[1]).unwrap().required);
    }

    #[test]
    fn test_override_options_applied() {
        let mut reg = OverrideRegistry::new();
        reg.register(
            "f",
            "level",
            ["-l"],
            options([
                ("metavar", Value::from("LEVEL")),
                ("choices", Value::from(vec!["1", "2"])),
                ("hidden", Value::Bool(true)),
            ]),
        );
        let ds = descriptors(Signature::new("f").param(Param::positional("level").default("1")), &reg);
        let spec = flag_spec(&ds[0]).unwrap();
        assert_eq!(spec.metavar, Some("LEVEL".to_string()));
        assert_eq!(spec.choices, vec!["1", "2"]);
        assert!(spec.hidden);
    }

    #[test]
    fn test_action_override() {
        let mut reg = OverrideRegistry::new();
        reg.register("f", "verbose", ["-v"], options([("action", "count")]));
        let ds = descriptors(Signature::new("f").param(Param::positional("verbose").default(0i64)), &reg);
        let spec = flag_spec(&ds[0]).unwrap();
        assert_eq!(spec.action, FlagAction::Count);
        assert_eq!(spec.ty, None);
    }

    #[test]
    fn test_bool_positional_takes_a_value() {
        let ds = descriptors(
            Signature::new("f").param(Param::positional("x").ty(ValueType::Bool)),
            &OverrideRegistry::new(),
        );
        let spec = flag_spec(&ds[0]).unwrap();
        assert_eq!(spec.action, FlagAction::Store);
        assert_eq!(spec.ty, Some(ValueType::Bool));
        assert!(spec.required);
    }

    #[test]
    fn test_switch_action_rejected_on_positional() {
        for action in ["store_true", "store_false", "count"] {
            let mut reg = OverrideRegistry::new();
            reg.register("f", "x", Vec::<String>::new(), options([("action", action)]));
            let ds = descriptors(Signature::new("f").param(Param::positional("x")), &reg);
            assert!(matches!(
                flag_spec(&ds[0]),
                Err(ConfigError::InvalidOptionValue { ref key, .. }) if key == "action"
            ));
        }

        let mut reg = OverrideRegistry::new();
        reg.register("add", "files", Vec::<String>::new(), options([("action", "append")]));
        let ds = descriptors(Signature::new("add").param(Param::variadic("files")), &reg);
        assert!(matches!(flag_spec(&ds[0]), Err(ConfigError::InvalidOptionValue { .. })));
    }

    #[test]
    fn test_forbidden_option_emits_nothing() {
        let d = Descriptor {
            name: "x".to_string(),
            kind: ParamKind::PositionalWithDefault,
            ty: None,
            default: Some(Value::None),
            flag_names: vec!["--x".to_string()],
            help: String::new(),
            parser_overrides: options([("nargs", "+")]),
        };
        let mut sink = Recorder::default();
        assert_eq!(
            emit(&d, &mut sink),
            Err(ConfigError::ForbiddenOption {
                param: "x".to_string(),
                key: "nargs".to_string()
            })
        );
        assert!(sink.specs.is_empty());
    }

    #[test]
    fn test_invalid_option_value() {
        let d = Descriptor {
            name: "x".to_string(),
            kind: ParamKind::PositionalWithDefault,
            ty: None,
            default: None,
            flag_names: vec!["--x".to_string()],
            help: String::new(),
            parser_overrides: options([("required", "yes")]),
        };
        assert!(matches!(flag_spec(&d), Err(ConfigError::InvalidOptionValue { .. })));
    }

    #[test]
    fn test_emit_records_one_call() {
        let ds = descriptors(
            Signature::new("f").param(Param::positional("a")),
            &OverrideRegistry::new(),
        );
        let mut sink = Recorder::default();
        emit(&ds[0], &mut sink).unwrap();
        assert_eq!(sink.specs.len(), 1);
    }
}
