//! Signature to descriptor translation

use crate::diag::{print_debug, print_warning};
use crate::error::{ConfigError, ConfigResult};
use crate::signature::descriptor::{dash_case, DeclKind, Descriptor, Param, ParamKind, Signature};
use crate::signature::doc::param_helps;
use crate::signature::overrides::{check_options, OverrideRegistry, ParserOptions};
use crate::signature::value::{Value, ValueType};
use std::collections::HashSet;

/// Translate a signature into its ordered descriptors
///
/// Var-keyword parameters are dropped. Every other parameter yields exactly
/// one descriptor, in declaration order.
pub fn translate(sig: &Signature, overrides: &OverrideRegistry) -> ConfigResult<Vec<Descriptor>> {
    let names: Vec<&str> = sig.params.iter().map(|p| p.name.as_str()).collect();
    let doc_helps = sig
        .doc
        .as_deref()
        .map(|doc| param_helps(doc, &names))
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut variadic: Option<&str> = None;
    let mut keyword_boundary = false;
    let mut descriptors = Vec::with_capacity(sig.params.len());

    for param in &sig.params {
        if !seen.insert(param.name.as_str()) {
            return Err(ConfigError::DuplicateParameter(param.name.clone()));
        }

        let kind = match param.kind {
            DeclKind::VarKeyword => {
                print_debug(&format!(
                    "{}: dropping var-keyword parameter '{}'",
                    sig.name, param.name
                ));
                continue;
            }
            DeclKind::VarPositional => {
                if let Some(first) = variadic {
                    return Err(ConfigError::PositionalAfterVariadic {
                        variadic: first.to_string(),
                        after: param.name.clone(),
                    });
                }
                variadic = Some(param.name.as_str());
                ParamKind::Variadic
            }
            DeclKind::KeywordOnly => {
                keyword_boundary = true;
                ParamKind::KeywordOnly
            }
            DeclKind::Positional if keyword_boundary || variadic.is_some() => ParamKind::KeywordOnly,
            DeclKind::Positional if param.default.is_none() => ParamKind::PositionalRequired,
            DeclKind::Positional => ParamKind::PositionalWithDefault,
        };

        let registered = overrides.get(&sig.name, &param.name);
        let flags = match registered {
            Some(ov) if !ov.flags.is_empty() => ov.flags.as_slice(),
            _ => param.flags.as_slice(),
        };
        let parser_overrides: ParserOptions = registered
            .map(|ov| ov.options.clone())
            .unwrap_or_default();
        check_options(&param.name, &parser_overrides)?;

        let help = registered
            .and_then(|ov| ov.help())
            .or_else(|| param.help.clone())
            .or_else(|| doc_helps.get(&param.name).cloned())
            .unwrap_or_default();

        let descriptor = Descriptor {
            name: param.name.clone(),
            kind,
            ty: derive_type(param, kind),
            default: if kind == ParamKind::Variadic {
                None
            } else {
                param.default.clone()
            },
            flag_names: flag_names(&sig.name, param, kind, flags)?,
            help,
            parser_overrides,
        };

        print_debug(&format!(
            "{}: {} -> {:?} {:?} type={:?} default={:?}",
            sig.name,
            descriptor.name,
            descriptor.kind,
            descriptor.flag_names,
            descriptor.ty,
            descriptor.default
        ));
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

/// Declared type, or one inferred from a numeric default
fn derive_type(param: &Param, kind: ParamKind) -> Option<ValueType> {
    if param.ty.is_some() || kind == ParamKind::Variadic {
        return param.ty.clone();
    }
    match param.default {
        Some(Value::Int(_)) => Some(ValueType::Int),
        Some(Value::Float(_)) => Some(ValueType::Float),
        _ => None,
    }
}

/// External spellings for one parameter
fn flag_names(
    command: &str,
    param: &Param,
    kind: ParamKind,
    overridden: &[String],
) -> ConfigResult<Vec<String>> {
    if matches!(kind, ParamKind::PositionalRequired | ParamKind::Variadic) {
        if !overridden.is_empty() {
            print_warning(&format!(
                "{}: ignoring flag spellings {:?} for positional '{}'",
                command, overridden, param.name
            ));
        }
        return Ok(vec![param.name.clone()]);
    }

    let canonical = format!("--{}", dash_case(&param.name));
    if overridden.is_empty() {
        return Ok(vec![canonical]);
    }

    let mut names = Vec::with_capacity(overridden.len());
    for (i, flag) in overridden.iter().enumerate() {
        if i == 0 && *flag == param.name {
            names.push(canonical.clone());
            continue;
        }
        validate_flag(&param.name, flag)?;
        names.push(flag.clone());
    }
    Ok(names)
}

/// Check that a spelling is `--long` or `-x`
pub fn validate_flag(param: &str, flag: &str) -> ConfigResult<()> {
    let invalid = |reason: &str| ConfigError::InvalidFlag {
        param: param.to_string(),
        flag: flag.to_string(),
        reason: reason.to_string(),
    };

    if let Some(long) = flag.strip_prefix("--") {
        if long.is_empty() || long.starts_with('-') {
            return Err(invalid("long flags need a name after '--'"));
        }
        if long.contains(char::is_whitespace) {
            return Err(invalid("flags cannot contain whitespace"));
        }
        Ok(())
    } else if let Some(short) = flag.strip_prefix('-') {
        let mut chars = short.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => Ok(()),
            _ => Err(invalid("short flags are a single character after '-'")),
        }
    } else {
        Err(invalid("flags must start with '-'"))
    }
}
