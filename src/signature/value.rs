//! Parsed values and coercion types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A typed value produced from command-line tokens, or a declared default
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            // keep the fractional part visible: `1.0`, not `1`
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::None)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Conversion from one raw token to a [`Value`]
pub type CoerceFn = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// How raw tokens for a parameter are coerced
#[derive(Clone)]
pub enum ValueType {
    /// Leave the token as a string
    Str,
    Bool,
    Int,
    Float,
    /// A filesystem path, kept as a string
    Path,
    /// A named user-supplied coercion
    Custom(String, CoerceFn),
}

impl ValueType {
    /// Build a custom coercion from a closure
    pub fn custom<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        ValueType::Custom(name.into(), Arc::new(f))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ValueType::Bool)
    }

    /// Short name used for value placeholders in help output
    pub fn name(&self) -> &str {
        match self {
            ValueType::Str => "str",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Path => "path",
            ValueType::Custom(name, _) => name,
        }
    }

    /// Coerce one raw token
    pub fn coerce(&self, raw: &str) -> Result<Value, String> {
        match self {
            ValueType::Str | ValueType::Path => Ok(Value::Str(raw.to_string())),
            ValueType::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(Value::Bool(true)),
                "false" | "no" | "0" | "off" => Ok(Value::Bool(false)),
                _ => Err(format!("invalid bool value: '{}'", raw)),
            },
            ValueType::Int => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| format!("invalid int value '{}': {}", raw, e)),
            ValueType::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| format!("invalid float value '{}': {}", raw, e)),
            ValueType::Custom(_, f) => f(raw),
        }
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Custom(name, _) => write!(f, "Custom({:?})", name),
            other => write!(f, "{}", other.name()),
        }
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueType::Custom(a, fa), ValueType::Custom(b, fb)) => a == b && Arc::ptr_eq(fa, fb),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}
