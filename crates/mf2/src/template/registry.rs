//! Function registry: the pluggable format/match primitives a template
//! consults when it encounters a function annotation.

use std::collections::HashMap;
use std::sync::Arc;

use icu_locale_core::Locale;
use thiserror::Error;

use crate::types::Value;

/// An error returned by a registry function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuncError {
    /// The operand value is not acceptable to the function.
    #[error("{0}")]
    OperandMismatch(String),

    /// An option is unknown to the function or has an invalid value.
    #[error("{0}")]
    UnsupportedOption(String),

    /// The function failed to produce output.
    #[error("{0}")]
    Formatting(String),
}

/// A format callable: `(operand, options, locale)` to formatted text.
pub type FormatFn =
    Arc<dyn Fn(Option<&Value>, &Options, &Locale) -> Result<String, FuncError> + Send + Sync>;

/// A match callable: `(operand, options, locale)` to the ordered list of
/// variant keys the selector accepts, most specific first.
pub type MatchFn =
    Arc<dyn Fn(Option<&Value>, &Options, &Locale) -> Result<Vec<String>, FuncError> + Send + Sync>;

/// The pair of callables registered under one function name.
///
/// Either may be absent: a function with no `format` cannot appear in
/// formatting position, one with no `matcher` cannot be a matcher selector.
#[derive(Clone)]
pub struct RegistryFunc {
    pub format: Option<FormatFn>,
    pub matcher: Option<MatchFn>,
}

impl RegistryFunc {
    /// A function usable both for formatting and for selection.
    pub fn new<F, M>(format: F, matcher: M) -> Self
    where
        F: Fn(Option<&Value>, &Options, &Locale) -> Result<String, FuncError>
            + Send
            + Sync
            + 'static,
        M: Fn(Option<&Value>, &Options, &Locale) -> Result<Vec<String>, FuncError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            format: Some(Arc::new(format)),
            matcher: Some(Arc::new(matcher)),
        }
    }

    /// A function usable only in formatting position.
    pub fn format_only<F>(format: F) -> Self
    where
        F: Fn(Option<&Value>, &Options, &Locale) -> Result<String, FuncError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            format: Some(Arc::new(format)),
            matcher: None,
        }
    }

    /// A function usable only as a matcher selector.
    pub fn match_only<M>(matcher: M) -> Self
    where
        M: Fn(Option<&Value>, &Options, &Locale) -> Result<Vec<String>, FuncError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            format: None,
            matcher: Some(Arc::new(matcher)),
        }
    }
}

/// Mapping from function name to its callables.
///
/// Namespaced names (`ns:name`) are opaque composite keys, matched exactly.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    funcs: HashMap<String, RegistryFunc>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with the builtin `string`, `number`, `integer` and
    /// `datetime` functions.
    pub fn standard() -> Self {
        super::functions::standard()
    }

    /// Register a function, replacing any previous entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, func: RegistryFunc) {
        self.funcs.insert(name.into(), func);
    }

    pub fn get(&self, name: &str) -> Option<&RegistryFunc> {
        self.funcs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("funcs", &names)
            .finish()
    }
}

/// Resolved options passed to a registry function, with typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options(HashMap<String, Value>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style insert, for assembling option maps in call sites.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Get a string option with a default and an enumerated-choice check.
    ///
    /// An empty `choices` slice accepts any value.
    pub fn get_string(
        &self,
        name: &str,
        default: &str,
        choices: &[&str],
    ) -> Result<String, FuncError> {
        let Some(value) = self.0.get(name) else {
            return Ok(default.to_string());
        };

        let value = value.to_string();
        if !choices.is_empty() && !choices.contains(&value.as_str()) {
            return Err(FuncError::UnsupportedOption(format!(
                "{name}: invalid value '{value}', expected one of {}",
                choices.join(", ")
            )));
        }

        Ok(value)
    }

    /// Get a non-negative integer option with a default.
    ///
    /// Numeric strings are accepted, matching literal option values such as
    /// `maximumFractionDigits = |1|`.
    pub fn get_usize(&self, name: &str, default: usize) -> Result<usize, FuncError> {
        let invalid = |value: &dyn std::fmt::Display| {
            FuncError::UnsupportedOption(format!(
                "{name}: invalid value '{value}', expected a non-negative integer"
            ))
        };

        match self.0.get(name) {
            None => Ok(default),
            Some(Value::Number(n)) if n.fract() == 0.0 && *n >= 0.0 => Ok(*n as usize),
            Some(Value::String(s)) => s.parse().map_err(|_| invalid(s)),
            Some(value) => Err(invalid(value)),
        }
    }

    /// Reject any option key outside `allowed`.
    pub fn ensure_allowed(&self, allowed: &[&str]) -> Result<(), FuncError> {
        let mut unknown: Vec<&str> = self
            .0
            .keys()
            .map(String::as_str)
            .filter(|key| !allowed.contains(key))
            .collect();
        unknown.sort_unstable();

        match unknown.first() {
            Some(key) => Err(FuncError::UnsupportedOption((*key).to_string())),
            None => Ok(()),
        }
    }
}

impl FromIterator<(String, Value)> for Options {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
