//! MF2 template evaluation.
//!
//! A [`Template`] pairs a parsed message with a function registry and a
//! locale. It is immutable once built and can be rendered concurrently;
//! each [`Template::render`] call owns its variable environment.

mod error;
mod evaluator;
mod functions;
mod registry;

use std::collections::HashMap;

use bon::Builder;
use icu_locale_core::{Locale, locale};

use crate::parser::{Ast, ParseError, parse};
use crate::types::Value;

pub use error::RenderError;
pub use registry::{FormatFn, FuncError, FunctionRegistry, MatchFn, Options, RegistryFunc};

/// A renderable MF2 message: parsed AST, function registry and locale.
///
/// # Example
///
/// ```
/// use mf2::{Template, args};
///
/// let template = Template::parse("Hello, { $name } World!").unwrap();
/// let (text, errors) = template.render(&args! { "name" => "MF2" });
///
/// assert_eq!(text, "Hello, MF2 World!");
/// assert!(errors.is_empty());
/// ```
#[derive(Debug, Builder)]
pub struct Template {
    /// The parsed message.
    ast: Ast,

    /// Locale-sensitive format/match primitives, keyed by function name.
    #[builder(default = FunctionRegistry::standard())]
    registry: FunctionRegistry,

    /// The locale consulted by locale-sensitive functions.
    #[builder(default = locale!("en-US"))]
    locale: Locale,
}

impl Template {
    /// Parse `input` into a template with the standard registry and the
    /// `en-US` locale.
    pub fn parse(input: &str) -> Result<Template, ParseError> {
        Ok(Template::builder().ast(parse(input)?).build())
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Render the message against `vars`.
    ///
    /// Returns the best-effort output text together with every error
    /// recorded during the render. Benign errors (unresolved variables,
    /// unsupported reserved syntax) leave placeholder text and rendering
    /// continues; fatal errors terminate the render early. The caller
    /// decides severity.
    pub fn render(&self, vars: &HashMap<String, Value>) -> (String, Vec<RenderError>) {
        evaluator::render(self, vars)
    }
}
