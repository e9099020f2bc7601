//! Fluent construction of MF2 messages.
//!
//! The builder assembles the same AST the parser produces, so everything it
//! emits round-trips through [`crate::parse`]. Text that would otherwise be
//! read back as a declaration prefix (a leading `.`) is promoted to a
//! complex message automatically.
//!
//! # Example
//!
//! ```
//! use mf2::builder::{Builder, var};
//!
//! let text = Builder::new()
//!     .text("Hello, ")
//!     .expr(var("$name").func(":string", []))
//!     .text("!")
//!     .to_text()
//!     .unwrap();
//!
//! assert_eq!(text, "Hello, { $name :string }!");
//! ```

use thiserror::Error;

use crate::parser::ast::{
    Annotation, Ast, ComplexBody, ComplexMessage, Declaration, Expression, FnOption, Function,
    Identifier, InputDeclaration, InvalidAst, Literal, LocalDeclaration, Matcher, Message,
    Operand, PatternPart, QuotedPattern, SimpleMessage, Variable, Variant, VariantKey,
};
use crate::parser::{is_name_char, is_name_start};

/// An error produced when a builder program does not describe a valid message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// The assembled tree failed structural validation.
    #[error(transparent)]
    Invalid(#[from] InvalidAst),

    /// The builder calls were sequenced incorrectly.
    #[error("{0}")]
    Shape(String),
}

/// Builds simple and complex MF2 messages fluently.
///
/// `.input` declarations group before `.local` declarations in the emitted
/// message, regardless of the order the builder calls were made in.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    inputs: Vec<Declaration>,
    locals: Vec<Declaration>,
    parts: Vec<PatternPart>,
    selectors: Vec<Expression>,
    variants: Vec<(Vec<VariantKey>, Vec<PatternPart>)>,
    spacing: Option<String>,
    error: Option<String>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text to the current pattern.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.push_part(PatternPart::Text(text.into()));
        self
    }

    /// Append a placeholder expression to the current pattern.
    pub fn expr(mut self, expr: Expr) -> Self {
        self.push_part(PatternPart::Expression(expr.into_expression()));
        self
    }

    /// Add a `.local $name = { … }` declaration.
    pub fn local(mut self, name: &str, expr: Expr) -> Self {
        self.locals.push(Declaration::Local(LocalDeclaration {
            variable: Variable(name.trim_start_matches('$').to_string()),
            expression: expr.into_expression(),
        }));
        self
    }

    /// Add a `.input { … }` declaration.
    pub fn input(mut self, expr: Expr) -> Self {
        self.inputs.push(Declaration::Input(InputDeclaration {
            expression: expr.into_expression(),
        }));
        self
    }

    /// Turn the message into a matcher with the given selector expressions.
    pub fn match_(mut self, selectors: impl IntoIterator<Item = Expr>) -> Self {
        self.selectors = selectors
            .into_iter()
            .map(Expr::into_expression)
            .collect();
        if self.selectors.is_empty() {
            self.fail("match requires at least one selector");
        }
        self
    }

    /// Start the next variant with the given keys. Subsequent `text`/`expr`
    /// calls fill the variant's pattern.
    pub fn keys(mut self, keys: impl IntoIterator<Item = impl Into<KeyArg>>) -> Self {
        if self.selectors.is_empty() {
            self.fail("keys requires a preceding match");
            return self;
        }
        let keys = keys.into_iter().map(|key| key.into().0).collect();
        self.variants.push((keys, Vec::new()));
        self
    }

    /// Set the separator used inside braces when emitting text.
    pub fn spacing(mut self, sep: impl Into<String>) -> Self {
        self.spacing = Some(sep.into());
        self
    }

    /// Assemble and validate the message.
    pub fn build(&self) -> Result<Ast, BuildError> {
        if let Some(error) = &self.error {
            return Err(BuildError::Shape(error.clone()));
        }

        // Inputs group before locals, whatever order they were added in.
        let declarations: Vec<Declaration> = self
            .inputs
            .iter()
            .chain(&self.locals)
            .cloned()
            .collect();

        let message = if !self.selectors.is_empty() {
            if !self.parts.is_empty() {
                return Err(BuildError::Shape(
                    "pattern text before the first variant keys".to_string(),
                ));
            }
            let variants = self
                .variants
                .iter()
                .map(|(keys, parts)| Variant {
                    keys: keys.clone(),
                    pattern: QuotedPattern(parts.clone()),
                })
                .collect();
            Message::Complex(ComplexMessage {
                declarations,
                body: ComplexBody::Matcher(Matcher {
                    selectors: self.selectors.clone(),
                    variants,
                }),
            })
        } else if !declarations.is_empty() || self.needs_promotion() {
            Message::Complex(ComplexMessage {
                declarations,
                body: ComplexBody::QuotedPattern(QuotedPattern(self.parts.clone())),
            })
        } else {
            Message::Simple(SimpleMessage(self.parts.clone()))
        };

        let ast = Ast { message };
        ast.validate()?;
        Ok(ast)
    }

    /// Like [`Builder::build`], but panics on error.
    pub fn must_build(&self) -> Ast {
        match self.build() {
            Ok(ast) => ast,
            Err(error) => panic!("build mf2 message: {error}"),
        }
    }

    /// Emit the message text with the configured spacing.
    pub fn to_text(&self) -> Result<String, BuildError> {
        let ast = self.build()?;
        let mut out = String::new();
        ast.print(&mut out, self.spacing.as_deref().unwrap_or(" "));
        Ok(out)
    }

    /// Simple text starting with `.` would be read back as a declaration.
    fn needs_promotion(&self) -> bool {
        matches!(self.parts.first(), Some(PatternPart::Text(text)) if text.starts_with('.'))
    }

    fn push_part(&mut self, part: PatternPart) {
        // Adjacent text merges and empty text is dropped, so the built tree
        // is structurally equal to the parse of its own output.
        if let PatternPart::Text(text) = &part {
            if text.is_empty() {
                return;
            }
            let parts = match self.variants.last_mut() {
                Some((_, parts)) => parts,
                None => &mut self.parts,
            };
            if let Some(PatternPart::Text(prev)) = parts.last_mut() {
                prev.push_str(text);
                return;
            }
        }

        match self.variants.last_mut() {
            Some((_, parts)) => parts.push(part),
            None => self.parts.push(part),
        }
    }

    fn fail(&mut self, message: &str) {
        if self.error.is_none() {
            self.error = Some(message.to_string());
        }
    }
}

/// An expression under construction.
#[derive(Debug, Clone)]
pub struct Expr {
    operand: Option<Operand>,
    annotation: Option<Annotation>,
}

impl Expr {
    /// Attach a `:name` function annotation with options.
    pub fn func(mut self, name: &str, options: impl IntoIterator<Item = OptionArg>) -> Self {
        self.annotation = Some(Annotation::Function(Function {
            identifier: split_identifier(name.trim_start_matches(':')),
            options: options
                .into_iter()
                .map(|option| FnOption {
                    identifier: split_identifier(&option.name),
                    value: option.value,
                })
                .collect(),
        }));
        self
    }

    fn into_expression(self) -> Expression {
        Expression {
            operand: self.operand,
            annotation: self.annotation,
            attributes: Vec::new(),
        }
    }
}

/// A `$variable` expression. The leading `$` is optional.
pub fn var(name: &str) -> Expr {
    Expr {
        operand: Some(Operand::Variable(Variable(
            name.trim_start_matches('$').to_string(),
        ))),
        annotation: None,
    }
}

/// A literal expression. Name-shaped text prints bare, everything else quoted.
pub fn literal(value: impl Into<LiteralArg>) -> Expr {
    Expr {
        operand: Some(Operand::Literal(value.into().0)),
        annotation: None,
    }
}

/// An annotation-only `{ :name … }` expression.
pub fn func(name: &str, options: impl IntoIterator<Item = OptionArg>) -> Expr {
    Expr {
        operand: None,
        annotation: None,
    }
    .func(name, options)
}

/// A `name = value` option for [`Expr::func`].
pub fn option(name: &str, value: impl Into<OperandArg>) -> OptionArg {
    OptionArg {
        name: name.to_string(),
        value: value.into().0,
    }
}

/// A named option argument.
#[derive(Debug, Clone)]
pub struct OptionArg {
    name: String,
    value: Operand,
}

/// A literal argument, converted from numbers and strings.
#[derive(Debug, Clone)]
pub struct LiteralArg(Literal);

impl From<i64> for LiteralArg {
    fn from(n: i64) -> Self {
        Self(Literal::Number(n as f64))
    }
}

impl From<i32> for LiteralArg {
    fn from(n: i32) -> Self {
        Self(Literal::Number(n.into()))
    }
}

impl From<f64> for LiteralArg {
    fn from(n: f64) -> Self {
        Self(Literal::Number(n))
    }
}

impl From<&str> for LiteralArg {
    fn from(text: &str) -> Self {
        Self(string_literal(text))
    }
}

impl From<String> for LiteralArg {
    fn from(text: String) -> Self {
        Self(string_literal(&text))
    }
}

/// An operand argument for option values: `$name` becomes a variable,
/// name-shaped text a name literal, numbers number literals, and anything
/// else a quoted literal.
#[derive(Debug, Clone)]
pub struct OperandArg(Operand);

impl From<i64> for OperandArg {
    fn from(n: i64) -> Self {
        Self(Operand::Literal(Literal::Number(n as f64)))
    }
}

impl From<i32> for OperandArg {
    fn from(n: i32) -> Self {
        Self(Operand::Literal(Literal::Number(n.into())))
    }
}

impl From<f64> for OperandArg {
    fn from(n: f64) -> Self {
        Self(Operand::Literal(Literal::Number(n)))
    }
}

impl From<&str> for OperandArg {
    fn from(text: &str) -> Self {
        match text.strip_prefix('$') {
            Some(name) => Self(Operand::Variable(Variable(name.to_string()))),
            None => Self(Operand::Literal(string_literal(text))),
        }
    }
}

/// A variant key argument: `*` becomes the catch-all key.
#[derive(Debug, Clone)]
pub struct KeyArg(VariantKey);

impl From<i64> for KeyArg {
    fn from(n: i64) -> Self {
        Self(VariantKey::Literal(Literal::Number(n as f64)))
    }
}

impl From<i32> for KeyArg {
    fn from(n: i32) -> Self {
        Self(VariantKey::Literal(Literal::Number(n.into())))
    }
}

impl From<&str> for KeyArg {
    fn from(text: &str) -> Self {
        if text == "*" {
            Self(VariantKey::CatchAll)
        } else {
            Self(VariantKey::Literal(string_literal(text)))
        }
    }
}

fn string_literal(text: &str) -> Literal {
    if is_name(text) {
        Literal::Name(text.to_string())
    } else {
        Literal::Quoted(text.to_string())
    }
}

fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_char),
        _ => false,
    }
}

fn split_identifier(name: &str) -> Identifier {
    match name.split_once(':') {
        Some((namespace, name)) => Identifier {
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
        },
        None => Identifier {
            namespace: None,
            name: name.to_string(),
        },
    }
}
