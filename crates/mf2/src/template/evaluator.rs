//! Template evaluation engine.
//!
//! This module renders a parsed message against a variable environment:
//! declarations bind in textual order, pattern parts append to the output,
//! and matchers run the MF2 pattern-selection algorithm
//! (selectors, preferences, filter, sort, pick).

use std::collections::{HashMap, HashSet};

use crate::parser::ast::{
    Annotation, ComplexBody, ComplexMessage, Declaration, Expression, FnOption, Literal, Matcher,
    Message, Operand, PatternPart, Variant, VariantKey,
};
use crate::template::Template;
use crate::template::error::RenderError;
use crate::template::registry::{FuncError, Options};
use crate::types::Value;

pub(super) fn render(
    template: &Template,
    vars: &HashMap<String, Value>,
) -> (String, Vec<RenderError>) {
    let mut renderer = Renderer {
        template,
        variables: vars.clone(),
        out: String::new(),
        errors: Vec::new(),
    };

    if let Err(fatal) = renderer.run() {
        renderer.errors.push(fatal);
    }

    (renderer.out, renderer.errors)
}

/// Render state for a single `render` call.
///
/// The variable environment is seeded from the caller's input map and
/// extended monotonically by declarations.
struct Renderer<'a> {
    template: &'a Template,
    variables: HashMap<String, Value>,
    out: String,
    errors: Vec<RenderError>,
}

impl<'a> Renderer<'a> {
    fn run(&mut self) -> Result<(), RenderError> {
        let template = self.template;
        match &template.ast().message {
            Message::Simple(message) => {
                self.resolve_pattern(&message.0);
                Ok(())
            }
            Message::Complex(message) => self.resolve_complex_message(message),
        }
    }

    fn resolve_complex_message(&mut self, message: &'a ComplexMessage) -> Result<(), RenderError> {
        self.resolve_declarations(&message.declarations)?;

        match &message.body {
            ComplexBody::QuotedPattern(pattern) => {
                self.resolve_pattern(&pattern.0);
                Ok(())
            }
            ComplexBody::Matcher(matcher) => self.resolve_matcher(matcher),
        }
    }

    /// Bind declarations in textual order.
    ///
    /// Each `.input`/`.local` declaration binds the formatted string of its
    /// expression. A benign failure (unresolved variable, reserved statement)
    /// is recorded and stops declaration processing; the body still renders.
    fn resolve_declarations(&mut self, declarations: &'a [Declaration]) -> Result<(), RenderError> {
        let mut declared: HashSet<&str> = HashSet::new();

        for declaration in declarations {
            let (name, expression) = match declaration {
                Declaration::Reserved(statement) => {
                    self.errors
                        .push(RenderError::UnsupportedStatement(statement.keyword.clone()));
                    return Ok(());
                }
                Declaration::Local(declaration) => {
                    (&declaration.variable.0, &declaration.expression)
                }
                Declaration::Input(declaration) => {
                    let Some(Operand::Variable(variable)) = &declaration.expression.operand else {
                        // validate() rejects this shape; guard for hand-built trees
                        return Err(RenderError::UnsupportedExpression(
                            "input declaration operand must be a variable".to_string(),
                        ));
                    };
                    (&variable.0, &declaration.expression)
                }
            };

            if !declared.insert(name.as_str()) {
                return Err(RenderError::DuplicateDeclaration(name.clone()));
            }

            let (resolved, errors) = self.resolve_expression(expression);

            if errors.is_empty() {
                self.variables.insert(name.clone(), Value::String(resolved));
            } else if errors
                .iter()
                .all(|e| matches!(e, RenderError::UnresolvedVariable(_)))
            {
                self.errors.extend(errors);
                return Ok(());
            } else {
                let fatal = errors
                    .into_iter()
                    .find(|e| !matches!(e, RenderError::UnresolvedVariable(_)))
                    .unwrap_or(RenderError::UnsupportedExpression(
                        "declaration expression failed".to_string(),
                    ));
                return Err(fatal);
            }
        }

        Ok(())
    }

    /// Append a pattern to the output, best-effort.
    ///
    /// Expression errors are recorded and rendering continues with whatever
    /// text the expression produced. Markup formats to the empty string.
    fn resolve_pattern(&mut self, parts: &'a [PatternPart]) {
        for part in parts {
            match part {
                PatternPart::Text(text) => self.out.push_str(text),
                PatternPart::Expression(expression) => {
                    let (resolved, errors) = self.resolve_expression(expression);
                    self.errors.extend(errors);
                    self.out.push_str(&resolved);
                }
                PatternPart::Markup(_) => {}
            }
        }
    }

    /// Resolve an expression to its formatted string plus recorded errors.
    ///
    /// An unresolved variable operand yields the `{$name}` placeholder and
    /// skips the annotation.
    fn resolve_expression(&self, expression: &Expression) -> (String, Vec<RenderError>) {
        let operand = match &expression.operand {
            None => None,
            Some(Operand::Literal(literal)) => Some(literal_value(literal)),
            Some(Operand::Variable(variable)) => match self.variables.get(&variable.0) {
                Some(value) => Some(value.clone()),
                None => {
                    return (
                        format!("{{${}}}", variable.0),
                        vec![RenderError::UnresolvedVariable(variable.0.clone())],
                    );
                }
            },
        };

        self.resolve_annotation(operand.as_ref(), expression.annotation.as_ref())
    }

    fn resolve_annotation(
        &self,
        operand: Option<&Value>,
        annotation: Option<&Annotation>,
    ) -> (String, Vec<RenderError>) {
        let mut errors = Vec::new();

        let function = match annotation {
            Some(Annotation::Function(function)) => Some(function),
            Some(Annotation::PrivateUse(annotation)) => {
                errors.push(RenderError::UnsupportedExpression(format!(
                    "private-use annotation '{}'",
                    annotation.start
                )));
                if operand.is_none() {
                    return (format!("{{{}}}", annotation.start), errors);
                }
                None
            }
            Some(Annotation::Reserved(annotation)) => {
                errors.push(RenderError::UnsupportedExpression(format!(
                    "reserved annotation '{}'",
                    annotation.start
                )));
                if operand.is_none() {
                    return (format!("{{{}}}", annotation.start), errors);
                }
                None
            }
            None => None,
        };

        let (name, options) = match function {
            Some(function) => {
                let options = match self.resolve_options(&function.options) {
                    Ok(options) => options,
                    Err(error) => {
                        errors.push(error);
                        return (String::new(), errors);
                    }
                };
                (function.identifier.key(), options)
            }
            None => match operand {
                Some(value) => (default_function(value).to_string(), Options::new()),
                None => return (String::new(), errors),
            },
        };

        let Some(func) = self.template.registry().get(&name) else {
            errors.push(RenderError::UnknownFunction(name));
            return (
                operand.map(ToString::to_string).unwrap_or_default(),
                errors,
            );
        };

        let Some(format) = &func.format else {
            errors.push(RenderError::UnsupportedExpression(format!(
                "function '{name}' not allowed in formatting context"
            )));
            return (String::new(), errors);
        };

        match format(operand, &options, self.template.locale()) {
            Ok(resolved) => (resolved, errors),
            Err(error) => {
                errors.push(error.into());
                (String::new(), errors)
            }
        }
    }

    /// Resolve options left-to-right. A duplicate name or an unresolved
    /// variable value aborts resolution of the whole annotation.
    fn resolve_options(&self, options: &[FnOption]) -> Result<Options, RenderError> {
        let mut resolved = Options::new();

        for option in options {
            let name = option.identifier.key();
            if resolved.contains(&name) {
                return Err(RenderError::DuplicateOptionName(name));
            }

            let value = match &option.value {
                Operand::Literal(literal) => literal_value(literal),
                Operand::Variable(variable) => self
                    .variables
                    .get(&variable.0)
                    .cloned()
                    .ok_or_else(|| RenderError::UnresolvedVariable(variable.0.clone()))?,
            };

            resolved.insert(name, value);
        }

        Ok(resolved)
    }

    // -----------------------------------------------------------------------
    // Pattern selection
    // -----------------------------------------------------------------------

    fn resolve_matcher(&mut self, matcher: &'a Matcher) -> Result<(), RenderError> {
        let results = self.resolve_selectors(matcher)?;
        let preferences = resolve_preferences(matcher, &results);
        let filtered = filter_variants(matcher, &preferences);
        let sorted = sort_variants(filtered, &preferences);

        let Some(best) = sorted.first() else {
            return Err(RenderError::Selection("no variant matched".to_string()));
        };

        self.resolve_pattern(&best.pattern.0);
        Ok(())
    }

    fn resolve_selectors(&self, matcher: &Matcher) -> Result<Vec<Vec<String>>, RenderError> {
        matcher
            .selectors
            .iter()
            .map(|selector| self.resolve_selector(selector))
            .collect()
    }

    /// Resolve one selector expression to the keys it accepts.
    ///
    /// Selector resolution is strict: every failure is fatal to the render.
    fn resolve_selector(&self, selector: &Expression) -> Result<Vec<String>, RenderError> {
        let operand = match &selector.operand {
            None => None,
            Some(Operand::Literal(literal)) => Some(literal_value(literal)),
            Some(Operand::Variable(variable)) => Some(
                self.variables
                    .get(&variable.0)
                    .cloned()
                    .ok_or_else(|| RenderError::UnresolvedVariable(variable.0.clone()))?,
            ),
        };

        let (name, options) = match &selector.annotation {
            Some(Annotation::Function(function)) => (
                function.identifier.key(),
                self.resolve_options(&function.options)?,
            ),
            Some(Annotation::PrivateUse(_) | Annotation::Reserved(_)) => {
                return Err(RenderError::UnsupportedExpression(
                    "private-use or reserved annotation in selector context".to_string(),
                ));
            }
            None => match &operand {
                Some(value) => (default_function(value).to_string(), Options::new()),
                None => return Err(RenderError::MissingSelectorAnnotation),
            },
        };

        let Some(func) = self.template.registry().get(&name) else {
            return Err(RenderError::UnknownFunction(name));
        };

        let Some(matcher_fn) = &func.matcher else {
            return Err(RenderError::UnsupportedExpression(format!(
                "function '{name}' not allowed in selector context"
            )));
        };

        matcher_fn(operand.as_ref(), &options, self.template.locale()).map_err(selection_error)
    }
}

/// Build the preference list for each selector: the keys the selector
/// accepts, restricted to those that occur at its key position across the
/// variants, in the order the selector function returned them.
fn resolve_preferences(matcher: &Matcher, results: &[Vec<String>]) -> Vec<Vec<String>> {
    results
        .iter()
        .enumerate()
        .map(|(i, accepted)| {
            let mut candidates: Vec<String> = Vec::new();
            for variant in &matcher.variants {
                if let Some(VariantKey::Literal(literal)) = variant.keys.get(i) {
                    let key = literal_key(literal);
                    if !candidates.contains(&key) {
                        candidates.push(key);
                    }
                }
            }

            accepted
                .iter()
                .filter(|key| candidates.contains(key))
                .cloned()
                .collect()
        })
        .collect()
}

/// A variant survives iff every key is `*` or a member of that selector
/// position's preference list.
fn filter_variants<'m>(matcher: &'m Matcher, preferences: &[Vec<String>]) -> Vec<&'m Variant> {
    matcher
        .variants
        .iter()
        .filter(|variant| {
            preferences
                .iter()
                .enumerate()
                .all(|(i, preference)| match variant.keys.get(i) {
                    Some(VariantKey::Literal(literal)) => {
                        preference.contains(&literal_key(literal))
                    }
                    Some(VariantKey::CatchAll) | None => true,
                })
        })
        .collect()
}

/// Stable right-to-left sort: for each selector from last to first, score a
/// variant by its key's index in the preference list, with `*` ranked after
/// every listed key. Ties keep textual order.
fn sort_variants<'m>(
    mut variants: Vec<&'m Variant>,
    preferences: &[Vec<String>],
) -> Vec<&'m Variant> {
    for (i, preference) in preferences.iter().enumerate().rev() {
        variants.sort_by_key(|variant| match variant.keys.get(i) {
            Some(VariantKey::Literal(literal)) => preference
                .iter()
                .position(|key| *key == literal_key(literal))
                .unwrap_or(preference.len()),
            Some(VariantKey::CatchAll) | None => preference.len(),
        });
    }
    variants
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Quoted(text) | Literal::Name(text) => Value::String(text.clone()),
        Literal::Number(n) => Value::Number(*n),
    }
}

/// The canonical key form of a literal: number keys use the same shortest
/// decimal form the selector functions emit.
fn literal_key(literal: &Literal) -> String {
    match literal {
        Literal::Quoted(text) | Literal::Name(text) => text.clone(),
        Literal::Number(n) => n.to_string(),
    }
}

/// The builtin function inferred for an annotation-less expression.
fn default_function(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Datetime(_) => "datetime",
    }
}

fn selection_error(error: FuncError) -> RenderError {
    match error {
        FuncError::Formatting(message) => RenderError::Selection(message),
        other => other.into(),
    }
}
