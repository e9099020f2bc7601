//! Public AST types for MessageFormat 2.0 messages.
//!
//! These types are public to enable external tooling (linters, formatters,
//! builders). `Display` renders the canonical MF2 text form; `Ast::validate`
//! checks the structural invariants the grammar alone cannot express.

use thiserror::Error;

/// A structurally invalid AST node, with the dotted path to the failing node.
///
/// Example: `ast.simpleMessage.expression.variable: name is empty`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {reason}")]
pub struct InvalidAst {
    pub path: String,
    pub reason: String,
}

impl InvalidAst {
    fn new(node: &str, reason: impl Into<String>) -> Self {
        Self {
            path: node.to_string(),
            reason: reason.into(),
        }
    }

    fn at(mut self, parent: &str) -> Self {
        self.path = format!("{parent}.{}", self.path);
        self
    }
}

/// The abstract syntax tree of a single MF2 message.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub message: Message,
}

impl Ast {
    /// Validate the tree against the MF2 structural invariants.
    ///
    /// On failure the error carries the dotted path to the first failing
    /// node, e.g. `ast.complexMessage.matcher: at least one variant is required`.
    pub fn validate(&self) -> Result<(), InvalidAst> {
        self.message.validate().map_err(|e| e.at("ast"))
    }

    pub(crate) fn print(&self, out: &mut String, sep: &str) {
        self.message.print(out, sep);
    }
}

impl std::fmt::Display for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The top-level message node.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Simple(SimpleMessage),
    Complex(ComplexMessage),
}

impl Message {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self {
            Message::Simple(m) => m.validate(),
            Message::Complex(m) => m.validate(),
        }
    }

    fn print(&self, out: &mut String, sep: &str) {
        match self {
            Message::Simple(m) => m.print(out, sep),
            Message::Complex(m) => m.print(out, sep),
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        self.print(&mut out, " ");
        f.write_str(&out)
    }
}

/// An unquoted pattern: the whole body of a simple message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleMessage(pub Vec<PatternPart>);

impl SimpleMessage {
    fn validate(&self) -> Result<(), InvalidAst> {
        for part in &self.0 {
            part.validate().map_err(|e| e.at("simpleMessage"))?;
        }
        Ok(())
    }

    fn print(&self, out: &mut String, sep: &str) {
        for part in &self.0 {
            part.print(out, sep);
        }
    }
}

/// A declaration list followed by a quoted pattern or a matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexMessage {
    pub declarations: Vec<Declaration>,
    pub body: ComplexBody,
}

impl ComplexMessage {
    fn validate(&self) -> Result<(), InvalidAst> {
        for decl in &self.declarations {
            decl.validate().map_err(|e| e.at("complexMessage"))?;
        }
        self.body.validate().map_err(|e| e.at("complexMessage"))
    }

    fn print(&self, out: &mut String, sep: &str) {
        for decl in &self.declarations {
            decl.print(out, sep);
            out.push('\n');
        }
        self.body.print(out, sep);
    }
}

/// One element of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternPart {
    Text(String),
    Expression(Expression),
    Markup(Markup),
}

impl PatternPart {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self {
            PatternPart::Text(_) => Ok(()),
            PatternPart::Expression(e) => e.validate(),
            PatternPart::Markup(m) => m.validate(),
        }
    }

    fn print(&self, out: &mut String, sep: &str) {
        match self {
            PatternPart::Text(t) => push_escaped(out, t, &['\\', '{', '}']),
            PatternPart::Expression(e) => e.print(out, sep),
            PatternPart::Markup(m) => m.print(out, sep),
        }
    }
}

/// A placeholder expression: `{ operand? annotation? attribute* }`.
///
/// At least one of `operand` and `annotation` is present in a valid tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    pub operand: Option<Operand>,
    pub annotation: Option<Annotation>,
    pub attributes: Vec<Attribute>,
}

impl Expression {
    fn validate(&self) -> Result<(), InvalidAst> {
        if self.operand.is_none() && self.annotation.is_none() {
            return Err(InvalidAst::new(
                "expression",
                "at least one of operand or annotation is required",
            ));
        }
        if let Some(operand) = &self.operand {
            operand.validate().map_err(|e| e.at("expression"))?;
        }
        if let Some(annotation) = &self.annotation {
            annotation.validate().map_err(|e| e.at("expression"))?;
        }
        for attribute in &self.attributes {
            attribute.validate().map_err(|e| e.at("expression"))?;
        }
        Ok(())
    }

    fn print(&self, out: &mut String, sep: &str) {
        out.push('{');
        out.push_str(sep);
        let mut first = true;
        if let Some(operand) = &self.operand {
            operand.print(out, sep);
            first = false;
        }
        if let Some(annotation) = &self.annotation {
            if !first {
                out.push_str(sep);
            }
            annotation.print(out, sep);
            first = false;
        }
        for attribute in &self.attributes {
            if !first {
                out.push_str(sep);
            }
            attribute.print(out, sep);
            first = false;
        }
        out.push_str(sep);
        out.push('}');
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        self.print(&mut out, " ");
        f.write_str(&out)
    }
}

/// An expression or option operand: a literal or a variable reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    Variable(Variable),
}

impl Operand {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self {
            Operand::Literal(l) => l.validate(),
            Operand::Variable(v) => v.validate(),
        }
    }

    fn print(&self, out: &mut String, sep: &str) {
        match self {
            Operand::Literal(l) => l.print(out, sep),
            Operand::Variable(v) => v.print(out),
        }
    }
}

/// A literal value.
///
/// Number literals are finite 64-bit floats and always print in their
/// shortest plain decimal form, so `1e3` re-serializes as `1000`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Quoted(String),
    Name(String),
    Number(f64),
}

impl Literal {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self {
            Literal::Quoted(_) => Ok(()),
            Literal::Name(name) if name.is_empty() => {
                Err(InvalidAst::new("nameLiteral", "literal is empty"))
            }
            Literal::Name(_) => Ok(()),
            Literal::Number(n) if n.is_nan() => {
                Err(InvalidAst::new("numberLiteral", "literal is NaN"))
            }
            Literal::Number(n) if n.is_infinite() => {
                Err(InvalidAst::new("numberLiteral", "literal is infinite"))
            }
            Literal::Number(_) => Ok(()),
        }
    }

    fn print(&self, out: &mut String, _sep: &str) {
        match self {
            Literal::Quoted(text) => {
                out.push('|');
                push_escaped(out, text, &['\\', '|']);
                out.push('|');
            }
            Literal::Name(name) => out.push_str(name),
            Literal::Number(n) => out.push_str(&n.to_string()),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        self.print(&mut out, " ");
        f.write_str(&out)
    }
}

/// A `$name` variable reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable(pub String);

impl Variable {
    fn validate(&self) -> Result<(), InvalidAst> {
        if self.0.is_empty() {
            return Err(InvalidAst::new("variable", "name is empty"));
        }
        Ok(())
    }

    fn print(&self, out: &mut String) {
        out.push('$');
        out.push_str(&self.0);
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// The annotation attached to an expression operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Function(Function),
    PrivateUse(PrivateUseAnnotation),
    Reserved(ReservedAnnotation),
}

impl Annotation {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self {
            Annotation::Function(f) => f.validate(),
            Annotation::PrivateUse(a) => a.validate(),
            Annotation::Reserved(a) => a.validate(),
        }
    }

    fn print(&self, out: &mut String, sep: &str) {
        match self {
            Annotation::Function(f) => f.print(out, sep),
            Annotation::PrivateUse(a) => a.print(out),
            Annotation::Reserved(a) => a.print(out),
        }
    }
}

/// A `:name` function annotation with its options.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub identifier: Identifier,
    pub options: Vec<FnOption>,
}

impl Function {
    fn validate(&self) -> Result<(), InvalidAst> {
        self.identifier.validate().map_err(|e| e.at("function"))?;
        for option in &self.options {
            option.validate().map_err(|e| e.at("function"))?;
        }
        Ok(())
    }

    fn print(&self, out: &mut String, sep: &str) {
        out.push(':');
        self.identifier.print(out);
        for option in &self.options {
            out.push_str(sep);
            option.print(out, sep);
        }
    }
}

/// Sigils that may start a private-use annotation.
pub const PRIVATE_USE_START: &[char] = &['^', '&'];

/// Sigils that may start a reserved annotation.
pub const RESERVED_START: &[char] = &['!', '@', '#', '%', '*', '<', '>', '?', '~'];

/// A `^…` or `&…` private-use annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateUseAnnotation {
    pub start: char,
    pub body: Vec<ReservedBody>,
}

impl PrivateUseAnnotation {
    fn validate(&self) -> Result<(), InvalidAst> {
        if !PRIVATE_USE_START.contains(&self.start) {
            return Err(InvalidAst::new(
                "privateUseAnnotation",
                format!("start must be a private-use start char, got '{}'", self.start),
            ));
        }
        for part in &self.body {
            part.validate().map_err(|e| e.at("privateUseAnnotation"))?;
        }
        Ok(())
    }

    fn print(&self, out: &mut String) {
        out.push(self.start);
        print_reserved_body(out, &self.body);
    }
}

/// A reserved annotation: syntax held back for future versions of MF2.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservedAnnotation {
    pub start: char,
    pub body: Vec<ReservedBody>,
}

impl ReservedAnnotation {
    fn validate(&self) -> Result<(), InvalidAst> {
        if !RESERVED_START.contains(&self.start) {
            return Err(InvalidAst::new(
                "reservedAnnotation",
                format!("start must be a reserved start char, got '{}'", self.start),
            ));
        }
        for part in &self.body {
            part.validate().map_err(|e| e.at("reservedAnnotation"))?;
        }
        Ok(())
    }

    fn print(&self, out: &mut String) {
        out.push(self.start);
        print_reserved_body(out, &self.body);
    }
}

/// One chunk of a reserved/private-use body.
#[derive(Debug, Clone, PartialEq)]
pub enum ReservedBody {
    Quoted(String),
    Text(String),
}

impl ReservedBody {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self {
            ReservedBody::Quoted(_) => Ok(()),
            ReservedBody::Text(text) if text.is_empty() => {
                Err(InvalidAst::new("reservedText", "text is empty"))
            }
            ReservedBody::Text(_) => Ok(()),
        }
    }

    fn print(&self, out: &mut String) {
        match self {
            ReservedBody::Quoted(text) => {
                out.push('|');
                push_escaped(out, text, &['\\', '|']);
                out.push('|');
            }
            ReservedBody::Text(text) => push_escaped(out, text, &['\\', '{', '}', '|']),
        }
    }
}

fn print_reserved_body(out: &mut String, body: &[ReservedBody]) {
    for (i, part) in body.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        part.print(out);
    }
}

/// A declaration before the body of a complex message.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Input(InputDeclaration),
    Local(LocalDeclaration),
    Reserved(ReservedStatement),
}

impl Declaration {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self {
            Declaration::Input(d) => d.validate(),
            Declaration::Local(d) => d.validate(),
            Declaration::Reserved(d) => d.validate(),
        }
    }

    fn print(&self, out: &mut String, sep: &str) {
        match self {
            Declaration::Input(d) => d.print(out, sep),
            Declaration::Local(d) => d.print(out, sep),
            Declaration::Reserved(d) => d.print(out, sep),
        }
    }
}

/// `.input { $var … }` — the expression operand must be a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDeclaration {
    pub expression: Expression,
}

impl InputDeclaration {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self.expression.operand {
            Some(Operand::Variable(_)) => {}
            Some(_) => {
                return Err(InvalidAst::new(
                    "inputDeclaration",
                    "expression operand must be a variable",
                ));
            }
            None => {
                return Err(InvalidAst::new(
                    "inputDeclaration",
                    "expression operand is required",
                ));
            }
        }
        self.expression
            .validate()
            .map_err(|e| e.at("inputDeclaration"))
    }

    fn print(&self, out: &mut String, sep: &str) {
        out.push_str(".input");
        out.push_str(sep);
        self.expression.print(out, sep);
    }
}

/// `.local $var = { … }`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDeclaration {
    pub variable: Variable,
    pub expression: Expression,
}

impl LocalDeclaration {
    fn validate(&self) -> Result<(), InvalidAst> {
        self.variable
            .validate()
            .map_err(|e| e.at("localDeclaration"))?;
        self.expression
            .validate()
            .map_err(|e| e.at("localDeclaration"))
    }

    fn print(&self, out: &mut String, sep: &str) {
        out.push_str(".local ");
        self.variable.print(out);
        out.push_str(sep);
        out.push('=');
        out.push_str(sep);
        self.expression.print(out, sep);
    }
}

const RESERVED_KEYWORDS: &[&str] = &["match", "local", "input"];

/// A `.keyword …` statement reserved for future MF2 versions.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservedStatement {
    pub keyword: String,
    pub body: Vec<ReservedBody>,
    pub expressions: Vec<Expression>,
}

impl ReservedStatement {
    fn validate(&self) -> Result<(), InvalidAst> {
        if self.keyword.is_empty() {
            return Err(InvalidAst::new("reservedStatement", "keyword is empty"));
        }
        if RESERVED_KEYWORDS.contains(&self.keyword.as_str()) {
            return Err(InvalidAst::new(
                "reservedStatement",
                format!("keyword '{}' is not allowed", self.keyword),
            ));
        }
        if self.expressions.is_empty() {
            return Err(InvalidAst::new(
                "reservedStatement",
                "at least one expression is required",
            ));
        }
        for part in &self.body {
            part.validate().map_err(|e| e.at("reservedStatement"))?;
        }
        for expression in &self.expressions {
            expression.validate().map_err(|e| e.at("reservedStatement"))?;
        }
        Ok(())
    }

    fn print(&self, out: &mut String, sep: &str) {
        out.push('.');
        out.push_str(&self.keyword);
        for part in &self.body {
            out.push(' ');
            part.print(out);
        }
        for expression in &self.expressions {
            out.push(' ');
            expression.print(out, sep);
        }
    }
}

/// The body of a complex message.
#[derive(Debug, Clone, PartialEq)]
pub enum ComplexBody {
    QuotedPattern(QuotedPattern),
    Matcher(Matcher),
}

impl ComplexBody {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self {
            ComplexBody::QuotedPattern(p) => p.validate(),
            ComplexBody::Matcher(m) => m.validate(),
        }
    }

    fn print(&self, out: &mut String, sep: &str) {
        match self {
            ComplexBody::QuotedPattern(p) => p.print(out, sep),
            ComplexBody::Matcher(m) => m.print(out, sep),
        }
    }
}

/// A `{{…}}` pattern.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuotedPattern(pub Vec<PatternPart>);

impl QuotedPattern {
    fn validate(&self) -> Result<(), InvalidAst> {
        for part in &self.0 {
            part.validate().map_err(|e| e.at("quotedPattern"))?;
        }
        Ok(())
    }

    fn print(&self, out: &mut String, sep: &str) {
        out.push_str("{{");
        for part in &self.0 {
            part.print(out, sep);
        }
        out.push_str("}}");
    }
}

/// `.match` with its selector expressions and variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Matcher {
    pub selectors: Vec<Expression>,
    pub variants: Vec<Variant>,
}

impl Matcher {
    fn validate(&self) -> Result<(), InvalidAst> {
        if self.selectors.is_empty() {
            return Err(InvalidAst::new(
                "matcher",
                "at least one match statement is required",
            ));
        }
        if self.variants.is_empty() {
            return Err(InvalidAst::new(
                "matcher",
                "at least one variant is required",
            ));
        }
        for selector in &self.selectors {
            selector.validate().map_err(|e| e.at("matcher"))?;
        }
        for variant in &self.variants {
            variant.validate().map_err(|e| e.at("matcher"))?;
            if variant.keys.len() != self.selectors.len() {
                return Err(InvalidAst::new(
                    "matcher",
                    format!(
                        "variant has {} keys, expected {} to match the selector count",
                        variant.keys.len(),
                        self.selectors.len()
                    ),
                ));
            }
        }
        Ok(())
    }

    fn print(&self, out: &mut String, sep: &str) {
        out.push_str(".match");
        for selector in &self.selectors {
            out.push_str(sep);
            selector.print(out, sep);
        }
        for variant in &self.variants {
            out.push('\n');
            variant.print(out, sep);
        }
    }
}

/// One `keys {{pattern}}` arm of a matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub keys: Vec<VariantKey>,
    pub pattern: QuotedPattern,
}

impl Variant {
    fn validate(&self) -> Result<(), InvalidAst> {
        if self.keys.is_empty() {
            return Err(InvalidAst::new("variant", "at least one key is required"));
        }
        for key in &self.keys {
            key.validate().map_err(|e| e.at("variant"))?;
        }
        self.pattern.validate().map_err(|e| e.at("variant"))
    }

    fn print(&self, out: &mut String, sep: &str) {
        let mut first = true;
        for key in &self.keys {
            if !first {
                out.push(' ');
            }
            key.print(out);
            first = false;
        }
        out.push_str(sep);
        self.pattern.print(out, sep);
    }
}

/// A variant key: a literal, or `*` matching any selector result.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantKey {
    Literal(Literal),
    CatchAll,
}

impl VariantKey {
    fn validate(&self) -> Result<(), InvalidAst> {
        match self {
            VariantKey::Literal(l) => l.validate(),
            VariantKey::CatchAll => Ok(()),
        }
    }

    fn print(&self, out: &mut String) {
        match self {
            VariantKey::Literal(l) => l.print(out, " "),
            VariantKey::CatchAll => out.push('*'),
        }
    }
}

/// An optionally namespaced `name` or `namespace:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub namespace: Option<String>,
    pub name: String,
}

impl Identifier {
    /// Identifier without a namespace.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// The composite registry key: `name` or `namespace:name`.
    pub fn key(&self) -> String {
        let mut out = String::new();
        self.print(&mut out);
        out
    }

    fn validate(&self) -> Result<(), InvalidAst> {
        if self.name.is_empty() {
            return Err(InvalidAst::new("identifier", "name is empty"));
        }
        Ok(())
    }

    fn print(&self, out: &mut String) {
        if let Some(namespace) = &self.namespace {
            out.push_str(namespace);
            out.push(':');
        }
        out.push_str(&self.name);
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        self.print(&mut out);
        f.write_str(&out)
    }
}

/// A `name = value` option on a function annotation or markup.
#[derive(Debug, Clone, PartialEq)]
pub struct FnOption {
    pub identifier: Identifier,
    pub value: Operand,
}

impl FnOption {
    fn validate(&self) -> Result<(), InvalidAst> {
        self.identifier.validate().map_err(|e| e.at("option"))?;
        self.value.validate().map_err(|e| e.at("option"))
    }

    fn print(&self, out: &mut String, sep: &str) {
        self.identifier.print(out);
        out.push_str(sep);
        out.push('=');
        out.push_str(sep);
        self.value.print(out, sep);
    }
}

/// How a markup placeholder opens or closes its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    Open,
    Close,
    SelfClose,
}

/// A `{#name}`, `{/name}` or `{#name /}` markup placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    pub kind: MarkupKind,
    pub identifier: Identifier,
    pub options: Vec<FnOption>,
    pub attributes: Vec<Attribute>,
}

impl Markup {
    fn validate(&self) -> Result<(), InvalidAst> {
        self.identifier.validate().map_err(|e| e.at("markup"))?;
        if self.kind == MarkupKind::Close && !self.options.is_empty() {
            return Err(InvalidAst::new(
                "markup",
                "options are not allowed on markup-close",
            ));
        }
        for option in &self.options {
            option.validate().map_err(|e| e.at("markup"))?;
        }
        for attribute in &self.attributes {
            attribute.validate().map_err(|e| e.at("markup"))?;
        }
        Ok(())
    }

    fn print(&self, out: &mut String, sep: &str) {
        out.push('{');
        out.push_str(sep);
        out.push(if self.kind == MarkupKind::Close { '/' } else { '#' });
        self.identifier.print(out);
        for option in &self.options {
            out.push_str(sep);
            option.print(out, sep);
        }
        for attribute in &self.attributes {
            out.push_str(sep);
            attribute.print(out, sep);
        }
        out.push_str(sep);
        if self.kind == MarkupKind::SelfClose {
            out.push('/');
        }
        out.push('}');
    }
}

/// An `@name` or `@name = value` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub identifier: Identifier,
    pub value: Option<Operand>,
}

impl Attribute {
    fn validate(&self) -> Result<(), InvalidAst> {
        self.identifier.validate().map_err(|e| e.at("attribute"))?;
        if let Some(value) = &self.value {
            value.validate().map_err(|e| e.at("attribute"))?;
        }
        Ok(())
    }

    fn print(&self, out: &mut String, sep: &str) {
        out.push('@');
        self.identifier.print(out);
        if let Some(value) = &self.value {
            out.push_str(sep);
            out.push('=');
            out.push_str(sep);
            value.print(out, sep);
        }
    }
}

fn push_escaped(out: &mut String, text: &str, escaped: &[char]) {
    for c in text.chars() {
        if escaped.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}
