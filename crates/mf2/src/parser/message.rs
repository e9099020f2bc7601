//! MF2 message grammar using winnow.
//!
//! Single-pass recursive descent over the input string. Handles:
//! - Simple messages with text escapes `\\`, `\{`, `\}`
//! - Expressions with operands, annotations, options and attributes
//! - Markup placeholders (open, close, self-close)
//! - Declarations (`.input`, `.local`, reserved statements)
//! - Matchers with multi-dimensional variant keys including `*`

use winnow::combinator::{alt, cut_err, delimited, not, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{none_of, one_of, take_while};

use super::ast::*;

const WS: [char; 4] = [' ', '\t', '\r', '\n'];

/// Parse a complete message, dispatching on the simple/complex distinction.
///
/// A complex message begins, after optional whitespace, with a declaration
/// keyword or a quoted pattern; anything else is a simple message in which
/// leading whitespace is pattern text.
pub(super) fn message(input: &mut &str) -> ModalResult<Message> {
    let rest = input.trim_start_matches(&WS[..]);

    if rest.starts_with('.') || rest.starts_with("{{") {
        complex_message.parse_next(input).map(Message::Complex)
    } else {
        simple_message.parse_next(input).map(Message::Simple)
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

fn simple_message(input: &mut &str) -> ModalResult<SimpleMessage> {
    repeat(0.., pattern_part).parse_next(input).map(SimpleMessage)
}

fn pattern_part(input: &mut &str) -> ModalResult<PatternPart> {
    alt((
        text.map(PatternPart::Text),
        markup.map(PatternPart::Markup),
        expression.map(PatternPart::Expression),
    ))
    .parse_next(input)
}

fn text(input: &mut &str) -> ModalResult<String> {
    repeat(1.., text_char).parse_next(input)
}

fn text_char(input: &mut &str) -> ModalResult<char> {
    alt((
        preceded('\\', one_of(['\\', '{', '}'])),
        none_of(['\\', '{', '}']),
    ))
    .parse_next(input)
}

fn quoted_pattern(input: &mut &str) -> ModalResult<QuotedPattern> {
    delimited(
        "{{",
        repeat(0.., pattern_part),
        cut_err("}}").context(StrContext::Expected(StrContextValue::StringLiteral("}}"))),
    )
    .map(QuotedPattern)
    .parse_next(input)
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

fn expression(input: &mut &str) -> ModalResult<Expression> {
    // A quoted pattern is never an expression.
    not("{{").parse_next(input)?;
    '{'.parse_next(input)?;
    ows(input)?;

    let operand = opt(operand).parse_next(input)?;

    // Operand and annotation are separated by required whitespace.
    let annotation = if operand.is_some() {
        opt(preceded(ws, annotation)).parse_next(input)?
    } else {
        opt(annotation).parse_next(input)?
    };

    let attributes = attributes(input)?;
    ows(input)?;
    cut_err('}')
        .context(StrContext::Label("expression"))
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;

    Ok(Expression {
        operand,
        annotation,
        attributes,
    })
}

fn operand(input: &mut &str) -> ModalResult<Operand> {
    alt((
        variable.map(Operand::Variable),
        literal.map(Operand::Literal),
    ))
    .parse_next(input)
}

fn variable(input: &mut &str) -> ModalResult<Variable> {
    preceded(
        '$',
        cut_err(name).context(StrContext::Expected(StrContextValue::Description(
            "variable name",
        ))),
    )
    .map(Variable)
    .parse_next(input)
}

fn literal(input: &mut &str) -> ModalResult<Literal> {
    alt((
        quoted.map(Literal::Quoted),
        number_literal,
        name.map(Literal::Name),
    ))
    .parse_next(input)
}

/// A `|…|` quoted string with `\\` and `\|` escapes.
fn quoted(input: &mut &str) -> ModalResult<String> {
    delimited(
        '|',
        repeat(0.., quoted_char),
        cut_err('|').context(StrContext::Expected(StrContextValue::CharLiteral('|'))),
    )
    .parse_next(input)
}

fn quoted_char(input: &mut &str) -> ModalResult<char> {
    alt((preceded('\\', one_of(['\\', '|'])), none_of(['\\', '|']))).parse_next(input)
}

/// A number literal matching the JSON number grammar.
fn number_literal(input: &mut &str) -> ModalResult<Literal> {
    let digits = (
        opt('-'),
        alt(("0".void(), (one_of('1'..='9'), take_while(0.., '0'..='9')).void())),
        opt(('.', take_while(1.., '0'..='9')).void()),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), take_while(1.., '0'..='9')).void()),
    )
        .take()
        .parse_next(input)?;

    // "1x" is neither a number nor a name.
    if input.chars().next().is_some_and(is_name_char) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }

    let number = digits
        .parse()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))?;

    Ok(Literal::Number(number))
}

fn name(input: &mut &str) -> ModalResult<String> {
    (one_of(is_name_start), take_while(0.., is_name_char))
        .take()
        .map(str::to_string)
        .parse_next(input)
}

fn identifier(input: &mut &str) -> ModalResult<Identifier> {
    (name, opt(preceded(':', name)))
        .map(|(first, second)| match second {
            Some(name) => Identifier {
                namespace: Some(first),
                name,
            },
            None => Identifier {
                namespace: None,
                name: first,
            },
        })
        .parse_next(input)
}

// name-start and name-char per the MF2 ABNF (XML NCName shaped).

pub(crate) fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c == '_'
        || matches!(c as u32,
            0xC0..=0xD6
                | 0xD8..=0xF6
                | 0xF8..=0x2FF
                | 0x370..=0x37D
                | 0x37F..=0x1FFF
                | 0x200C..=0x200D
                | 0x2070..=0x218F
                | 0x2C00..=0x2FEF
                | 0x3001..=0xD7FF
                | 0xF900..=0xFDCF
                | 0xFDF0..=0xFFFD
                | 0x10000..=0xEFFFF)
}

pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || c.is_ascii_digit()
        || c == '-'
        || c == '.'
        || matches!(c as u32, 0xB7 | 0x300..=0x36F | 0x203F..=0x2040)
}

// ---------------------------------------------------------------------------
// Annotations
// ---------------------------------------------------------------------------

fn annotation(input: &mut &str) -> ModalResult<Annotation> {
    alt((
        function.map(Annotation::Function),
        private_use.map(Annotation::PrivateUse),
        reserved_annotation.map(Annotation::Reserved),
    ))
    .parse_next(input)
}

fn function(input: &mut &str) -> ModalResult<Function> {
    preceded(':', (identifier, fn_options))
        .map(|(identifier, options)| Function {
            identifier,
            options,
        })
        .parse_next(input)
}

fn fn_options(input: &mut &str) -> ModalResult<Vec<FnOption>> {
    repeat(0.., preceded(ws, fn_option)).parse_next(input)
}

fn fn_option(input: &mut &str) -> ModalResult<FnOption> {
    (terminated(identifier, (ows, '=', ows)), operand)
        .map(|(identifier, value)| FnOption { identifier, value })
        .parse_next(input)
}

fn private_use(input: &mut &str) -> ModalResult<PrivateUseAnnotation> {
    (one_of(|c: char| PRIVATE_USE_START.contains(&c)), reserved_body)
        .map(|(start, body)| PrivateUseAnnotation { start, body })
        .parse_next(input)
}

fn reserved_annotation(input: &mut &str) -> ModalResult<ReservedAnnotation> {
    let start = one_of(|c: char| RESERVED_START.contains(&c)).parse_next(input)?;

    // `@name` in annotation position is an attribute, not a reserved annotation.
    if start == '@' && input.chars().next().is_some_and(is_name_start) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }

    let body = reserved_body(input)?;
    Ok(ReservedAnnotation { start, body })
}

fn reserved_body(input: &mut &str) -> ModalResult<Vec<ReservedBody>> {
    repeat(0.., preceded(ows, reserved_body_part)).parse_next(input)
}

fn reserved_body_part(input: &mut &str) -> ModalResult<ReservedBody> {
    alt((
        quoted.map(ReservedBody::Quoted),
        reserved_text.map(ReservedBody::Text),
    ))
    .parse_next(input)
}

fn reserved_text(input: &mut &str) -> ModalResult<String> {
    repeat(1.., reserved_char).parse_next(input)
}

fn reserved_char(input: &mut &str) -> ModalResult<char> {
    alt((
        preceded('\\', one_of(['\\', '{', '}', '|'])),
        none_of(|c: char| {
            matches!(c, '\\' | '{' | '}' | '|' | '@' | ' ' | '\t' | '\r' | '\n')
        }),
    ))
    .parse_next(input)
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

fn attributes(input: &mut &str) -> ModalResult<Vec<Attribute>> {
    repeat(0.., preceded(ws, attribute)).parse_next(input)
}

fn attribute(input: &mut &str) -> ModalResult<Attribute> {
    preceded(
        '@',
        (identifier, opt(preceded((ows, '=', ows), operand))),
    )
    .map(|(identifier, value)| Attribute { identifier, value })
    .parse_next(input)
}

// ---------------------------------------------------------------------------
// Markup
// ---------------------------------------------------------------------------

fn markup(input: &mut &str) -> ModalResult<Markup> {
    not("{{").parse_next(input)?;
    '{'.parse_next(input)?;
    ows(input)?;
    let sigil = one_of(['#', '/']).parse_next(input)?;
    let identifier = identifier(input)?;

    let options = if sigil == '#' {
        fn_options(input)?
    } else {
        Vec::new()
    };
    let attributes = attributes(input)?;
    ows(input)?;
    let self_close = opt('/').parse_next(input)?.is_some();
    '}'.parse_next(input)?;

    let kind = match (sigil, self_close) {
        ('#', false) => MarkupKind::Open,
        ('#', true) => MarkupKind::SelfClose,
        ('/', false) => MarkupKind::Close,
        _ => return Err(ErrMode::Backtrack(ContextError::new())),
    };

    Ok(Markup {
        kind,
        identifier,
        options,
        attributes,
    })
}

// ---------------------------------------------------------------------------
// Complex messages
// ---------------------------------------------------------------------------

fn complex_message(input: &mut &str) -> ModalResult<ComplexMessage> {
    let declarations = repeat(0.., preceded(ows, declaration)).parse_next(input)?;
    let body = preceded(ows, complex_body).parse_next(input)?;
    ows(input)?;
    Ok(ComplexMessage { declarations, body })
}

fn complex_body(input: &mut &str) -> ModalResult<ComplexBody> {
    alt((
        matcher.map(ComplexBody::Matcher),
        quoted_pattern.map(ComplexBody::QuotedPattern),
    ))
    .parse_next(input)
}

fn declaration(input: &mut &str) -> ModalResult<Declaration> {
    alt((input_declaration, local_declaration, reserved_statement)).parse_next(input)
}

fn input_declaration(input: &mut &str) -> ModalResult<Declaration> {
    preceded((".input", ows), expression)
        .map(|expression| Declaration::Input(InputDeclaration { expression }))
        .parse_next(input)
}

fn local_declaration(input: &mut &str) -> ModalResult<Declaration> {
    preceded(
        (".local", ws),
        (variable, delimited(ows, '=', ows), expression),
    )
    .map(|(variable, _, expression)| {
        Declaration::Local(LocalDeclaration {
            variable,
            expression,
        })
    })
    .parse_next(input)
}

fn reserved_statement(input: &mut &str) -> ModalResult<Declaration> {
    let keyword = preceded('.', name).parse_next(input)?;

    // `.match`, `.local` and `.input` are real keywords, not reserved ones.
    if matches!(keyword.as_str(), "match" | "local" | "input") {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }

    let body = reserved_body(input)?;
    let expressions = repeat(1.., preceded(ows, expression)).parse_next(input)?;

    Ok(Declaration::Reserved(ReservedStatement {
        keyword,
        body,
        expressions,
    }))
}

fn matcher(input: &mut &str) -> ModalResult<Matcher> {
    ".match".parse_next(input)?;
    let selectors = repeat(1.., preceded(ows, expression)).parse_next(input)?;
    let variants = repeat(1.., preceded(ows, variant)).parse_next(input)?;
    Ok(Matcher {
        selectors,
        variants,
    })
}

fn variant(input: &mut &str) -> ModalResult<Variant> {
    let keys = repeat(1.., terminated(variant_key, ows)).parse_next(input)?;
    let pattern = quoted_pattern(input)?;
    Ok(Variant { keys, pattern })
}

fn variant_key(input: &mut &str) -> ModalResult<VariantKey> {
    alt(('*'.value(VariantKey::CatchAll), literal.map(VariantKey::Literal))).parse_next(input)
}

// ---------------------------------------------------------------------------
// Whitespace
// ---------------------------------------------------------------------------

/// Required whitespace.
fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(1.., WS).void().parse_next(input)
}

/// Optional whitespace.
fn ows(input: &mut &str) -> ModalResult<()> {
    take_while(0.., WS).void().parse_next(input)
}
