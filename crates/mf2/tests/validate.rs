//! Negative AST validation tests. Positive cases are covered by the parse
//! tests, which validate every tree they build.

use mf2::parser::ast::{
    Annotation, Ast, ComplexBody, ComplexMessage, Declaration, Expression, Function, Identifier,
    InputDeclaration, Literal, LocalDeclaration, Matcher, Message, Operand, PatternPart,
    PrivateUseAnnotation, QuotedPattern, ReservedBody, ReservedStatement, SimpleMessage, Variable,
    Variant, VariantKey,
};

fn assert_invalid(ast: Ast, path_fragment: &str) {
    let err = ast.validate().unwrap_err();
    assert!(
        err.path.contains(path_fragment),
        "path '{}' does not contain '{path_fragment}' ({err})",
        err.path
    );
}

fn quoted_pattern_body(text: &str) -> ComplexBody {
    ComplexBody::QuotedPattern(QuotedPattern(vec![PatternPart::Text(text.to_string())]))
}

#[test]
fn empty_variable_name() {
    assert_invalid(
        Ast {
            message: Message::Simple(SimpleMessage(vec![
                PatternPart::Text("Hello, ".to_string()),
                PatternPart::Expression(Expression {
                    operand: Some(Operand::Variable(Variable(String::new()))),
                    annotation: None,
                    attributes: vec![],
                }),
            ])),
        },
        "expression.variable",
    );
}

#[test]
fn empty_function_name() {
    assert_invalid(
        Ast {
            message: Message::Simple(SimpleMessage(vec![PatternPart::Expression(Expression {
                operand: Some(Operand::Variable(Variable("variable".to_string()))),
                annotation: Some(Annotation::Function(Function {
                    identifier: Identifier::name(""),
                    options: vec![],
                })),
                attributes: vec![],
            })])),
        },
        "function.identifier",
    );
}

#[test]
fn expression_without_operand_or_annotation() {
    assert_invalid(
        Ast {
            message: Message::Simple(SimpleMessage(vec![
                PatternPart::Text("Hello, ".to_string()),
                PatternPart::Expression(Expression::default()),
            ])),
        },
        "simpleMessage.expression",
    );
}

#[test]
fn input_declaration_with_empty_variable() {
    assert_invalid(
        Ast {
            message: Message::Complex(ComplexMessage {
                declarations: vec![Declaration::Input(InputDeclaration {
                    expression: Expression {
                        operand: Some(Operand::Variable(Variable(String::new()))),
                        annotation: None,
                        attributes: vec![],
                    },
                })],
                body: quoted_pattern_body("Hello, World!"),
            }),
        },
        "inputDeclaration.expression",
    );
}

#[test]
fn input_declaration_with_literal_operand() {
    assert_invalid(
        Ast {
            message: Message::Complex(ComplexMessage {
                declarations: vec![Declaration::Input(InputDeclaration {
                    expression: Expression {
                        operand: Some(Operand::Literal(Literal::Name("nope".to_string()))),
                        annotation: None,
                        attributes: vec![],
                    },
                })],
                body: quoted_pattern_body("Hello, World!"),
            }),
        },
        "inputDeclaration",
    );
}

#[test]
fn local_declaration_with_empty_expression() {
    assert_invalid(
        Ast {
            message: Message::Complex(ComplexMessage {
                declarations: vec![Declaration::Local(LocalDeclaration {
                    variable: Variable("var".to_string()),
                    expression: Expression::default(),
                })],
                body: quoted_pattern_body("Hello, World!"),
            }),
        },
        "complexMessage.localDeclaration",
    );
}

#[test]
fn matcher_without_selectors() {
    assert_invalid(
        Ast {
            message: Message::Complex(ComplexMessage {
                declarations: vec![],
                body: ComplexBody::Matcher(Matcher {
                    selectors: vec![],
                    variants: vec![Variant {
                        keys: vec![VariantKey::Literal(Literal::Number(1.0))],
                        pattern: QuotedPattern(vec![]),
                    }],
                }),
            }),
        },
        "complexMessage.matcher",
    );
}

#[test]
fn matcher_without_variants() {
    assert_invalid(
        Ast {
            message: Message::Complex(ComplexMessage {
                declarations: vec![],
                body: ComplexBody::Matcher(Matcher {
                    selectors: vec![Expression {
                        operand: Some(Operand::Variable(Variable("variable".to_string()))),
                        annotation: None,
                        attributes: vec![],
                    }],
                    variants: vec![],
                }),
            }),
        },
        "complexMessage.matcher",
    );
}

#[test]
fn variant_without_keys() {
    assert_invalid(
        Ast {
            message: Message::Complex(ComplexMessage {
                declarations: vec![],
                body: ComplexBody::Matcher(Matcher {
                    selectors: vec![Expression {
                        operand: Some(Operand::Variable(Variable("variable".to_string()))),
                        annotation: None,
                        attributes: vec![],
                    }],
                    variants: vec![Variant {
                        keys: vec![],
                        pattern: QuotedPattern(vec![]),
                    }],
                }),
            }),
        },
        "matcher.variant",
    );
}

#[test]
fn variant_key_arity_mismatch() {
    assert_invalid(
        Ast {
            message: Message::Complex(ComplexMessage {
                declarations: vec![],
                body: ComplexBody::Matcher(Matcher {
                    selectors: vec![
                        Expression {
                            operand: Some(Operand::Variable(Variable("a".to_string()))),
                            annotation: None,
                            attributes: vec![],
                        },
                        Expression {
                            operand: Some(Operand::Variable(Variable("b".to_string()))),
                            annotation: None,
                            attributes: vec![],
                        },
                    ],
                    variants: vec![Variant {
                        keys: vec![VariantKey::CatchAll],
                        pattern: QuotedPattern(vec![]),
                    }],
                }),
            }),
        },
        "matcher",
    );
}

#[test]
fn nan_number_literal() {
    assert_invalid(
        Ast {
            message: Message::Simple(SimpleMessage(vec![PatternPart::Expression(Expression {
                operand: Some(Operand::Literal(Literal::Number(f64::NAN))),
                annotation: None,
                attributes: vec![],
            })])),
        },
        "numberLiteral",
    );
}

#[test]
fn invalid_private_use_sigil() {
    assert_invalid(
        Ast {
            message: Message::Simple(SimpleMessage(vec![PatternPart::Expression(Expression {
                operand: None,
                annotation: Some(Annotation::PrivateUse(PrivateUseAnnotation {
                    start: '!',
                    body: vec![ReservedBody::Text("body".to_string())],
                })),
                attributes: vec![],
            })])),
        },
        "privateUseAnnotation",
    );
}

#[test]
fn reserved_statement_with_grammar_keyword() {
    assert_invalid(
        Ast {
            message: Message::Complex(ComplexMessage {
                declarations: vec![Declaration::Reserved(ReservedStatement {
                    keyword: "match".to_string(),
                    body: vec![],
                    expressions: vec![Expression {
                        operand: Some(Operand::Variable(Variable("x".to_string()))),
                        annotation: None,
                        attributes: vec![],
                    }],
                })],
                body: quoted_pattern_body("x"),
            }),
        },
        "reservedStatement",
    );
}

#[test]
fn reserved_statement_without_expressions() {
    assert_invalid(
        Ast {
            message: Message::Complex(ComplexMessage {
                declarations: vec![Declaration::Reserved(ReservedStatement {
                    keyword: "future".to_string(),
                    body: vec![ReservedBody::Text("body".to_string())],
                    expressions: vec![],
                })],
                body: quoted_pattern_body("x"),
            }),
        },
        "reservedStatement",
    );
}
