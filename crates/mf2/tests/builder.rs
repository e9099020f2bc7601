//! Tests for the fluent message builder.

use mf2::builder::{Builder, func, literal, option, var};
use mf2::parse;

fn built(builder: &Builder, want: &str) {
    assert_eq!(builder.to_text().unwrap(), want);

    // Builder law: the emitted text parses, validates, and parses back to
    // the tree the builder assembled.
    let ast = builder.must_build();
    assert!(ast.validate().is_ok());
    assert_eq!(parse(&ast.to_string()).unwrap(), ast);
}

// =============================================================================
// Simple messages
// =============================================================================

#[test]
fn empty_text() {
    built(&Builder::new().text(""), "");
}

#[test]
fn simple_text() {
    built(&Builder::new().text("Hello, World!"), "Hello, World!");
}

#[test]
fn text_starting_with_whitespace_stays_simple() {
    built(&Builder::new().text(" hello"), " hello");
}

#[test]
fn special_characters_are_escaped() {
    built(
        &Builder::new().text("{Hello}\\, {World}!"),
        "\\{Hello\\}\\\\, \\{World\\}!",
    );
}

#[test]
fn adjacent_text_merges() {
    built(&Builder::new().text("Hello, ").text("World!"), "Hello, World!");
}

#[test]
fn text_with_literal_expression() {
    built(
        &Builder::new().text("Hello, ").expr(literal("World")).text("!"),
        "Hello, { World }!",
    );
}

#[test]
fn expression_with_function_and_options() {
    built(
        &Builder::new()
            .text("Hello, ")
            .expr(var("$world").func(
                ":upper",
                [
                    option("limit", 2),
                    option("min", "$min"),
                    option("type", "integer"),
                ],
            ))
            .text("!"),
        "Hello, { $world :upper limit = 2 min = $min type = integer }!",
    );
}

#[test]
fn annotation_only_expression() {
    built(
        &Builder::new().text("total: ").expr(func("number", [])),
        "total: { :number }",
    );
}

// =============================================================================
// Promotion to complex form
// =============================================================================

#[test]
fn period_text_is_promoted() {
    built(&Builder::new().text("."), "{{.}}");
}

#[test]
fn declaration_like_text_is_promoted() {
    built(&Builder::new().text(".ok"), "{{.ok}}");
}

// =============================================================================
// Declarations
// =============================================================================

#[test]
fn local_declaration_without_pattern() {
    built(
        &Builder::new().local("$var", literal("greeting")),
        ".local $var = { greeting }\n{{}}",
    );
}

#[test]
fn local_declaration_with_pattern() {
    built(
        &Builder::new()
            .local("$hostName", var("$host"))
            .expr(var("$hostName")),
        ".local $hostName = { $host }\n{{{ $hostName }}}",
    );
}

#[test]
fn input_declaration() {
    built(
        &Builder::new().input(var("$host")).expr(var("$host")),
        ".input { $host }\n{{{ $host }}}",
    );
}

#[test]
fn input_declarations_group_before_locals() {
    // Declared local-first, but `.input` still comes out ahead of `.local`.
    built(
        &Builder::new()
            .local("$hostName", var("$host"))
            .input(var("$host"))
            .expr(var("$host")),
        ".input { $host }\n.local $hostName = { $host }\n{{{ $host }}}",
    );
}

// =============================================================================
// Matchers
// =============================================================================

fn matcher_builder() -> Builder {
    Builder::new()
        .match_([var("$i"), var("$j")])
        .keys([1, 2])
        .text("{first}")
        .keys([2, 0])
        .text("second ")
        .expr(var("$i"))
        .keys([3, 0])
        .expr(literal("\\a|"))
        .keys(["*", "*"])
        .expr(literal(1))
}

#[test]
fn matcher_with_multiple_keys() {
    built(
        &matcher_builder(),
        ".match { $i } { $j }\n1 2 {{\\{first\\}}}\n2 0 {{second { $i }}}\n3 0 {{{ |\\\\a\\|| }}}\n* * {{{ 1 }}}",
    );
}

#[test]
fn matcher_with_declarations() {
    built(
        &Builder::new()
            .input(var("$i"))
            .local("$hostName", var("$i"))
            .match_([var("$i"), var("$j")])
            .keys([1, 2])
            .text("{first}")
            .keys(["*", "*"])
            .expr(literal(1)),
        ".input { $i }\n.local $hostName = { $i }\n.match { $i } { $j }\n1 2 {{\\{first\\}}}\n* * {{{ 1 }}}",
    );
}

#[test]
fn compact_spacing() {
    assert_eq!(
        matcher_builder().spacing("").to_text().unwrap(),
        ".match{$i}{$j}\n1 2{{\\{first\\}}}\n2 0{{second {$i}}}\n3 0{{{|\\\\a\\||}}}\n* *{{{1}}}",
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn keys_without_match_is_an_error() {
    assert!(Builder::new().keys([1]).text("x").build().is_err());
}

#[test]
fn match_without_variants_is_an_error() {
    assert!(Builder::new().match_([var("$n")]).build().is_err());
}

#[test]
fn key_arity_mismatch_is_an_error() {
    assert!(
        Builder::new()
            .match_([var("$a"), var("$b")])
            .keys([1])
            .text("x")
            .build()
            .is_err()
    );
}

#[test]
#[should_panic(expected = "build mf2 message")]
fn must_build_panics_on_error() {
    Builder::new().keys([1]).must_build();
}
