//! Shared helpers for parser round-trip assertions.

/// Assert the round-trip law: re-parsing the canonical printed form yields a
/// structurally equal tree, and the printed text differs from the input only
/// in whitespace.
pub fn assert_roundtrip(input: &str) {
    let ast = mf2::parse(input).unwrap_or_else(|e| panic!("parse '{input}': {e}"));

    let printed = ast.to_string();
    let reparsed = mf2::parse(&printed).unwrap_or_else(|e| panic!("reparse '{printed}': {e}"));
    assert_eq!(ast, reparsed, "reparse of printed form differs: {printed}");

    if printed != input {
        assert_eq!(
            normalized(input),
            normalized(&printed),
            "printed form differs beyond whitespace: {printed}"
        );
    }
}

fn normalized(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
        .collect()
}
