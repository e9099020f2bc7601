//! Formatting tests for the builtin `number` and `integer` functions.

use icu_locale_core::{Locale, locale};
use mf2::{RenderError, Template, args, parse};
use test_case::test_case;

fn format(message: &str, locale: Locale) -> String {
    let template = Template::builder()
        .ast(parse(message).unwrap())
        .locale(locale)
        .build();
    let (text, errors) = template.render(&args! {});
    assert!(errors.is_empty(), "unexpected errors for {message}: {errors:?}");
    text
}

// =============================================================================
// Decimal style
// =============================================================================

#[test_case("{ -0.1234 :number }", "-0,123"; "negative")]
#[test_case("{ 0 :number }", "0"; "zero")]
#[test_case("{ 0.1234 :number }", "0,123"; "positive")]
#[test_case("{ |0.1| :number }", "0,1"; "literal operand")]
fn decimal_latvian(message: &str, want: &str) {
    assert_eq!(format(message, locale!("lv-LV")), want);
}

#[test_case("{ -0.15 :number signDisplay=auto }", "-0.15"; "auto negative")]
#[test_case("{ 0 :number signDisplay=auto }", "0"; "auto zero")]
#[test_case("{ 0.15 :number signDisplay=auto }", "0.15"; "auto positive")]
#[test_case("{ -0.15 :number signDisplay=always }", "-0.15"; "always negative")]
#[test_case("{ 0 :number signDisplay=always }", "+0"; "always zero")]
#[test_case("{ 0.15 :number signDisplay=always }", "+0.15"; "always positive")]
#[test_case("{ -0.15 :number signDisplay=exceptZero }", "-0.15"; "exceptzero negative")]
#[test_case("{ 0 :number signDisplay=exceptZero }", "0"; "exceptzero zero")]
#[test_case("{ 0.15 :number signDisplay=exceptZero }", "+0.15"; "exceptzero positive")]
#[test_case("{ -0.15 :number signDisplay=never }", "0.15"; "never negative")]
#[test_case("{ 0 :number signDisplay=never }", "0"; "never zero")]
#[test_case("{ 0.15 :number signDisplay=never }", "0.15"; "never positive")]
fn sign_display(message: &str, want: &str) {
    assert_eq!(format(message, locale!("en-US")), want);
}

#[test_case("{ 0 :number minimumFractionDigits=2 }", "0.00"; "minimum fraction digits")]
#[test_case("{ 0.15 :number maximumFractionDigits=1 }", "0.2"; "maximum fraction digits")]
#[test_case("{ 0.15 :number maximumFractionDigits=|1| }", "0.2"; "maximum fraction digits literal")]
#[test_case("{ 1 :number minimumIntegerDigits=3 }", "001"; "minimum integer digits")]
#[test_case("{ 1.23 :number maximumSignificantDigits=2 }", "1.2"; "maximum significant digits")]
#[test_case("{ 1.2 :number minimumSignificantDigits=3 }", "1.20"; "minimum significant digits")]
fn digit_bounds(message: &str, want: &str) {
    assert_eq!(format(message, locale!("en-US")), want);
}

#[test_case("{ 1234.5 :number }", "1,234.5")]
#[test_case("{ 1234.5 :number useGrouping=never }", "1234.5")]
fn grouping(message: &str, want: &str) {
    assert_eq!(format(message, locale!("en-US")), want);
}

// =============================================================================
// Percent style
// =============================================================================

#[test_case("{ -0.127 :number style=percent }", "-13%"; "negative")]
#[test_case("{ 0 :number style=percent }", "0%"; "zero")]
#[test_case("{ 0.127 :number style=percent }", "13%"; "positive")]
fn percent_latvian(message: &str, want: &str) {
    assert_eq!(format(message, locale!("lv-LV")), want);
}

#[test_case("{ 0 :number style=percent signDisplay=always }", "+0%"; "always zero")]
#[test_case("{ 0.127 :number style=percent signDisplay=always }", "+13%"; "always positive")]
#[test_case("{ -0.127 :number style=percent signDisplay=always }", "-13%"; "always negative")]
#[test_case("{ 0.127 :number style=percent signDisplay=exceptZero }", "+13%"; "exceptzero positive")]
#[test_case("{ -0.127 :number style=percent signDisplay=never }", "13%"; "never negative")]
#[test_case("{ 0 :number style=percent minimumFractionDigits=2 }", "0.00%"; "minimum fraction digits")]
#[test_case("{ 0.01 :number style=percent minimumIntegerDigits=3 }", "001%"; "minimum integer digits")]
#[test_case(
    "{ 0.12345 :number style=percent maximumFractionDigits=5 maximumSignificantDigits=4 }",
    "12.34%";
    "maximum fraction and significant digits"
)]
fn percent_american_english(message: &str, want: &str) {
    assert_eq!(format(message, locale!("en-US")), want);
}

#[test]
fn percent_max_fraction_digits_latvian() {
    assert_eq!(
        format("{ 0.1275 :number style=percent maximumFractionDigits=1 }", locale!("lv-LV")),
        "12,8%"
    );
}

// =============================================================================
// Integer
// =============================================================================

#[test_case("{ 3.9 :integer }", "4")]
#[test_case("{ 1234.5 :integer useGrouping=never }", "1234")]
#[test_case("{ 5 :integer minimumIntegerDigits=2 }", "05")]
fn integer(message: &str, want: &str) {
    assert_eq!(format(message, locale!("en-US")), want);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn non_numeric_operand_is_an_operand_mismatch() {
    let (text, errors) = Template::parse("{ abc :number }").unwrap().render(&args! {});
    assert_eq!(text, "");
    assert!(matches!(errors.as_slice(), [RenderError::OperandMismatch(_)]));
}

#[test]
fn missing_operand_is_an_operand_mismatch() {
    let (_, errors) = Template::parse("{ :number }").unwrap().render(&args! {});
    assert!(matches!(errors.as_slice(), [RenderError::OperandMismatch(_)]));
}

#[test]
fn invalid_style_value_is_an_unsupported_option() {
    let (_, errors) = Template::parse("{ 1 :number style=scientific }")
        .unwrap()
        .render(&args! {});
    assert!(matches!(errors.as_slice(), [RenderError::UnsupportedOption(_)]));
}
