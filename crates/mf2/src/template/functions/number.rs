//! The `number` and `integer` functions: locale-sensitive decimal and
//! percent formatting, and plural-aware selection.

use fixed_decimal::{Decimal, FloatPrecision, SignDisplay, SignedRoundingMode, UnsignedRoundingMode};
use icu_decimal::DecimalFormatter;
use icu_decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralOperands, PluralRuleType, PluralRules};

use crate::template::registry::{FuncError, Options};
use crate::types::Value;

const OPTIONS: &[&str] = &[
    "style",
    "signDisplay",
    "minimumIntegerDigits",
    "minimumFractionDigits",
    "maximumFractionDigits",
    "minimumSignificantDigits",
    "maximumSignificantDigits",
    "useGrouping",
    "select",
];

pub(super) fn format(
    operand: Option<&Value>,
    options: &Options,
    locale: &Locale,
) -> Result<String, FuncError> {
    let opts = NumberOptions::parse(options)?;
    let value = parse_operand(operand)?;
    format_value(value, &opts, locale)
}

pub(super) fn matcher(
    operand: Option<&Value>,
    options: &Options,
    locale: &Locale,
) -> Result<Vec<String>, FuncError> {
    let opts = NumberOptions::parse(options)?;
    let value = parse_operand(operand)?;
    select_keys(value, &opts, locale)
}

/// `integer` is `number` with the fraction digits forced to zero.
pub(super) fn format_integer(
    operand: Option<&Value>,
    options: &Options,
    locale: &Locale,
) -> Result<String, FuncError> {
    format(operand, &options.clone().with("maximumFractionDigits", 0), locale)
}

pub(super) fn match_integer(
    operand: Option<&Value>,
    options: &Options,
    locale: &Locale,
) -> Result<Vec<String>, FuncError> {
    matcher(operand, &options.clone().with("maximumFractionDigits", 0), locale)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Decimal,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Select {
    Plural,
    Ordinal,
    Exact,
}

struct NumberOptions {
    style: Style,
    sign_display: SignDisplay,
    use_grouping: GroupingStrategy,
    select: Select,
    minimum_integer_digits: usize,
    minimum_fraction_digits: usize,
    maximum_fraction_digits: Option<usize>,
    minimum_significant_digits: Option<usize>,
    maximum_significant_digits: Option<usize>,
}

impl NumberOptions {
    fn parse(options: &Options) -> Result<Self, FuncError> {
        options.ensure_allowed(OPTIONS)?;

        let style = match options
            .get_string("style", "decimal", &["decimal", "percent"])?
            .as_str()
        {
            "percent" => Style::Percent,
            _ => Style::Decimal,
        };

        let sign_display = match options
            .get_string(
                "signDisplay",
                "auto",
                &["auto", "always", "exceptZero", "negative", "never"],
            )?
            .as_str()
        {
            "always" => SignDisplay::Always,
            "exceptZero" => SignDisplay::ExceptZero,
            "negative" => SignDisplay::Negative,
            "never" => SignDisplay::Never,
            _ => SignDisplay::Auto,
        };

        let use_grouping = match options
            .get_string("useGrouping", "auto", &["auto", "always", "never", "min2"])?
            .as_str()
        {
            "always" => GroupingStrategy::Always,
            "never" => GroupingStrategy::Never,
            "min2" => GroupingStrategy::Min2,
            _ => GroupingStrategy::Auto,
        };

        let select = match options
            .get_string("select", "plural", &["plural", "ordinal", "exact"])?
            .as_str()
        {
            "ordinal" => Select::Ordinal,
            "exact" => Select::Exact,
            _ => Select::Plural,
        };

        let optional = |name: &str| -> Result<Option<usize>, FuncError> {
            match options.get(name) {
                Some(_) => Ok(Some(options.get_usize(name, 0)?)),
                None => Ok(None),
            }
        };

        Ok(Self {
            style,
            sign_display,
            use_grouping,
            select,
            minimum_integer_digits: options.get_usize("minimumIntegerDigits", 1)?,
            minimum_fraction_digits: options.get_usize("minimumFractionDigits", 0)?,
            maximum_fraction_digits: optional("maximumFractionDigits")?,
            minimum_significant_digits: optional("minimumSignificantDigits")?,
            maximum_significant_digits: optional("maximumSignificantDigits")?,
        })
    }

    /// The default maximum fraction digits: 3 for decimal, 0 for percent.
    fn max_fraction_digits(&self) -> usize {
        self.maximum_fraction_digits
            .unwrap_or(match self.style {
                Style::Decimal => 3,
                Style::Percent => 0,
            })
    }
}

fn parse_operand(operand: Option<&Value>) -> Result<f64, FuncError> {
    match operand {
        None => Err(FuncError::OperandMismatch(
            "number function requires an operand".to_string(),
        )),
        Some(Value::Number(n)) => Ok(*n),
        Some(Value::String(s)) => s.parse().map_err(|_| {
            FuncError::OperandMismatch(format!("unsupported operand '{s}'"))
        }),
        Some(value) => Err(FuncError::OperandMismatch(format!(
            "unsupported operand type for '{value}'"
        ))),
    }
}

fn format_value(value: f64, opts: &NumberOptions, locale: &Locale) -> Result<String, FuncError> {
    let mut dec = to_decimal(value)?;

    if opts.style == Style::Percent {
        dec.multiply_pow10(2);
    }

    if let Some(max) = opts.maximum_significant_digits
        && max > 0
    {
        let position = dec.nonzero_magnitude_start() - digits_i16(max) + 1;
        dec.round_with_mode(position, SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfEven));
    }

    dec.round_with_mode(
        -digits_i16(opts.max_fraction_digits()),
        SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfEven),
    );
    dec.pad_end(-digits_i16(opts.minimum_fraction_digits));

    if let Some(min) = opts.minimum_significant_digits
        && min > 0
    {
        let position = dec.nonzero_magnitude_start() - digits_i16(min) + 1;
        dec.pad_end(position.min(0));
    }

    dec.pad_start(digits_i16(opts.minimum_integer_digits));
    dec.apply_sign_display(opts.sign_display);

    let mut formatter_options = DecimalFormatterOptions::default();
    formatter_options.grouping_strategy = Some(opts.use_grouping);

    let formatter = DecimalFormatter::try_new(locale.clone().into(), formatter_options)
        .map_err(|e| FuncError::Formatting(format!("no decimal data for locale: {e}")))?;

    let mut formatted = formatter.format_to_string(&dec);
    if opts.style == Style::Percent {
        formatted.push('%');
    }

    Ok(formatted)
}

/// The keys a `number` selector accepts: the exact digit string first, then
/// the CLDR plural or ordinal category unless `select = exact`.
fn select_keys(value: f64, opts: &NumberOptions, locale: &Locale) -> Result<Vec<String>, FuncError> {
    let mut dec = to_decimal(value)?;
    if let Some(max) = opts.maximum_fraction_digits {
        dec.round_with_mode(-digits_i16(max), SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfEven));
    }

    let exact = dec.to_string();
    let mut keys = vec![exact.clone()];

    let rule_type = match opts.select {
        Select::Exact => return Ok(keys),
        Select::Plural => PluralRuleType::Cardinal,
        Select::Ordinal => PluralRuleType::Ordinal,
    };

    keys.push(plural_category(locale, &exact, rule_type)?.to_string());
    Ok(keys)
}

/// Get the CLDR plural category name for a formatted digit string.
fn plural_category(
    locale: &Locale,
    digits: &str,
    rule_type: PluralRuleType,
) -> Result<&'static str, FuncError> {
    let rules = PluralRules::try_new(locale.clone().into(), rule_type.into())
        .map_err(|e| FuncError::Formatting(format!("no plural data for locale: {e}")))?;

    let operands: PluralOperands = digits
        .trim_start_matches('-')
        .parse()
        .map_err(|_| FuncError::Formatting(format!("invalid plural operands '{digits}'")))?;

    Ok(match rules.category_for(operands) {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    })
}

fn to_decimal(value: f64) -> Result<Decimal, FuncError> {
    let mut dec = Decimal::try_from_f64(value, FloatPrecision::RoundTrip).map_err(|_| {
        FuncError::OperandMismatch(format!("value '{value}' is not a finite number"))
    })?;
    // Integral floats keep no fraction digits: 1.0 formats and selects as "1".
    dec.trim_end();
    Ok(dec)
}

fn digits_i16(digits: usize) -> i16 {
    i16::try_from(digits).unwrap_or(i16::MAX)
}
