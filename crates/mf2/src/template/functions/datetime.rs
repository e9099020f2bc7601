//! The `datetime` function: temporal formatting with date and time styles.

use chrono_tz::Tz;
use icu_locale_core::Locale;

use crate::template::registry::{FuncError, Options};
use crate::types::Value;

const OPTIONS: &[&str] = &["dateStyle", "timeStyle", "timeZone"];
const STYLES: &[&str] = &["short", "medium", "long", "full"];

pub(super) fn format(
    operand: Option<&Value>,
    options: &Options,
    _locale: &Locale,
) -> Result<String, FuncError> {
    let Some(Value::Datetime(value)) = operand else {
        return Err(FuncError::OperandMismatch(
            "datetime function requires a datetime operand".to_string(),
        ));
    };

    options.ensure_allowed(OPTIONS)?;

    let date_style = style_option(options, "dateStyle")?;
    let time_style = style_option(options, "timeStyle")?;

    // With no style options at all: dateStyle=medium, timeStyle=short.
    // With exactly one, only that part renders.
    let (date_style, time_style) = match (date_style, time_style) {
        (None, None) => (Some("medium".to_string()), Some("short".to_string())),
        styles => styles,
    };

    let value = match options.get("timeZone") {
        None => *value,
        Some(zone) => {
            let name = zone.to_string();
            let tz: Tz = name.parse().map_err(|_| {
                FuncError::UnsupportedOption(format!("timeZone: unknown time zone '{name}'"))
            })?;
            value.with_timezone(&tz).fixed_offset()
        }
    };

    let mut parts = Vec::new();
    if let Some(style) = &date_style {
        parts.push(value.format(date_pattern(style)).to_string());
    }
    if let Some(style) = &time_style {
        parts.push(value.format(time_pattern(style)).to_string());
    }

    Ok(parts.join(" "))
}

fn style_option(options: &Options, name: &str) -> Result<Option<String>, FuncError> {
    match options.get(name) {
        Some(_) => Ok(Some(options.get_string(name, "", STYLES)?)),
        None => Ok(None),
    }
}

fn date_pattern(style: &str) -> &'static str {
    match style {
        "short" => "%d/%m/%y",
        "long" => "%d %B %Y",
        "full" => "%A, %d %B %Y",
        _ => "%d %b %Y",
    }
}

fn time_pattern(style: &str) -> &'static str {
    match style {
        "medium" => "%H:%M:%S",
        "long" | "full" => "%H:%M:%S %z",
        _ => "%H:%M",
    }
}
