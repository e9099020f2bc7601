//! The `string` function: formatting of values as literals and selection
//! based on exact string equality.

use icu_locale_core::Locale;

use crate::template::registry::{FuncError, Options};
use crate::types::Value;

pub(super) fn format(
    operand: Option<&Value>,
    options: &Options,
    _locale: &Locale,
) -> Result<String, FuncError> {
    resolve(operand, options)
}

pub(super) fn matcher(
    operand: Option<&Value>,
    options: &Options,
    _locale: &Locale,
) -> Result<Vec<String>, FuncError> {
    Ok(vec![resolve(operand, options)?])
}

fn resolve(operand: Option<&Value>, options: &Options) -> Result<String, FuncError> {
    let Some(value) = operand else {
        return Err(FuncError::OperandMismatch(
            "string function requires an operand".to_string(),
        ));
    };

    if !options.is_empty() {
        return Err(FuncError::UnsupportedOption(
            "string function takes no options".to_string(),
        ));
    }

    Ok(value.to_string())
}
