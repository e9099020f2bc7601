//! Builtin registry functions mandated by MF2: `string`, `number`,
//! `integer` and `datetime`.

mod datetime;
mod number;
mod string;

use crate::template::registry::{FunctionRegistry, RegistryFunc};

pub(super) fn standard() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    registry.insert("string", RegistryFunc::new(string::format, string::matcher));
    registry.insert("number", RegistryFunc::new(number::format, number::matcher));
    registry.insert(
        "integer",
        RegistryFunc::new(number::format_integer, number::match_integer),
    );
    registry.insert("datetime", RegistryFunc::format_only(datetime::format));
    registry
}
