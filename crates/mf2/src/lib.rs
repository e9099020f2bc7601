//! MessageFormat 2.0 parsing, authoring and formatting.
//!
//! The crate is organised around a single pipeline: [`parse`] turns MF2
//! source text into a typed [`Ast`], and a [`Template`] evaluates that tree
//! against a set of input variables to produce a formatted string. The
//! [`builder::Builder`] constructs the same trees programmatically, and the
//! [`FunctionRegistry`] plugs locale-sensitive format/match primitives into
//! evaluation.
//!
//! # Example
//!
//! ```
//! use mf2::{Template, args};
//!
//! let template =
//!     Template::parse(".match {$n :number} 1 {{one apple}} * {{{$n} apples}}").unwrap();
//!
//! let (text, errors) = template.render(&args! { "n" => 1 });
//! assert_eq!(text, "one apple");
//! assert!(errors.is_empty());
//!
//! let (text, _) = template.render(&args! { "n" => 3 });
//! assert_eq!(text, "3 apples");
//! ```

pub mod builder;
pub mod parser;
pub mod template;
pub mod types;

pub use builder::{BuildError, Builder};
pub use parser::{Ast, InvalidAst, ParseError, parse};
pub use template::{
    FormatFn, FuncError, FunctionRegistry, MatchFn, Options, RegistryFunc, RenderError, Template,
};
pub use types::Value;

/// Creates a `HashMap<String, Value>` from key-value pairs.
///
/// Values are automatically converted via `Into<Value>`, so you can pass
/// integers, floats, strings, or datetimes directly.
///
/// # Example
///
/// ```
/// use mf2::{Value, args};
///
/// let vars = args! { "count" => 3, "name" => "Alice" };
/// assert_eq!(vars.len(), 2);
/// assert_eq!(vars["count"].as_number(), Some(3.0));
/// assert_eq!(vars["name"].as_string(), Some("Alice"));
/// ```
#[macro_export]
macro_rules! args {
    {} => {
        ::std::collections::HashMap::<String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
