use log::warn;
use minijinja::{Error, ErrorKind};
use regex::Regex;

// Re-export all the case conversion and string manipulation functions
pub use cruet::{
    case::{
        camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
        screaming_snake::to_screaming_snake_case, snake::to_snake_case,
        table::to_table_case, train::to_train_case,
    },
    string::{pluralize::to_plural, singularize::to_singular},
    suffix::foreign_key::to_foreign_key,
};

/// Tests if a string matches a given regular expression pattern.
///
/// An invalid pattern is logged and treated as a non-match.
pub fn regex_filter(val: &str, re: &str) -> bool {
    match Regex::new(re) {
        Ok(re) => re.is_match(val),
        Err(err) => {
            warn!("Invalid regex '{re}': {err}");
            false
        }
    }
}

/// Replaces every match of `re` in `val` with `replacement`.
///
/// Unlike [`regex_filter`], an invalid pattern fails the render.
pub fn regex_replace(val: &str, re: &str, replacement: &str) -> Result<String, Error> {
    let re = Regex::new(re).map_err(|err| {
        Error::new(ErrorKind::InvalidOperation, format!("invalid regex '{re}': {err}"))
    })?;
    Ok(re.replace_all(val, replacement).into_owned())
}
