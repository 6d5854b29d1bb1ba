//! Tolerant `key=value` line parsing for movie configuration text.
//!
//! Movie headers come from many third-party tools, so nothing here fails:
//! a line that does not look like a key/value pair simply yields `None`.

use std::str::FromStr;

/// One `key<sep>value` line, borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyValue<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> KeyValue<'a> {
    /// Parse a `key=value` line, splitting on the first `=`.
    ///
    /// Whitespace around key and value is insignificant and matching quotes
    /// around the value are removed. The value may be empty; the key may not.
    pub fn parse(line: &'a str) -> Option<Self> {
        let (key, value) = line.split_once('=')?;
        Self::build(key, value)
    }

    /// Parse a `key value` line, splitting on the first run of whitespace.
    ///
    /// A bare key with no value yields an empty value.
    pub fn parse_whitespace(line: &'a str) -> Option<Self> {
        let line = line.trim();
        match line.split_once(char::is_whitespace) {
            Some((key, value)) => Self::build(key, value),
            None => Self::build(line, ""),
        }
    }

    fn build(key: &'a str, value: &'a str) -> Option<Self> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self {
            key,
            value: unquote(value.trim()),
        })
    }

    /// Case-insensitive key comparison.
    pub fn key_is(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }

    /// The value coerced to an integer, if it is one.
    pub fn int<T: FromStr>(&self) -> Option<T> {
        parse_int(self.value)
    }

    /// The value read as a boolean flag, if it is one.
    pub fn flag(&self) -> Option<bool> {
        parse_bool(self.value)
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse an integer, ignoring surrounding whitespace.
///
/// Anything that is not entirely an integer of the target type (including
/// overflow and negative values for unsigned targets) yields `None`.
pub fn parse_int<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

/// Parse a boolean flag as written by emulators: `1`/`0`, `true`/`false`,
/// `yes`/`no` (case-insensitive).
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if value == "0"
        || value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no")
    {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
