//! Wildcard matching for IS comparisons.
//!
//! An IS input may carry an asterisk at its start, its end, or both, and
//! nowhere else:
//!
//! - `abc`   - whole-string equality
//! - `abc*`  - starts with `abc`
//! - `*abc`  - ends with `abc`
//! - `*abc*` - contains `abc`
//!
//! The input is compiled once into one of these four shapes, so no caller
//! text is ever interpreted as a regular expression.
//!
//! ```
//! use insight_core::WildcardPattern;
//! let p = WildcardPattern::compile("cp*").unwrap();
//! assert!(p.matches("cpsc"));
//! assert!(!p.matches("math"));
//! assert!(WildcardPattern::compile("c*sc").is_err());
//! ```

use alloc::string::{String, ToString};
use core::fmt;

use crate::error::{Error, Result};

/// A compiled IS pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WildcardPattern {
    /// Matches exactly this string.
    Exact(String),
    /// Matches strings starting with this prefix.
    Prefix(String),
    /// Matches strings ending with this suffix.
    Suffix(String),
    /// Matches strings containing this substring.
    Contains(String),
}

impl WildcardPattern {
    /// Compiles an IS input string.
    ///
    /// Fails when an asterisk appears anywhere other than the first or last
    /// position.
    pub fn compile(input: &str) -> Result<Self> {
        let (leading, rest) = match input.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let (trailing, literal) = match rest.strip_suffix('*') {
            Some(literal) => (true, literal),
            None => (false, rest),
        };
        if literal.contains('*') {
            return Err(Error::invalid_pattern(input));
        }

        let literal = literal.to_string();
        Ok(match (leading, trailing) {
            (false, false) => WildcardPattern::Exact(literal),
            (false, true) => WildcardPattern::Prefix(literal),
            (true, false) => WildcardPattern::Suffix(literal),
            (true, true) => WildcardPattern::Contains(literal),
        })
    }

    /// Tests a value against the pattern.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            WildcardPattern::Exact(s) => value == s,
            WildcardPattern::Prefix(s) => value.starts_with(s.as_str()),
            WildcardPattern::Suffix(s) => value.ends_with(s.as_str()),
            WildcardPattern::Contains(s) => value.contains(s.as_str()),
        }
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WildcardPattern::Exact(s) => write!(f, "{}", s),
            WildcardPattern::Prefix(s) => write!(f, "{}*", s),
            WildcardPattern::Suffix(s) => write!(f, "*{}", s),
            WildcardPattern::Contains(s) => write!(f, "*{}*", s),
        }
    }
}
