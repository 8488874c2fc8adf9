use std::sync::Arc;

use regex::Regex;

use crate::timetable::Error;

/// Route filter compiled from a query's `route_pattern`.
///
/// The pattern is a regular expression matched against `route_short_name`.
/// A leading `!` inverts the filter: keep every route NOT matching the
/// remainder. The bare string `"!"` would exclude everything and is
/// rejected.
#[derive(Debug, Clone)]
pub struct RouteFilter {
    pattern: Arc<str>,
    regex: Regex,
    negate: bool,
}

impl RouteFilter {
    pub fn parse(pattern: &str) -> Result<Self, Error> {
        if pattern == "!" {
            return Err(Error::SillyPattern);
        }
        let (negate, expr) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let regex = Regex::new(expr)?;
        Ok(Self {
            pattern: pattern.into(),
            regex,
            negate,
        })
    }

    pub fn is_match(&self, route_short_name: &str) -> bool {
        self.negate ^ self.regex.is_match(route_short_name)
    }

    /// The original pattern text, `!` prefix included.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[test]
fn plain_pattern_test() {
    let filter = RouteFilter::parse("^U").unwrap();
    assert!(filter.is_match("U8"));
    assert!(!filter.is_match("S42"));
}

#[test]
fn negated_pattern_test() {
    let filter = RouteFilter::parse("!^U").unwrap();
    assert!(!filter.is_match("U8"));
    assert!(filter.is_match("S42"));
}

#[test]
fn bare_bang_test() {
    assert!(matches!(RouteFilter::parse("!"), Err(Error::SillyPattern)));
}

#[test]
fn malformed_pattern_test() {
    assert!(matches!(RouteFilter::parse("["), Err(Error::BadPattern(_))));
}
