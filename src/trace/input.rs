//! Parsing user-entered values.
//!
//! Accepts comma- and/or whitespace-separated integers, e.g. `"5, 3 8,1"`.
//! Anything else fails fast with [`ScopeError::InvalidInput`] so a malformed
//! trace is never produced.

use crate::error::{ScopeError, ScopeResult};

/// Values plus optional search target for one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceInput {
    /// Array to run the algorithm on.
    pub values: Vec<i64>,
    /// Value to search for.
    pub target: Option<i64>,
}

impl TraceInput {
    /// Input without a target.
    #[must_use]
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            target: None,
        }
    }

    /// Attach a search target.
    #[must_use]
    pub const fn with_target(mut self, target: i64) -> Self {
        self.target = Some(target);
        self
    }

    /// Parse values and an optional target from text.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidInput`] if either part is malformed.
    pub fn parse(values: &str, target: Option<&str>) -> ScopeResult<Self> {
        Ok(Self {
            values: parse_values(values)?,
            target: target.map(parse_target).transpose()?,
        })
    }
}

/// Parse a list of integers separated by commas and/or whitespace.
///
/// # Errors
///
/// Returns [`ScopeError::InvalidInput`] on a non-numeric token or when no
/// values remain after splitting.
pub fn parse_values(text: &str) -> ScopeResult<Vec<i64>> {
    let values = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<i64>().map_err(|_| {
                ScopeError::invalid_input(format!("'{token}' is not an integer"))
            })
        })
        .collect::<ScopeResult<Vec<_>>>()?;

    if values.is_empty() {
        return Err(ScopeError::invalid_input("no values given"));
    }
    Ok(values)
}

/// Parse a single integer search target.
///
/// # Errors
///
/// Returns [`ScopeError::InvalidInput`] if the text is not one integer.
pub fn parse_target(text: &str) -> ScopeResult<i64> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| ScopeError::invalid_input(format!("target '{trimmed}' is not an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values_commas() {
        assert_eq!(parse_values("5,3,8").ok(), Some(vec![5, 3, 8]));
    }

    #[test]
    fn test_parse_values_mixed_separators() {
        assert_eq!(parse_values(" 5, 3  8,\t-1 ").ok(), Some(vec![5, 3, 8, -1]));
    }

    #[test]
    fn test_parse_values_rejects_token() {
        let err = parse_values("1, two, 3");
        assert!(matches!(err, Err(ScopeError::InvalidInput { .. })));
        let msg = err.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("'two'"));
    }

    #[test]
    fn test_parse_values_rejects_float() {
        assert!(parse_values("1.5, 2").is_err());
    }

    #[test]
    fn test_parse_values_empty_after_filtering() {
        assert!(matches!(parse_values(" , ,"), Err(ScopeError::InvalidInput { .. })));
        assert!(matches!(parse_values(""), Err(ScopeError::InvalidInput { .. })));
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target(" 7 ").ok(), Some(7));
        assert!(parse_target("seven").is_err());
        assert!(parse_target("1 2").is_err());
    }

    #[test]
    fn test_trace_input_parse() {
        let input = TraceInput::parse("1 3 5", Some("3"));
        assert_eq!(input.ok(), Some(TraceInput::new(vec![1, 3, 5]).with_target(3)));

        let no_target = TraceInput::parse("1 3 5", None);
        assert_eq!(no_target.ok().and_then(|i| i.target), None);
    }
}
