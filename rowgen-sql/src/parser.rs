use thiserror::Error;

use crate::select::{selection, SelectStatement};

/// Error returned when the input is not a query this crate understands.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("failed to parse query near {0:?}")]
pub struct ParseError(String);

/// Parse a complete query string into a [`SelectStatement`].
///
/// # Examples
///
/// ```rust
/// let stmt = rowgen_sql::parse_query("SELECT * FROM t WHERE col_a = 10").unwrap();
/// assert_eq!(stmt.conditions().len(), 1);
/// ```
pub fn parse_query(input: &str) -> Result<SelectStatement, ParseError> {
    match selection(input.trim().as_bytes()) {
        Ok((_, stmt)) => Ok(stmt),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let near = String::from_utf8_lossy(e.input);
            Err(ParseError(near.chars().take(32).collect()))
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError("<incomplete input>".to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_surrounding_whitespace() {
        assert!(parse_query("  SELECT * FROM t  ").is_ok());
    }

    #[test]
    fn rejects_non_queries() {
        assert!(parse_query("INSERT INTO t VALUES (1)").is_err());
        assert!(parse_query("").is_err());
    }
}
