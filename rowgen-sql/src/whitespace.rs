//! Parsers for what the query grammar considers whitespace: runs of blank
//! characters and `--` line comments, both of which may appear between any
//! two tokens.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::multispace1;
use nom::combinator::{map, recognize};
use nom::multi::{many0_count, many1_count};
use nom::sequence::pair;
use nom::IResult;

/// Recognizes an end-of-line comment of the form `-- ...`, up to but not
/// including the terminating line break.
pub fn eol_comment(i: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(pair(tag("--"), take_while(|c| c != b'\n')))(i)
}

/// Zero or more whitespace characters or line comments.
pub fn whitespace0(i: &[u8]) -> IResult<&[u8], ()> {
    map(many0_count(alt((multispace1, eol_comment))), |_| ())(i)
}

/// One or more whitespace characters or line comments.
pub fn whitespace1(i: &[u8]) -> IResult<&[u8], ()> {
    map(many1_count(alt((multispace1, eol_comment))), |_| ())(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_count_as_whitespace() {
        let (rest, ()) = whitespace1(b"  -- a comment\n  x").unwrap();
        assert_eq!(rest, b"x");
    }

    #[test]
    fn whitespace1_requires_something() {
        assert!(whitespace1(b"x").is_err());
        let (rest, ()) = whitespace0(b"x").unwrap();
        assert_eq!(rest, b"x");
    }
}
