use std::fmt::{self, Display};
use std::str;

use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::character::complete::{char, digit1};
use nom::combinator::{map_res, opt, recognize};
use nom::multi::many0_count;
use nom::sequence::{delimited, pair};
use nom::IResult;
use serde::{Deserialize, Serialize};

/// A literal value as written in a query.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    /// A quoted string, stored as the raw lexeme *including* its surrounding
    /// quote characters. Consumers that want the contents strip a single
    /// layer of quotes; the condition IR passes the lexeme through verbatim.
    String(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::String(raw) => write!(f, "{}", raw),
        }
    }
}

// Integer literal value
pub fn integer_literal(i: &[u8]) -> IResult<&[u8], Literal> {
    map_res(recognize(pair(opt(tag("-")), digit1)), |bytes: &[u8]| {
        str::from_utf8(bytes)
            .map_err(|_| ())
            .and_then(|s| s.parse::<i64>().map_err(|_| ()))
            .map(Literal::Integer)
    })(i)
}

fn single_quoted(i: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(delimited(
        char('\''),
        many0_count(alt((is_not("'"), tag("''")))),
        char('\''),
    ))(i)
}

fn double_quoted(i: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(delimited(
        char('"'),
        many0_count(alt((is_not("\""), tag("\"\"")))),
        char('"'),
    ))(i)
}

// Quoted string literal value, kept as the raw lexeme
pub fn string_literal(i: &[u8]) -> IResult<&[u8], Literal> {
    map_res(alt((single_quoted, double_quoted)), |raw: &[u8]| {
        str::from_utf8(raw)
            .map(|s| Literal::String(s.to_owned()))
            .map_err(|_| ())
    })(i)
}

// Any literal value
pub fn literal(i: &[u8]) -> IResult<&[u8], Literal> {
    alt((integer_literal, string_literal))(i)
}
