use std::fmt::{self, Display};
use std::str;

use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::char;
use nom::combinator::{map, opt, recognize};
use nom::sequence::{pair, terminated};
use nom::IResult;
use serde::{Deserialize, Serialize};

/// A reference to a column, optionally qualified by a table name.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub table: Option<String>,
}

impl Column {
    /// The dotted rendering used by the condition IR: `table.name` when
    /// qualified, bare `name` otherwise.
    pub fn dotted(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table, self.name),
            None => self.name.clone(),
        }
    }
}

impl From<&str> for Column {
    fn from(c: &str) -> Column {
        match c.split_once('.') {
            Some((table, name)) => Column {
                name: name.to_owned(),
                table: Some(table.to_owned()),
            },
            None => Column {
                name: c.to_owned(),
                table: None,
            },
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.table {
            write!(f, "{}.", table)?;
        }
        write!(f, "{}", self.name)
    }
}

pub(crate) fn is_sql_identifier(chr: u8) -> bool {
    chr.is_ascii_alphanumeric() || chr == b'_'
}

/// A bare SQL identifier: a letter or underscore followed by any number of
/// identifier characters.
pub fn sql_identifier(i: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(pair(
        take_while1(|c: u8| c.is_ascii_alphabetic() || c == b'_'),
        take_while(is_sql_identifier),
    ))(i)
}

/// A column reference, with an optional dotted table qualifier.
pub fn column_identifier(i: &[u8]) -> IResult<&[u8], Column> {
    map(
        pair(
            opt(terminated(sql_identifier, char('.'))),
            sql_identifier,
        ),
        |(table, name)| Column {
            name: str::from_utf8(name).unwrap().to_owned(),
            table: table.map(|t| str::from_utf8(t).unwrap().to_owned()),
        },
    )(i)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bare_and_qualified() {
        let (_, col) = column_identifier(b"col_a").unwrap();
        assert_eq!(col, Column::from("col_a"));
        assert_eq!(col.dotted(), "col_a");

        let (_, col) = column_identifier(b"t.col_a").unwrap();
        assert_eq!(col, Column::from("t.col_a"));
        assert_eq!(col.dotted(), "t.col_a");
    }

    #[test]
    fn identifiers_cannot_start_with_a_digit() {
        assert!(sql_identifier(b"1col").is_err());
        let (rest, ident) = sql_identifier(b"col1 x").unwrap();
        assert_eq!(ident, b"col1");
        assert_eq!(rest, b" x");
    }
}
