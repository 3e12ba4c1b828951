use std::fmt::{self, Display};
use std::str;

use nom::character::complete::char;
use nom::combinator::{map, opt};
use nom::sequence::{pair, terminated};
use nom::IResult;
use serde::{Deserialize, Serialize};

use crate::column::sql_identifier;

/// A reference to a table, optionally qualified by a schema name.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub schema: Option<String>,
}

impl From<&str> for Table {
    fn from(t: &str) -> Table {
        match t.split_once('.') {
            Some((schema, name)) => Table {
                name: name.to_owned(),
                schema: Some(schema.to_owned()),
            },
            None => Table {
                name: t.to_owned(),
                schema: None,
            },
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        write!(f, "{}", self.name)
    }
}

/// A table reference, with an optional dotted schema qualifier.
pub fn table_reference(i: &[u8]) -> IResult<&[u8], Table> {
    map(
        pair(
            opt(terminated(sql_identifier, char('.'))),
            sql_identifier,
        ),
        |(schema, name)| Table {
            name: str::from_utf8(name).unwrap().to_owned(),
            schema: schema.map(|s| str::from_utf8(s).unwrap().to_owned()),
        },
    )(i)
}
