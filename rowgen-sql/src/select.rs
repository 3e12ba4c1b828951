use std::fmt::{self, Display};

use itertools::Itertools;
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case};
use nom::combinator::{eof, map, opt};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, terminated, tuple};
use nom::IResult;
use serde::{Deserialize, Serialize};

use crate::expression::{condition_expression, Expression};
use crate::join::{join_clause, JoinClause};
use crate::table::{table_reference, Table};
use crate::whitespace::{whitespace0, whitespace1};

/// One entry of the SELECT list: `*` or a scalar expression.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum FieldExpression {
    All,
    Expression(Expression),
}

impl Display for FieldExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldExpression::All => write!(f, "*"),
            FieldExpression::Expression(expr) => expr.fmt(f),
        }
    }
}

/// The query shape the generator understands: a single-table SELECT with
/// optional joins and optional WHERE/QUALIFY clauses.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub fields: Vec<FieldExpression>,
    pub table: Table,
    pub joins: Vec<JoinClause>,
    pub where_clause: Option<Expression>,
    pub qualify_clause: Option<Expression>,
}

impl Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {}", self.fields.iter().join(", "))?;
        write!(f, " FROM {}", self.table)?;
        for join in &self.joins {
            write!(f, " {}", join)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {}", where_clause)?;
        }
        if let Some(qualify_clause) = &self.qualify_clause {
            write!(f, " QUALIFY {}", qualify_clause)?;
        }
        Ok(())
    }
}

fn field_list(i: &[u8]) -> IResult<&[u8], Vec<FieldExpression>> {
    alt((
        map(tag("*"), |_| vec![FieldExpression::All]),
        separated_list1(
            delimited(whitespace0, tag(","), whitespace0),
            map(condition_expression, FieldExpression::Expression),
        ),
    ))(i)
}

// Parse the WHERE clause of a query
pub fn where_clause(i: &[u8]) -> IResult<&[u8], Expression> {
    let (remaining, (_, _, _, expr)) = tuple((
        whitespace0,
        tag_no_case("where"),
        whitespace1,
        condition_expression,
    ))(i)?;
    Ok((remaining, expr))
}

// Parse the QUALIFY clause of a query
pub fn qualify_clause(i: &[u8]) -> IResult<&[u8], Expression> {
    let (remaining, (_, _, _, expr)) = tuple((
        whitespace0,
        tag_no_case("qualify"),
        whitespace1,
        condition_expression,
    ))(i)?;
    Ok((remaining, expr))
}

fn statement_terminator(i: &[u8]) -> IResult<&[u8], ()> {
    let (remaining, _) = tuple((whitespace0, opt(tag(";")), whitespace0, eof))(i)?;
    Ok((remaining, ()))
}

fn select_statement(i: &[u8]) -> IResult<&[u8], SelectStatement> {
    map(
        tuple((
            tag_no_case("select"),
            whitespace1,
            field_list,
            delimited(whitespace1, tag_no_case("from"), whitespace1),
            table_reference,
            many0(join_clause),
            opt(where_clause),
            opt(qualify_clause),
        )),
        |(_, _, fields, _, table, joins, where_clause, qualify_clause)| SelectStatement {
            fields,
            table,
            joins,
            where_clause,
            qualify_clause,
        },
    )(i)
}

/// Parse rule for a complete selection query, up to end of input.
pub fn selection(i: &[u8]) -> IResult<&[u8], SelectStatement> {
    terminated(select_statement, statement_terminator)(i)
}
