use std::fmt::{self, Display};
use std::str;

use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case};
use nom::character::complete::char;
use nom::combinator::{map, opt};
use nom::multi::separated_list1;
use nom::sequence::{delimited, tuple};
use nom::IResult;
use serde::{Deserialize, Serialize};

use crate::column::sql_identifier;
use crate::expression::{condition_expression, Expression};
use crate::table::{table_reference, Table};
use crate::whitespace::{whitespace0, whitespace1};

/// The flavor of a JOIN clause.
///
/// Joins are parsed so that queries carrying them remain accepted, but the
/// generator ignores them entirely.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum JoinOperator {
    Join,
    LeftJoin,
    LeftOuterJoin,
    RightJoin,
    RightOuterJoin,
    FullJoin,
    FullOuterJoin,
    InnerJoin,
    CrossJoin,
    NaturalJoin,
}

impl Display for JoinOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinOperator::Join => write!(f, "JOIN"),
            JoinOperator::LeftJoin => write!(f, "LEFT JOIN"),
            JoinOperator::LeftOuterJoin => write!(f, "LEFT OUTER JOIN"),
            JoinOperator::RightJoin => write!(f, "RIGHT JOIN"),
            JoinOperator::RightOuterJoin => write!(f, "RIGHT OUTER JOIN"),
            JoinOperator::FullJoin => write!(f, "FULL JOIN"),
            JoinOperator::FullOuterJoin => write!(f, "FULL OUTER JOIN"),
            JoinOperator::InnerJoin => write!(f, "INNER JOIN"),
            JoinOperator::CrossJoin => write!(f, "CROSS JOIN"),
            JoinOperator::NaturalJoin => write!(f, "NATURAL JOIN"),
        }
    }
}

/// The ON or USING constraint of a join clause.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum JoinConstraint {
    On(Expression),
    Using(Vec<String>),
}

/// A single JOIN clause: operator, joined table, optional constraint.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct JoinClause {
    pub operator: JoinOperator,
    pub table: Table,
    pub constraint: Option<JoinConstraint>,
}

impl Display for JoinClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.table)?;
        match &self.constraint {
            Some(JoinConstraint::On(expr)) => write!(f, " ON {}", expr),
            Some(JoinConstraint::Using(cols)) => write!(f, " USING ({})", cols.join(", ")),
            None => Ok(()),
        }
    }
}

fn qualified_join(
    word: &'static str,
    with_outer: JoinOperator,
    without: JoinOperator,
) -> impl Fn(&[u8]) -> IResult<&[u8], JoinOperator> {
    move |i| {
        map(
            tuple((
                tag_no_case(word),
                whitespace1,
                opt(tuple((tag_no_case("outer"), whitespace1))),
                tag_no_case("join"),
            )),
            move |(_, _, outer, _)| if outer.is_some() { with_outer } else { without },
        )(i)
    }
}

fn join_operator(i: &[u8]) -> IResult<&[u8], JoinOperator> {
    alt((
        qualified_join("left", JoinOperator::LeftOuterJoin, JoinOperator::LeftJoin),
        qualified_join("right", JoinOperator::RightOuterJoin, JoinOperator::RightJoin),
        qualified_join("full", JoinOperator::FullOuterJoin, JoinOperator::FullJoin),
        map(
            tuple((tag_no_case("inner"), whitespace1, tag_no_case("join"))),
            |_| JoinOperator::InnerJoin,
        ),
        map(
            tuple((tag_no_case("cross"), whitespace1, tag_no_case("join"))),
            |_| JoinOperator::CrossJoin,
        ),
        map(
            tuple((tag_no_case("natural"), whitespace1, tag_no_case("join"))),
            |_| JoinOperator::NaturalJoin,
        ),
        map(tag_no_case("join"), |_| JoinOperator::Join),
    ))(i)
}

fn join_constraint(i: &[u8]) -> IResult<&[u8], JoinConstraint> {
    let on = map(
        tuple((
            whitespace1,
            tag_no_case("on"),
            whitespace1,
            condition_expression,
        )),
        |(_, _, _, expr)| JoinConstraint::On(expr),
    );
    let using = map(
        tuple((
            whitespace1,
            tag_no_case("using"),
            whitespace0,
            delimited(
                tuple((char('('), whitespace0)),
                separated_list1(
                    delimited(whitespace0, tag(","), whitespace0),
                    map(sql_identifier, |ident| {
                        str::from_utf8(ident).unwrap().to_owned()
                    }),
                ),
                tuple((whitespace0, char(')'))),
            ),
        )),
        |(_, _, _, cols)| JoinConstraint::Using(cols),
    );
    alt((on, using))(i)
}

/// A JOIN clause, including the whitespace separating it from what precedes
/// it.
pub fn join_clause(i: &[u8]) -> IResult<&[u8], JoinClause> {
    map(
        tuple((
            whitespace1,
            join_operator,
            whitespace1,
            table_reference,
            opt(join_constraint),
        )),
        |(_, operator, _, table, constraint)| JoinClause {
            operator,
            table,
            constraint,
        },
    )(i)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn plain_join_with_on() {
        let (rest, join) = join_clause(b" JOIN orders ON users.id = orders.user_id").unwrap();
        assert!(rest.is_empty());
        assert_eq!(join.operator, JoinOperator::Join);
        assert_eq!(join.table, Table::from("orders"));
        assert!(matches!(join.constraint, Some(JoinConstraint::On(_))));
    }

    #[test]
    fn left_outer_join_with_using() {
        let (rest, join) = join_clause(b" LEFT OUTER JOIN orders USING (id, tenant)").unwrap();
        assert!(rest.is_empty());
        assert_eq!(join.operator, JoinOperator::LeftOuterJoin);
        assert_eq!(
            join.constraint,
            Some(JoinConstraint::Using(vec![
                "id".to_owned(),
                "tenant".to_owned()
            ]))
        );
    }

    #[test]
    fn bare_cross_join() {
        let (rest, join) = join_clause(b" CROSS JOIN other").unwrap();
        assert!(rest.is_empty());
        assert_eq!(join.operator, JoinOperator::CrossJoin);
        assert_eq!(join.constraint, None);
    }
}
