use std::fmt::{self, Display};
use std::str;

use itertools::Itertools;
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case};
use nom::character::complete::char;
use nom::combinator::map;
use nom::multi::separated_list0;
use nom::sequence::{delimited, pair, separated_pair, tuple};
use nom::IResult;
use serde::{Deserialize, Serialize};

use crate::column::{column_identifier, sql_identifier, Column};
use crate::ir::Op;
use crate::literal::{literal, Literal};
use crate::whitespace::{whitespace0, whitespace1};

/// A function call appearing as an operand, e.g. `row_number()`.
///
/// Arguments are parsed and kept in the AST but the condition IR renders a
/// call as its bare `name()` atom.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Expression>,
}

impl Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.arguments.iter().join(", "))
    }
}

/// One atomic operand of a comparison, or a bare boolean column reference.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Column(Column),
    Literal(Literal),
    Call(FunctionCall),
}

impl Operand {
    /// Render the operand the way the condition IR carries it: dotted column
    /// names, literal lexemes verbatim (string literals keep their quotes),
    /// and function calls as `name()`.
    pub fn atom(&self) -> String {
        match self {
            Operand::Column(col) => col.dotted(),
            Operand::Literal(lit) => lit.to_string(),
            Operand::Call(call) => format!("{}()", call.name),
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(col) => col.fmt(f),
            Operand::Literal(lit) => lit.fmt(f),
            Operand::Call(call) => call.fmt(f),
        }
    }
}

/// The WHERE/QUALIFY expression tree: OR over AND over comparison and atomic
/// leaves, with explicit parenthesized nesting.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Or {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    And {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Comparison {
        lhs: Operand,
        op: Op,
        rhs: Operand,
    },
    /// A bare operand leaf, e.g. a boolean column referenced by name alone.
    Atom(Operand),
    /// A parenthesized sub-expression.
    Nested(Box<Expression>),
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Or { lhs, rhs } => write!(f, "{} OR {}", lhs, rhs),
            Expression::And { lhs, rhs } => write!(f, "{} AND {}", lhs, rhs),
            Expression::Comparison { lhs, op, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Expression::Atom(operand) => operand.fmt(f),
            Expression::Nested(inner) => write!(f, "({})", inner),
        }
    }
}

/// A binary comparison operator. `<>` parses as [`Op::NotEq`].
pub fn comparison_operator(i: &[u8]) -> IResult<&[u8], Op> {
    alt((
        map(tag("<="), |_| Op::LessEq),
        map(tag(">="), |_| Op::GreaterEq),
        map(alt((tag("!="), tag("<>"))), |_| Op::NotEq),
        map(tag("="), |_| Op::Eq),
        map(tag("<"), |_| Op::Less),
        map(tag(">"), |_| Op::Greater),
    ))(i)
}

fn function_call(i: &[u8]) -> IResult<&[u8], FunctionCall> {
    map(
        pair(
            sql_identifier,
            delimited(
                tuple((whitespace0, char('('), whitespace0)),
                separated_list0(
                    delimited(whitespace0, tag(","), whitespace0),
                    condition_expression,
                ),
                tuple((whitespace0, char(')'))),
            ),
        ),
        |(name, arguments)| FunctionCall {
            name: str::from_utf8(name).unwrap().to_owned(),
            arguments,
        },
    )(i)
}

/// One atomic operand: a literal, a function call, or a column reference.
pub fn operand(i: &[u8]) -> IResult<&[u8], Operand> {
    alt((
        map(literal, Operand::Literal),
        map(function_call, Operand::Call),
        map(column_identifier, Operand::Column),
    ))(i)
}

fn comparison_term(i: &[u8]) -> IResult<&[u8], Expression> {
    let nested = map(
        delimited(
            pair(char('('), whitespace0),
            condition_expression,
            pair(whitespace0, char(')')),
        ),
        |inner| Expression::Nested(Box::new(inner)),
    );
    let comparison = map(
        tuple((
            operand,
            delimited(whitespace0, comparison_operator, whitespace0),
            operand,
        )),
        |(lhs, op, rhs)| Expression::Comparison { lhs, op, rhs },
    );
    alt((nested, comparison, map(operand, Expression::Atom)))(i)
}

fn and_expression(i: &[u8]) -> IResult<&[u8], Expression> {
    let conjunction = map(
        separated_pair(
            comparison_term,
            delimited(whitespace0, tag_no_case("and"), whitespace1),
            and_expression,
        ),
        |(lhs, rhs)| Expression::And {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
    );
    alt((conjunction, comparison_term))(i)
}

/// A full condition expression: OR over AND over comparison terms.
pub fn condition_expression(i: &[u8]) -> IResult<&[u8], Expression> {
    let disjunction = map(
        separated_pair(
            and_expression,
            delimited(whitespace0, tag_no_case("or"), whitespace1),
            condition_expression,
        ),
        |(lhs, rhs)| Expression::Or {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
    );
    alt((disjunction, and_expression))(i)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn column(name: &str) -> Operand {
        Operand::Column(Column::from(name))
    }

    fn int(n: i64) -> Operand {
        Operand::Literal(Literal::Integer(n))
    }

    #[test]
    fn single_comparison() {
        let (rest, expr) = condition_expression(b"col_a = 10").unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            expr,
            Expression::Comparison {
                lhs: column("col_a"),
                op: Op::Eq,
                rhs: int(10),
            }
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let (rest, expr) = condition_expression(b"col_a > 5 OR col_a = 10 AND col_b = 5").unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            expr,
            Expression::Or {
                lhs: Box::new(Expression::Comparison {
                    lhs: column("col_a"),
                    op: Op::Greater,
                    rhs: int(5),
                }),
                rhs: Box::new(Expression::And {
                    lhs: Box::new(Expression::Comparison {
                        lhs: column("col_a"),
                        op: Op::Eq,
                        rhs: int(10),
                    }),
                    rhs: Box::new(Expression::Comparison {
                        lhs: column("col_b"),
                        op: Op::Eq,
                        rhs: int(5),
                    }),
                }),
            }
        );
    }

    #[test]
    fn bare_identifier_is_an_atom() {
        let (rest, expr) = condition_expression(b"col_a").unwrap();
        assert!(rest.is_empty());
        assert_eq!(expr, Expression::Atom(column("col_a")));
    }

    #[test]
    fn parenthesized_nesting() {
        let (rest, expr) = condition_expression(b"(col_a = 1 OR col_b) AND col_c != 2").unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            expr,
            Expression::And {
                lhs: Box::new(Expression::Nested(Box::new(Expression::Or {
                    lhs: Box::new(Expression::Comparison {
                        lhs: column("col_a"),
                        op: Op::Eq,
                        rhs: int(1),
                    }),
                    rhs: Box::new(Expression::Atom(column("col_b"))),
                }))),
                rhs: Box::new(Expression::Comparison {
                    lhs: column("col_c"),
                    op: Op::NotEq,
                    rhs: int(2),
                }),
            }
        );
    }

    #[test]
    fn not_equal_spellings() {
        let (_, a) = condition_expression(b"x != 1").unwrap();
        let (_, b) = condition_expression(b"x <> 1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn string_literal_rhs_keeps_quotes() {
        let (_, expr) = condition_expression(b"col_a = '2013-06-17'").unwrap();
        assert_eq!(
            expr,
            Expression::Comparison {
                lhs: column("col_a"),
                op: Op::Eq,
                rhs: Operand::Literal(Literal::String("'2013-06-17'".to_owned())),
            }
        );
    }

    #[test]
    fn function_call_operand() {
        let (rest, expr) = condition_expression(b"row_number() <= 3").unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            expr,
            Expression::Comparison {
                lhs: Operand::Call(FunctionCall {
                    name: "row_number".to_owned(),
                    arguments: vec![],
                }),
                op: Op::LessEq,
                rhs: int(3),
            }
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let (_, lower) = condition_expression(b"a = 1 and b = 2 or c").unwrap();
        let (_, upper) = condition_expression(b"a = 1 AND b = 2 OR c").unwrap();
        assert_eq!(lower, upper);
    }
}
