//! The flat condition IR handed to the solver.
//!
//! A query's WHERE and QUALIFY trees are reduced to a list of
//! [`Condition`] triples, one per comparison leaf, in depth-first
//! left-to-right order. Two deliberate simplifications apply:
//!
//! - **OR flattens exactly like AND.** The solver treats the whole clause as
//!   a conjunction of its leaves; preserving disjunction would need a
//!   union-of-domains representation downstream.
//! - **A bare identifier leaf** (a boolean column referenced by name alone)
//!   becomes the synthetic triple `(name, bool, "true")`.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::expression::Expression;
use crate::select::SelectStatement;

/// The operator tag of a [`Condition`].
///
/// [`Op::Bool`] never appears in parsed comparisons; it marks the synthetic
/// triple emitted for a bare boolean column reference.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Op {
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Bool,
}

impl Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Eq => write!(f, "="),
            Op::NotEq => write!(f, "!="),
            Op::Less => write!(f, "<"),
            Op::LessEq => write!(f, "<="),
            Op::Greater => write!(f, ">"),
            Op::GreaterEq => write!(f, ">="),
            Op::Bool => write!(f, "bool"),
        }
    }
}

/// A single flattened condition: left operand, operator, right operand.
///
/// Operands are carried as strings: dotted identifiers, integer lexemes, or
/// string literals with their original surrounding quotes intact.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub lhs: String,
    pub op: Op,
    pub rhs: String,
}

impl Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

impl SelectStatement {
    /// Flatten the WHERE and QUALIFY clauses (in that order) into the
    /// condition IR.
    pub fn conditions(&self) -> Vec<Condition> {
        let mut out = Vec::new();
        if let Some(where_clause) = &self.where_clause {
            flatten_into(where_clause, &mut out);
        }
        if let Some(qualify_clause) = &self.qualify_clause {
            flatten_into(qualify_clause, &mut out);
        }
        out
    }
}

fn flatten_into(expr: &Expression, out: &mut Vec<Condition>) {
    match expr {
        Expression::Or { lhs, rhs } | Expression::And { lhs, rhs } => {
            flatten_into(lhs, out);
            flatten_into(rhs, out);
        }
        Expression::Comparison { lhs, op, rhs } => out.push(Condition {
            lhs: lhs.atom(),
            op: *op,
            rhs: rhs.atom(),
        }),
        Expression::Atom(operand) => out.push(Condition {
            lhs: operand.atom(),
            op: Op::Bool,
            rhs: "true".to_owned(),
        }),
        Expression::Nested(inner) => flatten_into(inner, out),
    }
}
