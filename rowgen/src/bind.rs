//! Binding of flattened conditions to typed per-column constraints.

use rowgen_sql::{Condition, Op};
use thiserror::Error;
use tracing::debug;

use crate::constraint::Constraint;
use crate::schema::ColumnType;
use crate::table::Table;
use crate::timestamp::{parse_time, UnparsableTime};

/// Errors surfaced while binding conditions to a table's schema.
///
/// Any binding error aborts before generation is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// A condition referenced a column the schema does not contain
    #[error("unknown column {0:?}")]
    UnknownColumn(String),

    /// The right-hand literal did not parse as the column's kind
    #[error("could not parse {lexeme:?} as {kind}")]
    LiteralParse {
        kind: &'static str,
        lexeme: String,
    },

    /// The operator is not legal for the column's type
    #[error("operator {op} is not supported for {ty} columns")]
    BadOp { ty: ColumnType, op: Op },

    /// The column's type has no solvable domain
    #[error("{0} columns do not support constraints")]
    UnsupportedType(ColumnType),

    /// A timestamp literal was neither RFC3339 nor a date
    #[error(transparent)]
    UnparsableTime(#[from] UnparsableTime),
}

/// Build the constraint one condition imposes on a column of type `ty`.
///
/// The right-hand lexeme is parsed according to the column type: a signed
/// decimal integer, a timestamp literal (RFC3339 or `YYYY-MM-DD`, quotes
/// stripped), or the bare words `true`/`false` for booleans.
pub fn make_constraint(ty: ColumnType, condition: &Condition) -> Result<Constraint, BindError> {
    match ty {
        ColumnType::Int => {
            let value: i64 = condition.rhs.parse().map_err(|_| BindError::LiteralParse {
                kind: "int",
                lexeme: condition.rhs.clone(),
            })?;
            int_constraint(ty, condition.op, value)
        }
        ColumnType::Timestamp => {
            let value = parse_time(&condition.rhs)?;
            int_constraint(ty, condition.op, value)
        }
        ColumnType::Bool => match condition.rhs.as_str() {
            "true" => Ok(Constraint::BoolTrue),
            "false" => Ok(Constraint::BoolFalse),
            _ => Err(BindError::BadOp {
                ty,
                op: condition.op,
            }),
        },
        ColumnType::Text => Err(BindError::UnsupportedType(ty)),
    }
}

fn int_constraint(ty: ColumnType, op: Op, value: i64) -> Result<Constraint, BindError> {
    match op {
        Op::Eq => Ok(Constraint::IntEq(value)),
        Op::NotEq => Ok(Constraint::IntNEq(value)),
        Op::Less => Ok(Constraint::IntLt(value)),
        Op::LessEq => Ok(Constraint::IntLte(value)),
        Op::Greater => Ok(Constraint::IntGt(value)),
        Op::GreaterEq => Ok(Constraint::IntGte(value)),
        Op::Bool => Err(BindError::BadOp { ty, op }),
    }
}

/// Attach every condition's constraint to its schema column.
///
/// Constraints land on each column in condition order. The first error
/// aborts binding; the table may then hold a partially bound schema and
/// should not be generated into.
pub fn bind_conditions(table: &mut Table, conditions: &[Condition]) -> Result<(), BindError> {
    for condition in conditions {
        let ty = table
            .column_type(&condition.lhs)
            .ok_or_else(|| BindError::UnknownColumn(condition.lhs.clone()))?;
        let constraint = make_constraint(ty, condition)?;
        debug!(column = %condition.lhs, ?constraint, "bound constraint");
        table
            .column_mut(&condition.lhs)
            .expect("column type was just looked up")
            .constraints
            .push(constraint);
    }
    Ok(())
}
