use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use derive_more::{Display, From, Into};

use crate::constraint::Constraint;

/// The declared type of a column, driving which domain solves its
/// constraints.
///
/// Only [`Int`](ColumnType::Int), [`Timestamp`](ColumnType::Timestamp), and
/// [`Bool`](ColumnType::Bool) are solvable; [`Text`](ColumnType::Text)
/// columns are recognized by the schema but rejected at binding time.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ColumnType {
    Int,
    Timestamp,
    Bool,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "int"),
            ColumnType::Timestamp => write!(f, "timestamp"),
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// The name of a column in a table schema.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, From, Into, Display, Clone)]
#[repr(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnName {
    fn from(name: &str) -> Self {
        ColumnName(name.to_owned())
    }
}

impl Borrow<str> for ColumnName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A schema column: its name, type, and the constraints bound to it.
///
/// Constraints are attached once by the binder, in the order they appear in
/// the condition IR, and re-read for every generated row.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: ColumnName,
    pub ty: ColumnType,
    pub constraints: Vec<Constraint>,
}

impl Column {
    /// A column with no constraints bound yet.
    pub fn new<N: Into<ColumnName>>(name: N, ty: ColumnType) -> Column {
        Column {
            name: name.into(),
            ty,
            constraints: Vec::new(),
        }
    }

    /// A column with the given constraints already attached.
    pub fn with_constraints<N: Into<ColumnName>>(
        name: N,
        ty: ColumnType,
        constraints: Vec<Constraint>,
    ) -> Column {
        Column {
            name: name.into(),
            ty,
            constraints,
        }
    }
}

/// A single generated cell value, routed to a sink by the column's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Timestamp(DateTime<Utc>),
    Bool(bool),
}
