//! Constraint-driven generation of synthetic tabular test data.
//!
//! Given a schema, a target row count, and the flattened conditions of a
//! query's WHERE/QUALIFY clauses (see [`rowgen_sql`]), this crate binds each
//! condition to its column as a typed [`Constraint`], then generates rows by
//! building a fresh feasible-value [`Domain`](domain::Domain) per cell,
//! tightening it with the column's constraints, and sampling uniformly from
//! whatever remains.
//!
//! Every column is solved independently: the conditions are treated as one
//! big conjunction, and no cross-column correlation is attempted.
//!
//! # Example
//!
//! ```rust
//! use rowgen::{bind_conditions, Column, ColumnType, Generator, Table};
//!
//! let stmt = rowgen_sql::parse_query(
//!     "SELECT * FROM t WHERE col_a = 10",
//! ).unwrap();
//!
//! let mut table = Table::new(vec![Column::new("col_a", ColumnType::Int)], 12);
//! bind_conditions(&mut table, &stmt.conditions()).unwrap();
//!
//! Generator::new().generate(&table, 42).unwrap();
//! table.finalize_ints();
//! table.sort_ints();
//!
//! let values = table.ints("col_a").unwrap();
//! assert!(values.iter().all(|v| v == Some(10)));
//! ```

pub use self::bind::{bind_conditions, make_constraint, BindError};
pub use self::constraint::Constraint;
pub use self::domain::{BoolDomain, Domain, DomainError, IntDomain, TimestampDomain};
pub use self::generate::{GenerateError, Generator, DEFAULT_WORKERS};
pub use self::schema::{Column, ColumnName, ColumnType, Value};
pub use self::table::Table;

pub mod bind;
pub mod constraint;
pub mod domain;
pub mod generate;
pub mod schema;
pub mod table;
pub mod timestamp;
