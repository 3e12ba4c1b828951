//! The columnar sink rows are generated into.

use std::collections::HashMap;
use std::sync::Mutex;

use arrow::array::{Int64Array, Int64Builder};
use chrono::{DateTime, Utc};

use crate::schema::{Column, ColumnName, ColumnType, Value};

/// A table: a schema, a target row count, and per-column typed sinks.
///
/// Integer columns accumulate in arrow builders and are finalized into
/// immutable [`Int64Array`]s; timestamp and boolean columns accumulate in
/// plain vectors. Appends are serialized by one mutex per type family, which
/// is coarse but cheap enough for the append-only write pattern.
#[derive(Debug)]
pub struct Table {
    schema: Vec<Column>,
    types: HashMap<ColumnName, ColumnType>,
    rows: usize,
    ints: Mutex<IntSink>,
    timestamps: Mutex<HashMap<ColumnName, Vec<DateTime<Utc>>>>,
    bools: Mutex<HashMap<ColumnName, Vec<bool>>>,
}

#[derive(Debug, Default)]
struct IntSink {
    builders: HashMap<ColumnName, Int64Builder>,
    arrays: HashMap<ColumnName, Int64Array>,
}

impl Table {
    /// Create a table for `schema` with a target row count of `rows`.
    pub fn new(schema: Vec<Column>, rows: usize) -> Table {
        let types = schema
            .iter()
            .map(|col| (col.name.clone(), col.ty))
            .collect();

        let mut builders = HashMap::new();
        let mut timestamps = HashMap::new();
        let mut bools = HashMap::new();
        for col in &schema {
            match col.ty {
                ColumnType::Int => {
                    builders.insert(col.name.clone(), Int64Builder::new());
                }
                ColumnType::Timestamp => {
                    timestamps.insert(col.name.clone(), Vec::new());
                }
                ColumnType::Bool => {
                    bools.insert(col.name.clone(), Vec::new());
                }
                ColumnType::Text => {}
            }
        }

        Table {
            schema,
            types,
            rows,
            ints: Mutex::new(IntSink {
                builders,
                arrays: HashMap::new(),
            }),
            timestamps: Mutex::new(timestamps),
            bools: Mutex::new(bools),
        }
    }

    /// The target row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The schema columns, in declaration order.
    pub fn schema(&self) -> &[Column] {
        &self.schema
    }

    /// The declared type of the named column.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.types.get(name).copied()
    }

    /// Mutable access to the named schema column, for constraint binding.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.schema.iter_mut().find(|col| col.name.as_str() == name)
    }

    /// Append one value to the named column's sink.
    ///
    /// Safe to call from concurrent generator workers.
    ///
    /// # Panics
    ///
    /// Panics if the column is unknown or `value` does not match its
    /// declared type.
    pub fn append(&self, name: &str, value: Value) {
        match (self.column_type(name), value) {
            (Some(ColumnType::Int), Value::Int(v)) => {
                let mut ints = self.ints.lock().expect("mutex poisoned");
                ints.builders
                    .get_mut(name)
                    .expect("int column has a builder")
                    .append_value(v);
            }
            (Some(ColumnType::Timestamp), Value::Timestamp(v)) => {
                self.timestamps
                    .lock()
                    .expect("mutex poisoned")
                    .get_mut(name)
                    .expect("timestamp column has a sink")
                    .push(v);
            }
            (Some(ColumnType::Bool), Value::Bool(v)) => {
                self.bools
                    .lock()
                    .expect("mutex poisoned")
                    .get_mut(name)
                    .expect("bool column has a sink")
                    .push(v);
            }
            (ty, value) => panic!("cannot append {value:?} to column {name} of type {ty:?}"),
        }
    }

    /// Finalize every integer column: build an immutable array from each
    /// builder, leaving the builder empty for further appends.
    pub fn finalize_ints(&self) {
        let mut ints = self.ints.lock().expect("mutex poisoned");
        let names: Vec<ColumnName> = ints.builders.keys().cloned().collect();
        for name in names {
            let array = ints
                .builders
                .get_mut(&name)
                .expect("name taken from the builder map")
                .finish();
            ints.arrays.insert(name, array);
        }
    }

    /// Sort every finalized integer column ascending, replacing its array
    /// with a sorted copy.
    pub fn sort_ints(&self) {
        let mut ints = self.ints.lock().expect("mutex poisoned");
        let names: Vec<ColumnName> = ints.arrays.keys().cloned().collect();
        for name in names {
            let mut values = ints.arrays[&name].values().to_vec();
            values.sort_unstable();
            ints.arrays.insert(name, Int64Array::from(values));
        }
    }

    /// Sort every timestamp column ascending, in place.
    pub fn sort_timestamps(&self) {
        let mut timestamps = self.timestamps.lock().expect("mutex poisoned");
        for values in timestamps.values_mut() {
            values.sort_unstable();
        }
    }

    /// The finalized array of the named integer column, if
    /// [`finalize_ints`](Table::finalize_ints) has run.
    pub fn ints(&self, name: &str) -> Option<Int64Array> {
        self.ints
            .lock()
            .expect("mutex poisoned")
            .arrays
            .get(name)
            .cloned()
    }

    /// A snapshot of the named timestamp column.
    pub fn timestamps(&self, name: &str) -> Option<Vec<DateTime<Utc>>> {
        self.timestamps
            .lock()
            .expect("mutex poisoned")
            .get(name)
            .cloned()
    }

    /// A snapshot of the named boolean column.
    pub fn bools(&self, name: &str) -> Option<Vec<bool>> {
        self.bools
            .lock()
            .expect("mutex poisoned")
            .get(name)
            .cloned()
    }

    /// Release the integer arrays and builders, then re-initialize an empty
    /// builder for every integer column.
    pub fn wipe(&self) {
        let mut ints = self.ints.lock().expect("mutex poisoned");
        ints.arrays.clear();
        ints.builders.clear();
        for col in &self.schema {
            if col.ty == ColumnType::Int {
                ints.builders.insert(col.name.clone(), Int64Builder::new());
            }
        }
    }
}
