//! The parallel row generator.

use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Domain;
use crate::schema::Column;
use crate::table::Table;

/// Default number of generator workers.
pub const DEFAULT_WORKERS: usize = 4;

/// Errors detected before any generation work starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// The row count does not divide evenly across the workers
    #[error("number of rows ({rows}) is not divisible by the number of workers ({workers})")]
    UnevenPartition { rows: usize, workers: usize },
}

/// Generates a table's worth of values satisfying each column's constraints.
///
/// The row count is partitioned evenly across `workers` scoped threads. Each
/// worker owns an RNG stream derived from the seed and its worker index, so
/// the multiset of values in every column is a pure function of (schema,
/// constraints, seed, rows, workers). The interleaving of appends across
/// workers is not deterministic; callers wanting a deterministic observable
/// sort the columns afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Generator {
    workers: usize,
}

impl Default for Generator {
    fn default() -> Self {
        Generator {
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Generator {
    /// A generator with the default worker count.
    pub fn new() -> Generator {
        Generator::default()
    }

    /// A generator with an explicit worker count.
    pub fn with_workers(workers: usize) -> Generator {
        Generator { workers }
    }

    /// Fill `table` with `table.rows()` rows drawn from each column's
    /// constrained domain.
    ///
    /// # Panics
    ///
    /// Per-cell domain and sampling faults are fatal: an infeasible
    /// constraint conjunction panics mid-run rather than producing a
    /// partial table.
    pub fn generate(&self, table: &Table, seed: u64) -> Result<(), GenerateError> {
        let rows = table.rows();
        if rows % self.workers != 0 {
            return Err(GenerateError::UnevenPartition {
                rows,
                workers: self.workers,
            });
        }
        let rows_per_worker = rows / self.workers;
        info!(rows, workers = self.workers, "generating table data");

        thread::scope(|scope| {
            for worker in 0..self.workers {
                let mut rng = StdRng::seed_from_u64(seed ^ worker as u64);
                scope.spawn(move || {
                    debug!(worker, rows = rows_per_worker, "worker started");
                    for _ in 0..rows_per_worker {
                        for column in table.schema() {
                            generate_cell(table, column, &mut rng);
                        }
                    }
                });
            }
        });

        Ok(())
    }
}

/// Build a fresh domain for the column, tighten it with every bound
/// constraint in order, sample once, and append to the sink. Text columns
/// have no domain and are skipped.
fn generate_cell(table: &Table, column: &Column, rng: &mut StdRng) {
    let Some(mut domain) = Domain::new(column.ty) else {
        return;
    };
    for constraint in &column.constraints {
        if let Err(e) = constraint.apply(&mut domain) {
            panic!("column {}: {}", column.name, e);
        }
    }
    let value = match domain.sample(rng) {
        Ok(value) => value,
        Err(e) => panic!("column {}: {}", column.name, e),
    };
    table.append(column.name.as_str(), value);
}
