//! Per-cell feasible-value domains.
//!
//! A fresh domain is built for every (row, column) pair, tightened by the
//! column's constraints, sampled once, and discarded. Integer and timestamp
//! domains track the feasible set as a union of disjoint closed intervals
//! together with the tightest lower and upper bounds enforced so far;
//! boolean domains are a value plus a pinned flag.

use interval_set::{Interval, IntervalSet};
use rand::Rng;
use thiserror::Error;

use crate::schema::{ColumnType, Value};
use crate::timestamp::from_int;

/// Errors produced by constraint application and sampling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Narrowing to the given interval left no feasible values
    #[error("interval [{lo}, {hi}] is not allowed")]
    IntervalNotAllowed { lo: i64, hi: i64 },

    /// A sample was requested from a domain with no values left
    ///
    /// Distinct from [`IntervalNotAllowed`](DomainError::IntervalNotAllowed):
    /// removing the last remaining point empties the domain without failing,
    /// and the fault only surfaces when a sample is drawn.
    #[error("no values left to sample")]
    EmptyDomain,

    /// A boolean constraint contradicted the already-pinned value
    #[error("boolean domain already pinned to {}, cannot require {required}", !required)]
    BoolConflict { required: bool },

    /// A constraint was applied to a domain of the wrong type
    #[error("constraint does not apply to this domain type")]
    TypeMismatch,
}

/// Initial bounds of a fresh integer domain.
pub const INT_DOMAIN_MIN: i64 = -1_000_000;
pub const INT_DOMAIN_MAX: i64 = 1_000_000;

/// Initial bounds of a fresh timestamp domain: epoch seconds up to the
/// signed 32-bit maximum (2038-01-19 UTC).
pub const TIMESTAMP_DOMAIN_MIN: i64 = 0;
pub const TIMESTAMP_DOMAIN_MAX: i64 = i32::MAX as i64;

/// The feasible values of one integer-typed cell.
#[derive(Debug, Clone)]
pub struct IntDomain {
    set: IntervalSet,
    total_min: i64,
    total_max: i64,
}

impl Default for IntDomain {
    fn default() -> Self {
        Self::new()
    }
}

impl IntDomain {
    /// A fresh domain spanning `[-1_000_000, 1_000_000]`.
    pub fn new() -> IntDomain {
        IntDomain::with_bounds(INT_DOMAIN_MIN, INT_DOMAIN_MAX)
    }

    pub(crate) fn with_bounds(lo: i64, hi: i64) -> IntDomain {
        IntDomain {
            set: IntervalSet::new(Interval::new(lo, hi)),
            total_min: lo,
            total_max: hi,
        }
    }

    /// The tightest lower bound enforced so far. Only ever increases.
    pub fn total_min(&self) -> i64 {
        self.total_min
    }

    /// The tightest upper bound enforced so far. Only ever decreases.
    pub fn total_max(&self) -> i64 {
        self.total_max
    }

    /// Intersect the feasible set with the closed interval `[lo, hi]`.
    ///
    /// An inverted interval (`lo > hi`) or one that overlaps nothing fails
    /// with [`DomainError::IntervalNotAllowed`] and leaves the domain
    /// unchanged. On success the total bounds tighten to the extrema of the
    /// surviving set.
    pub fn narrow(&mut self, lo: i64, hi: i64) -> Result<(), DomainError> {
        if lo > hi {
            return Err(DomainError::IntervalNotAllowed { lo, hi });
        }
        self.set
            .intersect(Interval::new(lo, hi))
            .map_err(|_| DomainError::IntervalNotAllowed { lo, hi })?;
        self.total_min = self.total_min.max(self.set.min().expect("set non-empty after intersect"));
        self.total_max = self.total_max.min(self.set.max().expect("set non-empty after intersect"));
        Ok(())
    }

    /// Remove a single point from the feasible set.
    ///
    /// Removing the last remaining point leaves the domain empty; the fault
    /// surfaces as [`DomainError::EmptyDomain`] at sample time. The total
    /// bounds are not tightened, since the point may lie anywhere in the
    /// range.
    pub fn split(&mut self, p: i64) {
        self.set.remove_point(p);
    }

    /// Draw one value uniformly from the feasible set.
    ///
    /// Each interval is weighted by the number of values it holds, so the
    /// draw is uniform across the whole union.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<i64, DomainError> {
        let total = self.set.len();
        if total == 0 {
            return Err(DomainError::EmptyDomain);
        }
        let rank = rng.gen_range(0..total);
        Ok(self.set.nth(rank).expect("rank is below the set length"))
    }

    /// The current feasible intervals, sorted and disjoint.
    pub fn intervals(&self) -> &[Interval] {
        self.set.intervals()
    }
}

/// An [`IntDomain`] over epoch seconds.
///
/// Sampled integers are reinterpreted as seconds since the Unix epoch, so
/// the initial range covers 1970 through the signed-32-bit rollover in 2038.
#[derive(Debug, Clone)]
pub struct TimestampDomain {
    inner: IntDomain,
}

impl Default for TimestampDomain {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampDomain {
    /// A fresh domain spanning `[0, 2_147_483_647]` seconds.
    pub fn new() -> TimestampDomain {
        TimestampDomain {
            inner: IntDomain::with_bounds(TIMESTAMP_DOMAIN_MIN, TIMESTAMP_DOMAIN_MAX),
        }
    }

    pub fn total_min(&self) -> i64 {
        self.inner.total_min()
    }

    pub fn total_max(&self) -> i64 {
        self.inner.total_max()
    }

    pub fn narrow(&mut self, lo: i64, hi: i64) -> Result<(), DomainError> {
        self.inner.narrow(lo, hi)
    }

    pub fn split(&mut self, p: i64) {
        self.inner.split(p)
    }

    /// Draw one value uniformly, as epoch seconds.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<i64, DomainError> {
        self.inner.sample(rng)
    }
}

/// The feasible values of one boolean-typed cell: a value and whether a
/// constraint has pinned it.
#[derive(Debug, Clone)]
pub struct BoolDomain {
    value: bool,
    pinned: bool,
}

impl Default for BoolDomain {
    fn default() -> Self {
        Self::new()
    }
}

impl BoolDomain {
    /// A fresh domain: `true`, not yet pinned.
    pub fn new() -> BoolDomain {
        BoolDomain {
            value: true,
            pinned: false,
        }
    }

    /// Fix the domain's value.
    ///
    /// Once pinned, a contradicting requirement fails with
    /// [`DomainError::BoolConflict`]; re-pinning to the same value is fine.
    pub fn pin(&mut self, required: bool) -> Result<(), DomainError> {
        if self.pinned && self.value != required {
            return Err(DomainError::BoolConflict { required });
        }
        self.value = required;
        self.pinned = true;
        Ok(())
    }

    /// The domain's value; sampling a boolean domain never consults the RNG.
    pub fn sample(&self) -> bool {
        self.value
    }
}

/// A freshly constructed feasible set for one cell, dispatched by column
/// type.
#[derive(Debug, Clone)]
pub enum Domain {
    Int(IntDomain),
    Timestamp(TimestampDomain),
    Bool(BoolDomain),
}

impl Domain {
    /// A fresh domain for a column of the given type, or [`None`] for types
    /// the solver does not handle.
    pub fn new(ty: ColumnType) -> Option<Domain> {
        match ty {
            ColumnType::Int => Some(Domain::Int(IntDomain::new())),
            ColumnType::Timestamp => Some(Domain::Timestamp(TimestampDomain::new())),
            ColumnType::Bool => Some(Domain::Bool(BoolDomain::new())),
            ColumnType::Text => None,
        }
    }

    pub(crate) fn as_int_mut(&mut self) -> Option<&mut IntDomain> {
        match self {
            Domain::Int(d) => Some(d),
            Domain::Timestamp(d) => Some(&mut d.inner),
            Domain::Bool(_) => None,
        }
    }

    pub(crate) fn as_bool_mut(&mut self) -> Option<&mut BoolDomain> {
        match self {
            Domain::Bool(d) => Some(d),
            Domain::Int(_) | Domain::Timestamp(_) => None,
        }
    }

    /// Draw one value from the feasible set, converting it to the cell's
    /// [`Value`] representation.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Result<Value, DomainError> {
        match self {
            Domain::Int(d) => d.sample(rng).map(Value::Int),
            Domain::Timestamp(d) => d.sample(rng).map(|secs| Value::Timestamp(from_int(secs))),
            Domain::Bool(d) => Ok(Value::Bool(d.sample())),
        }
    }
}
