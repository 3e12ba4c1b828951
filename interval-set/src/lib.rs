//! Sets of disjoint closed integer intervals.
//!
//! An [`IntervalSet`] stores an ordered list of non-overlapping, non-touching
//! closed intervals over `i64` and supports the operations a feasible-value
//! domain needs: union-style insertion, intersection with a window, removal of
//! a single point, and positional lookup of the n-th contained value.
//!
//! # Implementation
//!
//! The intervals are kept in a sorted `Vec`. All mutating operations rebuild
//! the list in a single pass, preserving three invariants: intervals are
//! sorted ascending by their lower endpoint, every interval is non-empty
//! (`lo <= hi`), and consecutive intervals are separated by a gap of at least
//! one (touching intervals are merged on insertion). The set itself may be
//! empty, which callers observe through [`IntervalSet::is_empty`] and a
//! [`len`](IntervalSet::len) of zero.

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when narrowing an [`IntervalSet`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Intersecting with the given window left no values in the set
    #[error("intersection with {0} is empty")]
    EmptyIntersection(Interval),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A non-empty closed interval `[lo, hi]` of `i64` values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    lo: i64,
    hi: i64,
}

impl Interval {
    /// Construct a closed interval from its endpoints.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi`.
    #[track_caller]
    pub fn new(lo: i64, hi: i64) -> Self {
        if lo > hi {
            panic!("interval lower endpoint {lo} is greater than upper endpoint {hi}");
        }
        Interval { lo, hi }
    }

    /// The lower endpoint, included in the interval.
    pub fn lo(&self) -> i64 {
        self.lo
    }

    /// The upper endpoint, included in the interval.
    pub fn hi(&self) -> i64 {
        self.hi
    }

    /// The number of values in the interval.
    ///
    /// ```rust
    /// use interval_set::Interval;
    ///
    /// assert_eq!(Interval::new(-1, 1).len(), 3);
    /// assert_eq!(Interval::new(7, 7).len(), 1);
    /// ```
    pub fn len(&self) -> u64 {
        self.hi.abs_diff(self.lo).saturating_add(1)
    }

    /// Whether `v` falls within the interval.
    pub fn contains(&self, v: i64) -> bool {
        self.lo <= v && v <= self.hi
    }

    fn intersection(&self, other: &Interval) -> Option<Interval> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        (lo <= hi).then_some(Interval { lo, hi })
    }

    /// Whether `other` overlaps or directly abuts this interval, i.e. whether
    /// the two can be merged into one.
    fn touches(&self, other: &Interval) -> bool {
        // Saturating on purpose: [i64::MAX, i64::MAX] touches nothing above.
        self.lo <= other.hi.saturating_add(1) && other.lo <= self.hi.saturating_add(1)
    }
}

impl Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// An ordered set of disjoint closed intervals.
///
/// See [crate documentation](crate) for the maintained invariants.
///
/// # Examples
///
/// ```rust
/// use interval_set::{Interval, IntervalSet};
///
/// let mut set = IntervalSet::new(Interval::new(0, 10));
/// set.remove_point(5);
///
/// assert_eq!(set.len(), 10);
/// assert!(!set.contains(5));
/// assert_eq!(set.intervals(), &[Interval::new(0, 4), Interval::new(6, 10)]);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl Debug for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.intervals.iter()).finish()
    }
}

impl IntervalSet {
    /// Construct a set covering a single interval.
    pub fn new(interval: Interval) -> Self {
        IntervalSet {
            intervals: vec![interval],
        }
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The total number of values covered by the set.
    pub fn len(&self) -> u64 {
        self.intervals
            .iter()
            .fold(0u64, |acc, iv| acc.saturating_add(iv.len()))
    }

    /// The smallest value in the set, if any.
    pub fn min(&self) -> Option<i64> {
        self.intervals.first().map(Interval::lo)
    }

    /// The largest value in the set, if any.
    pub fn max(&self) -> Option<i64> {
        self.intervals.last().map(Interval::hi)
    }

    /// Whether `v` is covered by the set.
    pub fn contains(&self, v: i64) -> bool {
        self.intervals.iter().any(|iv| iv.contains(v))
    }

    /// The intervals of the set, sorted ascending and pairwise disjoint.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Insert an interval, merging it with any intervals it overlaps or
    /// touches.
    ///
    /// ```rust
    /// use interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new(Interval::new(0, 3));
    /// set.insert(Interval::new(10, 12));
    /// set.insert(Interval::new(4, 9));
    ///
    /// assert_eq!(set.intervals(), &[Interval::new(0, 12)]);
    /// ```
    pub fn insert(&mut self, interval: Interval) {
        let mut merged = interval;
        let mut out = Vec::with_capacity(self.intervals.len() + 1);
        let mut placed = false;
        for iv in &self.intervals {
            if iv.touches(&merged) {
                merged = Interval {
                    lo: merged.lo.min(iv.lo),
                    hi: merged.hi.max(iv.hi),
                };
            } else if iv.hi < merged.lo {
                out.push(*iv);
            } else {
                if !placed {
                    out.push(merged);
                    placed = true;
                }
                out.push(*iv);
            }
        }
        if !placed {
            out.push(merged);
        }
        self.intervals = out;
    }

    /// Intersect the set with a closed window, keeping only the parts of each
    /// interval that fall within it.
    ///
    /// Fails with [`Error::EmptyIntersection`] if nothing survives, in which
    /// case the set is left unchanged.
    pub fn intersect(&mut self, window: Interval) -> Result<()> {
        let kept: Vec<Interval> = self
            .intervals
            .iter()
            .filter_map(|iv| iv.intersection(&window))
            .collect();
        if kept.is_empty() {
            return Err(Error::EmptyIntersection(window));
        }
        self.intervals = kept;
        Ok(())
    }

    /// Remove a single point from the set.
    ///
    /// An interval strictly containing `p` is split in two; an interval with
    /// `p` at an endpoint is shrunk; a singleton `[p, p]` is dropped, which
    /// may leave the set empty.
    pub fn remove_point(&mut self, p: i64) {
        let mut out = Vec::with_capacity(self.intervals.len() + 1);
        for iv in &self.intervals {
            if !iv.contains(p) {
                out.push(*iv);
                continue;
            }
            if iv.lo < p {
                out.push(Interval { lo: iv.lo, hi: p - 1 });
            }
            if p < iv.hi {
                out.push(Interval { lo: p + 1, hi: iv.hi });
            }
        }
        self.intervals = out;
    }

    /// The `rank`-th smallest value in the set, or [`None`] if `rank` is out
    /// of range.
    ///
    /// Ranks are zero-based, so `nth(0)` is [`min`](IntervalSet::min) and
    /// `nth(len() - 1)` is [`max`](IntervalSet::max).
    ///
    /// ```rust
    /// use interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new(Interval::new(0, 2));
    /// set.insert(Interval::new(10, 11));
    ///
    /// let values: Vec<i64> = (0..set.len()).filter_map(|r| set.nth(r)).collect();
    /// assert_eq!(values, vec![0, 1, 2, 10, 11]);
    /// ```
    pub fn nth(&self, rank: u64) -> Option<i64> {
        let mut rank = rank;
        for iv in &self.intervals {
            let count = iv.len();
            if rank < count {
                return Some(iv.lo + rank as i64);
            }
            rank -= count;
        }
        None
    }
}
