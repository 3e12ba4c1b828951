//! Constraint kinds and their application to domains.

use crate::domain::{BoolDomain, Domain, DomainError, IntDomain};

/// An immutable predicate fragment attached to a column.
///
/// Integer constraints apply to integer and timestamp domains (timestamps
/// carry their payload as epoch seconds); the boolean constraints apply to
/// boolean domains. Applying a constraint to the wrong domain kind fails
/// with [`DomainError::TypeMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// `column = v`: narrow to the single point `v`
    IntEq(i64),
    /// `column != v`: remove the point `v`
    IntNEq(i64),
    /// `column < v`: narrow to `[total_min, v - 1]`
    IntLt(i64),
    /// `column <= v`: narrow to `[total_min, v]`
    IntLte(i64),
    /// `column > v`: narrow to `[v + 1, total_max]`
    IntGt(i64),
    /// `column >= v`: narrow to `[v, total_max]`
    IntGte(i64),
    /// A bare boolean reference: pin the domain to `true`
    BoolTrue,
    /// A negated boolean reference: pin the domain to `false`
    BoolFalse,
}

impl Constraint {
    /// Apply the constraint, tightening the domain's feasible set.
    ///
    /// The ordering constraints read `total_min`/`total_max` from the domain
    /// at the moment of application; for a consistent conjunction the final
    /// feasible set is independent of application order.
    pub fn apply(&self, domain: &mut Domain) -> Result<(), DomainError> {
        match *self {
            Constraint::IntEq(v) => int_domain(domain)?.narrow(v, v),
            Constraint::IntNEq(v) => {
                int_domain(domain)?.split(v);
                Ok(())
            }
            Constraint::IntLt(v) => {
                let d = int_domain(domain)?;
                let lo = d.total_min();
                d.narrow(lo, v.saturating_sub(1))
            }
            Constraint::IntLte(v) => {
                let d = int_domain(domain)?;
                let lo = d.total_min();
                d.narrow(lo, v)
            }
            Constraint::IntGt(v) => {
                let d = int_domain(domain)?;
                let hi = d.total_max();
                d.narrow(v.saturating_add(1), hi)
            }
            Constraint::IntGte(v) => {
                let d = int_domain(domain)?;
                let hi = d.total_max();
                d.narrow(v, hi)
            }
            Constraint::BoolTrue => bool_domain(domain)?.pin(true),
            Constraint::BoolFalse => bool_domain(domain)?.pin(false),
        }
    }
}

fn int_domain(domain: &mut Domain) -> Result<&mut IntDomain, DomainError> {
    domain.as_int_mut().ok_or(DomainError::TypeMismatch)
}

fn bool_domain(domain: &mut Domain) -> Result<&mut BoolDomain, DomainError> {
    domain.as_bool_mut().ok_or(DomainError::TypeMismatch)
}
