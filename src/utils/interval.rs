//! Closed intervals of validity.

use std::fmt;

use super::real::{to_f64, Precision, Real};

/// A closed interval `[a, b]` over which a fit or range analysis is valid.
#[derive(Clone, Debug)]
pub struct Interval {
    a: Real,
    b: Real,
}

impl Interval {
    /// Creates the interval `[a, b]`.
    ///
    /// # Panics
    ///
    /// Panics unless `a < b`.
    pub fn new(a: Real, b: Real) -> Interval {
        assert!(a < b, "interval endpoints must satisfy a < b");

        Interval { a, b }
    }

    /// Creates the interval `[a, b]` from machine doubles.
    ///
    /// # Panics
    ///
    /// Panics unless `a < b` and both endpoints are finite.
    pub fn from_f64(ctx: &Precision, a: f64, b: f64) -> Interval {
        Interval::new(ctx.real(a), ctx.real(b))
    }

    pub fn left(&self) -> &Real {
        &self.a
    }

    pub fn right(&self) -> &Real {
        &self.b
    }

    pub fn contains(&self, x: &Real) -> bool {
        self.a <= *x && *x <= self.b
    }

    /// Refuses evaluation outside the interval.
    pub fn check(&self, x: &Real) -> Result<(), DomainError> {
        if self.contains(x) {
            Ok(())
        } else {
            Err(DomainError {
                x: to_f64(x),
                a: to_f64(&self.a),
                b: to_f64(&self.b),
            })
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", to_f64(&self.a), to_f64(&self.b))
    }
}

/// An evaluation was requested outside the declared validity interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainError {
    pub x: f64,
    pub a: f64,
    pub b: f64,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "argument {} outside validity interval [{}, {}]",
            self.x, self.a, self.b
        )
    }
}
