//! Extended-precision arithmetic.
//!
//! Remez iteration and high-order residual interpolation are ill-conditioned
//! in machine doubles, so all fitting and root-finding arithmetic runs on
//! arbitrary-precision binary floats. The working precision is carried by an
//! explicit [`Precision`] context threaded through every call; results are
//! narrowed to `f64` only at the output boundary.

use dashu::float::round::mode::HalfEven;
use dashu::float::FBig;

/// The extended-precision scalar used throughout the fitting pipeline.
pub type Real = FBig<HalfEven, 2>;

/// Working-precision context for a fit or range analysis.
///
/// Values produced through a context carry its precision, and arithmetic
/// between them stays at that precision. Two fits at different precisions may
/// run concurrently; a context is never mutated after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision {
    bits: usize,
}

impl Precision {
    /// Creates a context with the given significand width in bits.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is zero.
    pub fn new(bits: usize) -> Precision {
        assert!(bits > 0, "precision must be at least one bit");

        Precision { bits }
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Lifts a machine double into the working precision.
    ///
    /// # Panics
    ///
    /// Panics if `x` is not finite.
    pub fn real(&self, x: f64) -> Real {
        Real::try_from(x)
            .unwrap()
            .with_precision(self.bits)
            .value()
    }

    /// An integer at the working precision.
    pub fn int(&self, n: i64) -> Real {
        Real::from(n).with_precision(self.bits).value()
    }

    pub fn zero(&self) -> Real {
        self.int(0)
    }

    pub fn one(&self) -> Real {
        self.int(1)
    }

    /// Threshold below which a trailing coefficient of a polynomial with
    /// largest coefficient magnitude `scale` is treated as zero by the root
    /// isolator.
    pub fn trim_epsilon(&self, scale: &Real) -> Real {
        let guard = self.bits.saturating_sub(8) as i32;

        abs(scale) * pow2(-guard)
    }
}

/// Absolute value.
pub fn abs(x: &Real) -> Real {
    if *x < Real::ZERO {
        -x.clone()
    } else {
        x.clone()
    }
}

/// An integer carried at the precision of `like`.
pub fn int_like(like: &Real, n: i64) -> Real {
    Real::from(n).with_precision(like.precision()).value()
}

/// Exact power of two.
pub fn pow2(k: i32) -> Real {
    // Products with a one-bit significand are always exact.
    let step = if k < 0 {
        Real::try_from(0.5).unwrap()
    } else {
        Real::from(2)
    };

    let mut r = Real::ONE;

    for _ in 0..k.unsigned_abs() {
        r *= &step;
    }

    r
}

/// Scales by a power of two. Exact apart from the precision of `x` itself.
pub fn ldexp(x: &Real, k: i32) -> Real {
    x.clone() * pow2(k)
}

/// Binary exponent `e` with `0.5 <= |x| / 2^e < 1`, as reported by a
/// `frexp`-style decomposition. Zero maps to zero.
pub fn frexp_exp(x: &Real) -> i32 {
    if *x == Real::ZERO {
        return 0;
    }

    let half = pow2(-1);
    let two = Real::from(2);

    let mut v = abs(x);
    let mut e = 0;

    while v >= Real::ONE {
        v *= &half;
        e += 1;
    }

    while v < half {
        v *= &two;
        e -= 1;
    }

    e
}

/// Largest integer not exceeding `x`.
///
/// The bisection uses only exact integer lifts and comparisons, so the result
/// is exact at any precision.
///
/// # Panics
///
/// Panics if `|x| >= 2^61`.
pub fn floor_i64(x: &Real) -> i64 {
    // The bracket width must itself stay inside i64.
    let mut lo = -(1i64 << 61);
    let mut hi = 1i64 << 61;

    assert!(Real::from(lo) <= *x && *x < Real::from(hi));

    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;

        if Real::from(mid) <= *x {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    lo
}

/// Nearest integer, rounding halves away from zero.
pub fn round_i64(x: &Real) -> i64 {
    let half = pow2(-1);

    if *x >= Real::ZERO {
        floor_i64(&(x.clone() + half))
    } else {
        -floor_i64(&(-x.clone() + half))
    }
}

/// Narrows to a machine double.
pub fn to_f64(x: &Real) -> f64 {
    x.to_f64().value()
}

/// `x^e` computed as `exp(e ln x)`, for positive `x`.
pub fn powf(x: &Real, e: &Real) -> Real {
    (e.clone() * x.ln()).exp()
}

#[cfg(test)]
mod tests {
    use dashu::base::SquareRoot;

    use super::*;

    #[test]
    fn lift_and_narrow_round_trip() {
        let ctx = Precision::new(160);

        assert_eq!(to_f64(&ctx.real(0.1)), 0.1);
        assert_eq!(to_f64(&ctx.real(-3.5)), -3.5);
        assert_eq!(to_f64(&ctx.int(1 << 40)), (1u64 << 40) as f64);
    }

    #[test]
    fn frexp_exponents() {
        let ctx = Precision::new(106);

        assert_eq!(frexp_exp(&ctx.real(1.0)), 1);
        assert_eq!(frexp_exp(&ctx.real(0.5)), 0);
        assert_eq!(frexp_exp(&ctx.real(0.25)), -1);
        assert_eq!(frexp_exp(&ctx.real(3.0)), 2);
        assert_eq!(frexp_exp(&ctx.real(-8.0)), 4);
        assert_eq!(frexp_exp(&ctx.real(0.0)), 0);
    }

    #[test]
    fn power_of_two_scaling() {
        let ctx = Precision::new(106);

        assert_eq!(to_f64(&pow2(5)), 32.0);
        assert_eq!(to_f64(&pow2(-3)), 0.125);
        assert_eq!(to_f64(&ldexp(&ctx.real(1.5), 4)), 24.0);
        assert_eq!(to_f64(&ldexp(&ctx.real(3.0), -1)), 1.5);
    }

    #[test]
    fn exact_integer_rounding() {
        let ctx = Precision::new(106);

        assert_eq!(floor_i64(&ctx.real(2.75)), 2);
        assert_eq!(floor_i64(&ctx.real(-2.25)), -3);
        assert_eq!(round_i64(&ctx.real(2.5)), 3);
        assert_eq!(round_i64(&ctx.real(-2.5)), -3);
        assert_eq!(round_i64(&ctx.real(2.49)), 2);

        // Beyond the 53-bit mantissa of f64, on both sides of zero.
        let big = ldexp(&ctx.one(), 60) + ctx.one();
        assert_eq!(floor_i64(&big), (1i64 << 60) + 1);
        assert_eq!(floor_i64(&-big.clone()), -(1i64 << 60) - 1);
        assert_eq!(round_i64(&big), (1i64 << 60) + 1);
    }

    #[test]
    fn extended_sqrt_is_better_than_double() {
        let ctx = Precision::new(160);

        let two = ctx.real(2.0);
        let r = two.sqrt();

        // sqrt(2)^2 recovers 2 to well below double precision.
        let err = to_f64(&abs(&(r.clone() * r - two)));
        assert!(err < 1e-40);
    }
}
