//! Fixed-point coefficient quantization.
//!
//! Converts a fitted floating polynomial into integer coefficients and
//! per-stage right shifts whose integer Horner evaluation tracks the
//! floating evaluation. Each Horner stage is scaled by the smallest power
//! of two covering the range of its sub-polynomial over the domain, and a
//! half-unit rounding offset is baked into every coefficient that still has
//! a shift ahead of it, so the plain arithmetic right shift rounds to
//! nearest instead of toward zero.

use std::fmt;

use crate::poly::{roots, Polynomial};
use crate::utils::interval::Interval;
use crate::utils::real::{
    frexp_exp, ldexp, pow2, round_i64, to_f64, Precision,
};

/// Relative slop applied to range bounds before exponent extraction, so
/// round-off cannot push a boundary value over its chosen scale.
const RANGE_SLOP: f64 = 1e-8;

/// A polynomial quantized for integer-only Horner evaluation.
///
/// All fields are plain data for the benefit of external record formatters
/// and code emitters.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedPoly {
    /// Integer coefficients, lowest degree first. Every coefficient except
    /// the last carries the baked-in rounding offset at its stage's scale;
    /// the last is a plainly rounded constant.
    pub coeffs: Vec<i64>,

    /// Right shift applied after each multiply-accumulate stage; one entry
    /// per coefficient except the last. Every shift is at least 1.
    pub shifts: Vec<u32>,

    /// Power-of-two exponent of the evaluation result.
    pub exponent: i32,

    /// Power-of-two exponent of the integer argument.
    pub x_exp: i32,

    /// Domain of validity, in real (unscaled) units.
    pub a: f64,
    pub b: f64,
}

/// Quantization was infeasible for the requested layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantizeError {
    /// The pinned output exponent is smaller than the range analysis of the
    /// final stage allows.
    Exponent { required: i32, requested: i32 },

    /// A stage alignment produced a shift below 1, which would break the
    /// rounding-by-offset scheme.
    Shift { stage: usize, shift: i32 },
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuantizeError::Exponent {
                required,
                requested,
            } => write!(
                f,
                "requested output exponent {requested} is below the \
                 smallest feasible exponent {required}"
            ),
            QuantizeError::Shift { stage, shift } => write!(
                f,
                "stage {stage} alignment requires shift {shift}, but every \
                 shift must be at least 1"
            ),
        }
    }
}

/// Binary exponent of each Horner stage: the `frexp` exponent of the value
/// range of the sub-polynomial `p[i..]` over the domain, inflated by the
/// slop factor, and no smaller than the exponent of the coefficient added
/// in at that stage.
fn stage_exponents(
    ctx: &Precision,
    p: &Polynomial,
    domain: &Interval,
) -> Vec<i32> {
    let slop = ctx.real(1.0 + RANGE_SLOP);

    let mut exp: Vec<i32> = (0..p.len())
        .map(|i| {
            let (lo, hi) = roots::range(
                ctx,
                &p.tail(i),
                domain.left(),
                domain.right(),
            );

            frexp_exp(&(lo * slop.clone()))
                .max(frexp_exp(&(hi * slop.clone())))
        })
        .collect();

    for i in 1..p.len() {
        let c = &p.coeffs()[i - 1];

        exp[i] = exp[i].max(frexp_exp(&(c.clone() * slop.clone())));
    }

    exp
}

/// Quantizes `p` over `domain` for integer Horner evaluation.
///
/// The integer argument carries an implicit scale of `2^x_exp`; `bits` is
/// the significant width available at every stage (31 for signed 32-bit
/// accumulation with 64-bit products). When `y_exp` is given, the result
/// exponent is pinned to it, provided the range analysis allows.
///
/// # Panics
///
/// Panics if `p` is the zero polynomial, or if a scaled coefficient
/// exceeds the 64-bit integer range (choose a smaller `bits`).
pub fn quantize(
    ctx: &Precision,
    p: &Polynomial,
    domain: &Interval,
    x_exp: i32,
    bits: u32,
    y_exp: Option<i32>,
) -> Result<FixedPoly, QuantizeError> {
    assert!(!p.is_zero(), "cannot quantize the zero polynomial");

    let n = p.len();

    let mut exp = stage_exponents(ctx, p, domain);

    for e in &mut exp {
        *e -= bits as i32;
    }

    if let Some(y) = y_exp {
        if exp[0] > y {
            return Err(QuantizeError::Exponent {
                required: exp[0],
                requested: y,
            });
        }

        exp[0] = y;
    }

    let mut shifts = Vec::with_capacity(n - 1);

    for i in 0..n - 1 {
        let s = exp[i] - exp[i + 1] - x_exp;

        if s < 1 {
            return Err(QuantizeError::Shift { stage: i, shift: s });
        }

        shifts.push(s as u32);
    }

    let half = pow2(-1);
    let mut coeffs = Vec::with_capacity(n);

    for (i, c) in p.coeffs().iter().enumerate() {
        let scaled = ldexp(c, -exp[i]);

        // Bake the rounding offset into every coefficient that still has a
        // shift ahead of it; the arithmetic right shift then floors, which
        // together implements round-to-nearest.
        let scaled = if i < n - 1 {
            ldexp(&(scaled + half.clone()), shifts[i] as i32)
        } else {
            scaled
        };

        coeffs.push(round_i64(&scaled));
    }

    Ok(FixedPoly {
        coeffs,
        shifts,
        exponent: exp[0],
        x_exp,
        a: to_f64(domain.left()),
        b: to_f64(domain.right()),
    })
}
