//! Dense polynomial algebra over extended-precision reals.

pub mod roots;

use itertools::{EitherOrBoth, Itertools};

use crate::utils::real::{abs, int_like, to_f64, Precision, Real};

/// An immutable dense polynomial `c[0] + c[1] x + ... + c[n] x^n`.
///
/// Coefficients are stored lowest degree first. The empty coefficient vector
/// is the zero polynomial; the algebra never drops trailing near-zero
/// coefficients on its own (see [`Polynomial::trim`]).
#[derive(Clone, Debug)]
pub struct Polynomial {
    coeffs: Vec<Real>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<Real>) -> Polynomial {
        Polynomial { coeffs }
    }

    pub fn zero() -> Polynomial {
        Polynomial { coeffs: Vec::new() }
    }

    pub fn constant(c: Real) -> Polynomial {
        Polynomial { coeffs: vec![c] }
    }

    /// Lifts machine-double coefficients into the working precision.
    pub fn from_f64(ctx: &Precision, coeffs: &[f64]) -> Polynomial {
        Polynomial {
            coeffs: coeffs.iter().map(|&c| ctx.real(c)).collect(),
        }
    }

    /// Narrows the coefficients to machine doubles.
    pub fn to_f64(&self) -> Vec<f64> {
        self.coeffs.iter().map(to_f64).collect()
    }

    pub fn coeffs(&self) -> &[Real] {
        &self.coeffs
    }

    /// Number of coefficients (degree plus one, zero for the zero
    /// polynomial).
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// The Horner sub-polynomial `c[start] + c[start+1] x + ...`.
    pub fn tail(&self, start: usize) -> Polynomial {
        Polynomial {
            coeffs: self.coeffs[start..].to_vec(),
        }
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let coeffs = self
            .coeffs
            .iter()
            .zip_longest(&other.coeffs)
            .map(|pair| match pair {
                EitherOrBoth::Both(a, b) => a.clone() + b.clone(),
                EitherOrBoth::Left(a) => a.clone(),
                EitherOrBoth::Right(b) => b.clone(),
            })
            .collect();

        Polynomial { coeffs }
    }

    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }

        let n = self.coeffs.len() + other.coeffs.len() - 1;
        let zero = int_like(&self.coeffs[0], 0);
        let mut coeffs = vec![zero; n];

        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] = coeffs[i + j].clone() + a.clone() * b.clone();
            }
        }

        Polynomial { coeffs }
    }

    pub fn derivative(&self) -> Polynomial {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c.clone() * int_like(c, i as i64))
            .collect();

        Polynomial { coeffs }
    }

    /// Evaluates by Horner's rule. The zero polynomial evaluates to zero.
    pub fn eval(&self, x: &Real) -> Real {
        let mut y = int_like(x, 0);

        for c in self.coeffs.iter().rev() {
            y = y * x.clone() + c.clone();
        }

        y
    }

    /// Pointwise evaluation over a sequence of abscissae.
    pub fn eval_multi(&self, xs: &[Real]) -> Vec<Real> {
        xs.iter().map(|x| self.eval(x)).collect()
    }

    /// Substitutes the polynomial `x` for the indeterminate, by Horner's
    /// rule over polynomials. Used to remap a fit from a normalized domain
    /// back to its natural domain.
    pub fn compose(&self, x: &Polynomial) -> Polynomial {
        let Some(last) = self.coeffs.last() else {
            return Polynomial::zero();
        };

        let mut y = Polynomial::constant(last.clone());

        for c in self.coeffs.iter().rev().skip(1) {
            y = y.mul(x);

            if y.coeffs.is_empty() {
                y.coeffs.push(int_like(c, 0));
            }

            y.coeffs[0] = y.coeffs[0].clone() + c.clone();
        }

        y
    }

    /// Drops trailing coefficients of magnitude at most `epsilon`, reducing
    /// the effective degree of a numerically degenerate polynomial.
    pub fn trim(&self, epsilon: &Real) -> Polynomial {
        let mut coeffs = self.coeffs.clone();

        while let Some(c) = coeffs.last() {
            if abs(c) <= *epsilon {
                coeffs.pop();
            } else {
                break;
            }
        }

        Polynomial { coeffs }
    }

    /// Largest coefficient magnitude, or zero for the zero polynomial.
    pub fn scale(&self) -> Real {
        let mut max = Real::ZERO;

        for c in &self.coeffs {
            let m = abs(c);

            if m > max {
                max = m;
            }
        }

        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Precision {
        Precision::new(106)
    }

    #[test]
    fn horner_matches_naive_summation() {
        let ctx = ctx();
        let p = Polynomial::from_f64(&ctx, &[1.5, -2.0, 0.25, 3.0, -0.5]);

        for &x in &[-2.0f64, -0.3, 0.0, 0.7, 1.0, 4.2] {
            let naive: f64 = p
                .to_f64()
                .iter()
                .enumerate()
                .map(|(i, c)| c * x.powi(i as i32))
                .sum();

            let y = to_f64(&p.eval(&ctx.real(x)));
            assert!((y - naive).abs() < 1e-12, "x = {x}: {y} vs {naive}");
        }
    }

    #[test]
    fn addition_aligns_lengths() {
        let ctx = ctx();
        let p = Polynomial::from_f64(&ctx, &[1.0, 2.0]);
        let q = Polynomial::from_f64(&ctx, &[0.5, 0.5, 3.0]);

        assert_eq!(p.add(&q).to_f64(), vec![1.5, 2.5, 3.0]);
        assert_eq!(q.add(&p).to_f64(), vec![1.5, 2.5, 3.0]);
        assert_eq!(p.add(&Polynomial::zero()).to_f64(), vec![1.0, 2.0]);
    }

    #[test]
    fn multiplication_grows_predictably() {
        let ctx = ctx();

        // (1 + x)(1 - x) = 1 - x^2
        let p = Polynomial::from_f64(&ctx, &[1.0, 1.0]);
        let q = Polynomial::from_f64(&ctx, &[1.0, -1.0]);

        let r = p.mul(&q);
        assert_eq!(r.len(), p.len() + q.len() - 1);
        assert_eq!(r.to_f64(), vec![1.0, 0.0, -1.0]);

        assert!(p.mul(&Polynomial::zero()).is_zero());
    }

    #[test]
    fn derivative_shifts_down() {
        let ctx = ctx();

        // d/dx (1 + 2x + 3x^2) = 2 + 6x
        let p = Polynomial::from_f64(&ctx, &[1.0, 2.0, 3.0]);
        assert_eq!(p.derivative().to_f64(), vec![2.0, 6.0]);

        assert!(Polynomial::zero().derivative().is_zero());
        assert!(Polynomial::from_f64(&ctx, &[5.0]).derivative().is_zero());
    }

    #[test]
    fn composition_substitutes() {
        let ctx = ctx();

        // p(x) = x^2 + 1 composed with q(x) = 2x - 1:
        // (2x - 1)^2 + 1 = 4x^2 - 4x + 2
        let p = Polynomial::from_f64(&ctx, &[1.0, 0.0, 1.0]);
        let q = Polynomial::from_f64(&ctx, &[-1.0, 2.0]);

        assert_eq!(p.compose(&q).to_f64(), vec![2.0, -4.0, 4.0]);
    }

    #[test]
    fn trim_drops_trailing_noise() {
        let ctx = ctx();
        let p = Polynomial::from_f64(&ctx, &[1.0, 2.0, 1e-40, 1e-42]);

        let trimmed = p.trim(&ctx.real(1e-30));
        assert_eq!(trimmed.to_f64(), vec![1.0, 2.0]);

        // Interior small coefficients are kept.
        let q = Polynomial::from_f64(&ctx, &[1.0, 1e-40, 2.0]);
        assert_eq!(q.trim(&ctx.real(1e-30)).len(), 3);
    }
}
