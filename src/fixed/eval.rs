//! Integer-only Horner evaluation of quantized polynomials.

use super::quantize::FixedPoly;
use crate::utils::interval::DomainError;

/// Relative widening of the validity interval accepted by the checked
/// evaluator. The fit is meaningless outside its domain, but an argument a
/// rounding step past an endpoint is still the endpoint for our purposes.
const DOMAIN_SLOP: f64 = 1e-6;

impl FixedPoly {
    /// Evaluates the quantized polynomial at the integer argument `x`
    /// (implicit scale `2^x_exp`), producing a result at scale
    /// `2^exponent`.
    ///
    /// Each stage is one multiply-accumulate followed by an arithmetic
    /// right shift; the rounding offsets baked into the coefficients make
    /// each shift round to nearest. Intermediates are widened to 128 bits,
    /// so a stage product cannot overflow for any layout the quantizer
    /// produces.
    pub fn eval(&self, x: i64) -> i64 {
        let n = self.coeffs.len();
        let x = x as i128;

        let mut y = self.coeffs[n - 1] as i128;

        for i in (0..n - 1).rev() {
            y = (y * x + self.coeffs[i] as i128) >> self.shifts[i];
        }

        y as i64
    }

    /// Evaluates with a domain check, refusing arguments outside the
    /// (slop-widened) validity interval of the fit.
    pub fn eval_checked(&self, x: i64) -> Result<i64, DomainError> {
        let xr = self.arg_f64(x);

        let lo = self.a - self.a.abs() * DOMAIN_SLOP;
        let hi = self.b + self.b.abs() * DOMAIN_SLOP;

        if xr < lo || xr > hi {
            return Err(DomainError {
                x: xr,
                a: self.a,
                b: self.b,
            });
        }

        Ok(self.eval(x))
    }

    /// The real value of an integer argument.
    pub fn arg_f64(&self, x: i64) -> f64 {
        x as f64 * 2f64.powi(self.x_exp)
    }

    /// The real value of an evaluation result.
    pub fn result_f64(&self, y: i64) -> f64 {
        y as f64 * 2f64.powi(self.exponent)
    }
}
