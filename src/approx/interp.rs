//! Polynomial interpolation at Chebyshev nodes.

use crate::poly::Polynomial;
use crate::utils::linalg::{self, Singular};
use crate::utils::real::{int_like, Precision, Real};

/// Builds the Vandermonde matrix for the given abscissae: one row per point,
/// with columns `x^0, x^1, ..., x^(order-1)`.
pub(crate) fn vandermonde(xs: &[Real], order: usize) -> Vec<Vec<Real>> {
    xs.iter()
        .map(|x| {
            let mut row = Vec::with_capacity(order);
            let mut power = int_like(x, 1);

            for _ in 0..order {
                row.push(power.clone());
                power = power * x.clone();
            }

            row
        })
        .collect()
}

/// The affine map taking `[a, b]` onto `[-1, 1]`, as a degree-1 polynomial.
fn unit_remap(a: &Real, b: &Real) -> Result<Polynomial, Singular> {
    let endpoints = [a.clone(), b.clone()];
    let image = [int_like(a, -1), int_like(a, 1)];

    let map = linalg::solve(&vandermonde(&endpoints, 2), &image)?;

    Ok(Polynomial::new(map))
}

/// Fits the polynomial with `order` coefficients passing exactly through the
/// sample points `(x[i], y[i])`.
///
/// The abscissae are remapped to `[-1, 1]` before solving, which keeps the
/// Vandermonde system well conditioned; the result is composed with the
/// remap so its coefficients are in the natural domain.
pub fn fit(
    xs: &[Real],
    ys: &[Real],
    order: usize,
) -> Result<Polynomial, Singular> {
    let mut a = xs[0].clone();
    let mut b = xs[0].clone();

    for x in &xs[1..] {
        if *x < a {
            a = x.clone();
        }

        if *x > b {
            b = x.clone();
        }
    }

    let map = unit_remap(&a, &b)?;

    let q = linalg::solve(&vandermonde(&map.eval_multi(xs), order), ys)?;

    Ok(Polynomial::new(q).compose(&map))
}

/// Interpolates the black-box function `f` at the `order` Chebyshev nodes of
/// `[a, b]`, returning a polynomial that agrees with `f` at those nodes.
///
/// The node cosines are taken at machine precision: they only place the
/// interpolation grid, and every subsequent solve uses their exact lifted
/// values.
pub fn function_to_poly<F>(
    ctx: &Precision,
    f: &mut F,
    a: &Real,
    b: &Real,
    order: usize,
) -> Result<Polynomial, Singular>
where
    F: FnMut(&Real) -> Real,
{
    // Chebyshev nodes of the first kind on [-1, 1].
    let unit: Vec<Real> = (0..order)
        .map(|i| {
            let t = ((i as f64 + 0.5) * std::f64::consts::PI / order as f64)
                .cos();

            ctx.real(t)
        })
        .collect();

    let half = ctx.real(0.5);
    let span = b.clone() - a.clone();

    let ys: Vec<Real> = unit
        .iter()
        .map(|t| {
            let x = a.clone()
                + span.clone() * (half.clone() + half.clone() * t.clone());

            f(&x)
        })
        .collect();

    // Interpolate in the normalized variable, then compose with the remap
    // so the coefficients land in the natural domain.
    let q = linalg::solve(&vandermonde(&unit, order), &ys)?;
    let map = unit_remap(a, b)?;

    Ok(Polynomial::new(q).compose(&map))
}

#[cfg(test)]
mod tests {
    use dashu::base::SquareRoot;

    use super::*;
    use crate::utils::real::{abs, to_f64};

    fn ctx() -> Precision {
        Precision::new(160)
    }

    #[test]
    fn exact_fit_through_points() {
        let ctx = ctx();

        let xs: Vec<Real> =
            [0.0, 1.0, 2.0, 3.0].iter().map(|&v| ctx.real(v)).collect();
        let ys: Vec<Real> =
            [1.0, 0.0, 5.0, 22.0].iter().map(|&v| ctx.real(v)).collect();

        let p = fit(&xs, &ys, 4).unwrap();

        for (x, y) in xs.iter().zip(&ys) {
            let err = to_f64(&abs(&(p.eval(x) - y.clone())));
            assert!(err < 1e-30, "residual {err}");
        }
    }

    #[test]
    fn chebyshev_interpolation_reproduces_polynomial() {
        let ctx = ctx();

        // Interpolating a polynomial of lower degree recovers it to
        // working precision everywhere, not just at the nodes.
        let target = Polynomial::from_f64(&ctx, &[0.5, -1.0, 2.0, 0.25]);
        let mut f = |x: &Real| target.eval(x);

        let a = ctx.real(-1.0);
        let b = ctx.real(3.0);
        let p = function_to_poly(&ctx, &mut f, &a, &b, 8).unwrap();

        for i in 0..=20 {
            let x = ctx.real(-1.0 + 4.0 * i as f64 / 20.0);
            let err = to_f64(&abs(&(p.eval(&x) - target.eval(&x))));
            assert!(err < 1e-35, "x_{i}: residual {err}");
        }
    }

    #[test]
    fn chebyshev_interpolation_tracks_transcendental() {
        let ctx = ctx();

        let mut f = |x: &Real| x.clone().sqrt();

        let a = ctx.real(1.0);
        let b = ctx.real(4.0);
        let p = function_to_poly(&ctx, &mut f, &a, &b, 16).unwrap();

        for i in 0..=10 {
            let x = 1.0 + 3.0 * i as f64 / 10.0;
            let y = to_f64(&p.eval(&ctx.real(x)));
            assert!((y - x.sqrt()).abs() < 1e-9, "x = {x}");
        }
    }
}
