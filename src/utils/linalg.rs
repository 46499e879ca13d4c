//! Linear-system solving over extended-precision reals.

use std::fmt;

use dashu::base::SquareRoot;

use super::real::{abs, int_like, Real};

/// The coefficient matrix was singular (or numerically indistinguishable
/// from singular at the working precision).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Singular;

impl fmt::Display for Singular {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "linear system is singular")
    }
}

/// Solves the square system `A x = b` by Gaussian elimination with partial
/// pivoting.
///
/// Columns are scaled to unit Euclidean norm before factoring, which keeps
/// the Vandermonde-style systems built by the fitter well conditioned across
/// widely varying node magnitudes.
///
/// # Panics
///
/// Panics if `a` is not square or its dimension does not match `b`.
pub fn solve(a: &[Vec<Real>], b: &[Real]) -> Result<Vec<Real>, Singular> {
    let n = b.len();

    assert_eq!(a.len(), n);
    assert!(a.iter().all(|row| row.len() == n));

    if n == 0 {
        return Ok(Vec::new());
    }

    let mut scale = Vec::with_capacity(n);

    for j in 0..n {
        let mut s = int_like(&a[0][j], 0);

        for row in a {
            s += row[j].clone() * row[j].clone();
        }

        if s == Real::ZERO {
            return Err(Singular);
        }

        scale.push(s.sqrt());
    }

    let mut m: Vec<Vec<Real>> = a
        .iter()
        .map(|row| {
            row.iter()
                .zip(&scale)
                .map(|(v, s)| v.clone() / s.clone())
                .collect()
        })
        .collect();

    let mut x = b.to_vec();

    for k in 0..n {
        let pivot = (k..n)
            .max_by(|&i, &j| {
                abs(&m[i][k]).partial_cmp(&abs(&m[j][k])).unwrap()
            })
            .unwrap();

        if m[pivot][k] == Real::ZERO {
            return Err(Singular);
        }

        m.swap(k, pivot);
        x.swap(k, pivot);

        let lead = m[k].clone();
        let rhs = x[k].clone();

        for i in k + 1..n {
            let f = m[i][k].clone() / lead[k].clone();

            for j in k + 1..n {
                m[i][j] = m[i][j].clone() - f.clone() * lead[j].clone();
            }

            x[i] = x[i].clone() - f * rhs.clone();
        }
    }

    for k in (0..n).rev() {
        let mut s = x[k].clone();

        for j in k + 1..n {
            s = s - m[k][j].clone() * x[j].clone();
        }

        x[k] = s / m[k][k].clone();
    }

    Ok(x.into_iter()
        .zip(scale)
        .map(|(v, s)| v / s)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::real::{to_f64, Precision};

    fn lift(ctx: &Precision, rows: &[&[f64]]) -> Vec<Vec<Real>> {
        rows.iter()
            .map(|row| row.iter().map(|&v| ctx.real(v)).collect())
            .collect()
    }

    #[test]
    fn three_by_three() {
        let ctx = Precision::new(106);

        let a = lift(
            &ctx,
            &[&[2.0, 1.0, -1.0], &[-3.0, -1.0, 2.0], &[-2.0, 1.0, 2.0]],
        );
        let b: Vec<Real> =
            [8.0, -11.0, -3.0].iter().map(|&v| ctx.real(v)).collect();

        let x = solve(&a, &b).unwrap();
        let x: Vec<f64> = x.iter().map(to_f64).collect();

        assert!((x[0] - 2.0).abs() < 1e-25);
        assert!((x[1] - 3.0).abs() < 1e-25);
        assert!((x[2] + 1.0).abs() < 1e-25);
    }

    #[test]
    fn singular_system_is_reported() {
        let ctx = Precision::new(106);

        let a = lift(&ctx, &[&[1.0, 2.0], &[2.0, 4.0]]);
        let b = vec![ctx.real(1.0), ctx.real(2.0)];

        assert_eq!(solve(&a, &b), Err(Singular));
    }
}
