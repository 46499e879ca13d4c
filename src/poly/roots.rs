//! Real-root isolation and extremum location.
//!
//! Root-finding of a degree-n polynomial reduces to root-finding of its
//! derivative: the derivative's roots split the interval into monotonic
//! pieces, and a sign change across a monotonic piece brackets exactly one
//! root. The recursion bottoms out at the linear case.

use super::Polynomial;
use crate::utils::real::{int_like, pow2, Precision, Real};

/// Safeguarded Newton budget per bracket. No convergence tolerance is used;
/// at the working precisions in play the iteration settles well within this
/// budget.
const NEWTON_ITERS: usize = 15;

/// Locates the single root of `p` inside the bracket `(a, b)`.
///
/// `p` must be monotonic on the bracket, increasing or decreasing per
/// `increasing`, with a sign change across it. Newton steps are accepted
/// only while they stay strictly inside the current bracket; any rejected
/// step falls back to bisection, so the iteration cannot escape or
/// oscillate.
fn bracketed_root(
    p: &Polynomial,
    dp: &Polynomial,
    a: &Real,
    b: &Real,
    increasing: bool,
) -> Real {
    let half = pow2(-1);
    let zero = int_like(a, 0);

    let mut a = a.clone();
    let mut b = b.clone();
    let mut x = (a.clone() + b.clone()) * half.clone();

    for _ in 0..NEWTON_ITERS {
        let y = p.eval(&x);

        if y < zero {
            let y1 = dp.eval(&x);

            if y1 < zero {
                // x - y/y1 > a  <=>  y > (x - a) y1
                if y > (x.clone() - a.clone()) * y1.clone() {
                    let x1 = x.clone() - y.clone() / y1.clone();

                    if x1 > a {
                        x = x1;
                        continue;
                    }
                }
            } else if y1 > zero {
                // x - y/y1 < b  <=>  y > (x - b) y1
                if y > (x.clone() - b.clone()) * y1.clone() {
                    let x1 = x.clone() - y.clone() / y1.clone();

                    if x1 < b {
                        x = x1;
                        continue;
                    }
                }
            }

            if increasing {
                a = x.clone();
            } else {
                b = x.clone();
            }
        } else if y > zero {
            let y1 = dp.eval(&x);

            if y1 < zero {
                // x - y/y1 < b  <=>  y < (x - b) y1
                if y < (x.clone() - b.clone()) * y1.clone() {
                    let x1 = x.clone() - y.clone() / y1.clone();

                    if x1 < b {
                        x = x1;
                        continue;
                    }
                }
            } else if y1 > zero {
                // x - y/y1 > a  <=>  y < (x - a) y1
                if y < (x.clone() - a.clone()) * y1.clone() {
                    let x1 = x.clone() - y.clone() / y1.clone();

                    if x1 > a {
                        x = x1;
                        continue;
                    }
                }
            }

            if increasing {
                b = x.clone();
            } else {
                a = x.clone();
            }
        } else {
            break;
        }

        x = (a.clone() + b.clone()) * half.clone();
    }

    x
}

/// Returns the boundaries partitioning `[a, b]` into intervals of constant
/// sign of `p`: the endpoint `a`, every real root of `p` interior to the
/// interval, and the endpoint `b`, in ascending order.
///
/// Trailing coefficients below the context's trim threshold (relative to the
/// largest coefficient) are dropped before recursing, so a numerically
/// degenerate polynomial is searched at its effective degree.
pub fn sign_partition(
    ctx: &Precision,
    p: &Polynomial,
    a: &Real,
    b: &Real,
) -> Vec<Real> {
    let p = p.trim(&ctx.trim_epsilon(&p.scale()));

    let mut out = vec![a.clone()];

    if p.len() == 2 {
        let x = -(p.coeffs()[0].clone() / p.coeffs()[1].clone());

        if x > *a && x < *b {
            out.push(x);
        }
    } else if p.len() > 2 {
        let dp = p.derivative();
        let breaks = sign_partition(ctx, &dp, a, b);
        let y = p.eval_multi(&breaks);
        let zero = int_like(a, 0);

        for i in 0..breaks.len() - 1 {
            if y[i + 1] < zero {
                if y[i] >= zero {
                    out.push(bracketed_root(
                        &p,
                        &dp,
                        &breaks[i],
                        &breaks[i + 1],
                        false,
                    ));
                }
            } else if y[i + 1] > zero {
                if y[i] <= zero {
                    out.push(bracketed_root(
                        &p,
                        &dp,
                        &breaks[i],
                        &breaks[i + 1],
                        true,
                    ));
                }
            } else {
                out.push(breaks[i + 1].clone());
            }
        }
    }

    if *out.last().unwrap() < *b {
        out.push(b.clone());
    }

    out
}

/// Every real root of `p` on the closed interval `[a, b]`, ascending.
pub fn real_roots(
    ctx: &Precision,
    p: &Polynomial,
    a: &Real,
    b: &Real,
) -> Vec<Real> {
    let partition = sign_partition(ctx, p, a, b);
    let zero = int_like(a, 0);

    let mut out = Vec::new();

    if p.eval(a) == zero {
        out.push(a.clone());
    }

    out.extend_from_slice(&partition[1..partition.len() - 1]);

    if p.eval(b) == zero {
        out.push(b.clone());
    }

    out
}

/// Candidate extrema of `p` on `[a, b]`: the roots of `p'` together with
/// both endpoints, paired with the values of `p` there.
pub fn extrema(
    ctx: &Precision,
    p: &Polynomial,
    a: &Real,
    b: &Real,
) -> (Vec<Real>, Vec<Real>) {
    let x = sign_partition(ctx, &p.derivative(), a, b);
    let y = p.eval_multi(&x);

    (x, y)
}

/// Value range of `p` over `[a, b]`, as `(min, max)`.
pub fn range(
    ctx: &Precision,
    p: &Polynomial,
    a: &Real,
    b: &Real,
) -> (Real, Real) {
    let (_, y) = extrema(ctx, p, a, b);

    let mut min = y[0].clone();
    let mut max = y[0].clone();

    for v in &y[1..] {
        if *v < min {
            min = v.clone();
        }

        if *v > max {
            max = v.clone();
        }
    }

    (min, max)
}

/// Extrema of `p` over each interval of a contiguous ascending breakpoint
/// sequence `[x0, x1, ..., xk]`.
///
/// Equivalent to calling [`extrema`] per interval, but the derivative chain
/// is analyzed once over the whole span and its roots redistributed, which
/// both the fitter and the quantizer rely on when sweeping many adjacent
/// intervals.
pub fn interval_extrema(
    ctx: &Precision,
    p: &Polynomial,
    breaks: &[Real],
) -> Vec<(Vec<Real>, Vec<Real>)> {
    let n = breaks.len() - 1;

    let (ex, ey) = extrema(ctx, p, &breaks[0], &breaks[n]);
    let by = p.eval_multi(breaks);

    let mut out = Vec::with_capacity(n);
    let mut j = 1;

    for i in 0..n {
        let mut k = j;

        while k < ex.len() && ex[k] < breaks[i + 1] {
            k += 1;
        }

        let mut xs = vec![breaks[i].clone()];
        xs.extend_from_slice(&ex[j..k]);
        xs.push(breaks[i + 1].clone());

        let mut ys = vec![by[i].clone()];
        ys.extend_from_slice(&ey[j..k]);
        ys.push(by[i + 1].clone());

        out.push((xs, ys));
        j = k;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::real::{abs, to_f64};

    fn ctx() -> Precision {
        Precision::new(106)
    }

    /// (x - 1)(x - 2)(x - 3) = -6 + 11x - 6x^2 + x^3
    fn cubic(ctx: &Precision) -> Polynomial {
        Polynomial::from_f64(ctx, &[-6.0, 11.0, -6.0, 1.0])
    }

    #[test]
    fn cubic_roots_found() {
        let ctx = ctx();
        let p = cubic(&ctx);

        let roots = real_roots(&ctx, &p, &ctx.real(0.0), &ctx.real(4.0));
        let roots: Vec<f64> = roots.iter().map(to_f64).collect();

        assert_eq!(roots.len(), 3);
        assert!((roots[0] - 1.0).abs() < 1e-25);
        assert!((roots[1] - 2.0).abs() < 1e-25);
        assert!((roots[2] - 3.0).abs() < 1e-25);
    }

    #[test]
    fn no_spurious_roots() {
        let ctx = ctx();

        // x^2 + 1 has no real roots.
        let p = Polynomial::from_f64(&ctx, &[1.0, 0.0, 1.0]);
        let roots = real_roots(&ctx, &p, &ctx.real(-5.0), &ctx.real(5.0));

        assert!(roots.is_empty());
    }

    #[test]
    fn endpoint_root_reported_once() {
        let ctx = ctx();

        // Root exactly at the left endpoint.
        let p = Polynomial::from_f64(&ctx, &[0.0, 1.0]);
        let roots = real_roots(&ctx, &p, &ctx.real(0.0), &ctx.real(1.0));

        assert_eq!(roots.len(), 1);
        assert_eq!(to_f64(&roots[0]), 0.0);
    }

    #[test]
    fn cubic_extrema_bracketed() {
        let ctx = ctx();
        let p = cubic(&ctx);
        let dp = p.derivative();

        let a = ctx.real(0.0);
        let b = ctx.real(4.0);
        let (xs, ys) = extrema(&ctx, &p, &a, &b);

        // Two interior extrema plus the endpoints.
        assert_eq!(xs.len(), 4);

        // Interior extrema are stationary points of p, bracketed by the
        // roots on either side.
        for x in &xs[1..3] {
            assert!(to_f64(&abs(&dp.eval(x))) < 1e-20);
        }

        let x1 = to_f64(&xs[1]);
        let x2 = to_f64(&xs[2]);
        assert!(1.0 < x1 && x1 < 2.0);
        assert!(2.0 < x2 && x2 < 3.0);

        // First is a local max, second a local min, consistent with the
        // neighboring breakpoint values.
        assert!(ys[1] > ys[0] || ys[1] > ys[2]);
        assert!(to_f64(&ys[1]) > to_f64(&ys[2]));
        assert!(to_f64(&ys[2]) < to_f64(&ys[3]));
    }

    #[test]
    fn range_covers_extremes() {
        let ctx = ctx();

        // x^2 on [-1, 2]: min 0 at the stationary point, max 4 at the edge.
        let p = Polynomial::from_f64(&ctx, &[0.0, 0.0, 1.0]);
        let (min, max) = range(&ctx, &p, &ctx.real(-1.0), &ctx.real(2.0));

        assert!(to_f64(&min).abs() < 1e-25);
        assert!((to_f64(&max) - 4.0).abs() < 1e-25);
    }

    #[test]
    fn degenerate_leading_coefficients_trimmed() {
        let ctx = ctx();

        // Effectively the cubic, with trailing noise terms.
        let p = Polynomial::from_f64(
            &ctx,
            &[-6.0, 11.0, -6.0, 1.0, 1e-33, 1e-34],
        );

        let roots = real_roots(&ctx, &p, &ctx.real(0.0), &ctx.real(4.0));
        assert_eq!(roots.len(), 3);
    }

    #[test]
    fn interval_extrema_matches_per_interval_analysis() {
        let ctx = ctx();
        let p = cubic(&ctx);

        let breaks: Vec<Real> =
            [0.0, 1.5, 2.5, 4.0].iter().map(|&v| ctx.real(v)).collect();

        let per_span = interval_extrema(&ctx, &p, &breaks);
        assert_eq!(per_span.len(), 3);

        for (i, (xs, ys)) in per_span.iter().enumerate() {
            // Each sub-range starts and ends at its breakpoints.
            assert_eq!(to_f64(&xs[0]), to_f64(&breaks[i]));
            assert_eq!(
                to_f64(xs.last().unwrap()),
                to_f64(&breaks[i + 1])
            );

            // Redistribution agrees with a direct analysis of the
            // sub-range, up to candidate points that sit on a breakpoint.
            let (dx, _) = extrema(&ctx, &p, &breaks[i], &breaks[i + 1]);

            for x in &dx[1..dx.len() - 1] {
                assert!(xs
                    .iter()
                    .any(|v| to_f64(&abs(&(v.clone() - x.clone()))) < 1e-20));
            }

            assert_eq!(xs.len(), ys.len());
        }
    }
}
