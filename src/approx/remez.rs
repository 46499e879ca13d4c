//! Minimax polynomial fitting by Remez exchange.

use std::fmt;

use dashu::base::SquareRoot;
use log::debug;

use super::interp;
use crate::poly::{roots, Polynomial};
use crate::utils::interval::{DomainError, Interval};
use crate::utils::linalg::{self, Singular};
use crate::utils::real::{abs, int_like, to_f64, Precision, Real};

/// Error weighting applied to the residual during a fit.
///
/// The residual is scaled by `x^-e` where `e` is the weight exponent.
/// Inverse-relative weighting arises when an odd function is fitted through
/// the change of variable that removes its removable singularity at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorWeight {
    /// Minimize the maximum absolute error (weight exponent 0).
    #[default]
    Absolute,
    /// Minimize the maximum error relative to `x` (weight exponent 1).
    Relative,
    /// Weight exponent -1; see [`remez_odd`].
    InverseRelative,
}

impl ErrorWeight {
    fn exponent(self) -> i32 {
        match self {
            ErrorWeight::Absolute => 0,
            ErrorWeight::Relative => 1,
            ErrorWeight::InverseRelative => -1,
        }
    }
}

/// Tuning knobs for the exchange iteration.
#[derive(Clone, Copy, Debug)]
pub struct RemezParams {
    /// Outer exchange iterations. A fixed budget, not a convergence
    /// criterion; ten suffices at the precisions in use.
    pub iters: usize,

    /// Coefficient count of the interpolated residual polynomial. When
    /// absent, `3 (degree + 2)` is used, comfortably above the fit degree.
    pub err_order: Option<usize>,
}

impl Default for RemezParams {
    fn default() -> Self {
        RemezParams {
            iters: 10,
            err_order: None,
        }
    }
}

impl RemezParams {
    fn residual_order(&self, degree: usize) -> usize {
        self.err_order.unwrap_or(3 * (degree + 2))
    }
}

/// A converged minimax fit.
#[derive(Clone, Debug)]
pub struct FitResult {
    /// The fitted polynomial, `degree + 1` coefficients.
    pub polynomial: Polynomial,
    /// The final alternation node set, `degree + 2` abscissae.
    pub nodes: Vec<Real>,
    /// The achieved minimax error bound over the domain.
    pub error: Real,
    /// The domain of validity of the fit.
    pub domain: Interval,
}

impl FitResult {
    /// Evaluates the fit, refusing arguments outside the validity domain.
    pub fn eval_checked(&self, x: &Real) -> Result<Real, DomainError> {
        self.domain.check(x)?;

        Ok(self.polynomial.eval(x))
    }

    pub fn error_f64(&self) -> f64 {
        to_f64(&self.error)
    }
}

/// A fit failed to converge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemezError {
    /// The residual partitioned the domain into fewer sign intervals than
    /// the equioscillation condition requires. The requested degree is too
    /// high for the function at this precision, or the seed nodes were
    /// pathological.
    Alternation { found: usize, needed: usize },

    /// The residual's sign intervals did not alternate.
    NotAlternating,

    /// An interpolation system was singular (typically coincident nodes).
    Singular,
}

impl fmt::Display for RemezError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RemezError::Alternation { found, needed } => write!(
                f,
                "residual has {found} sign intervals where at least {needed} \
                 are required for equioscillation"
            ),
            RemezError::NotAlternating => {
                write!(f, "residual sign intervals do not alternate")
            }
            RemezError::Singular => {
                write!(f, "interpolation system is singular")
            }
        }
    }
}

impl From<Singular> for RemezError {
    fn from(_: Singular) -> Self {
        RemezError::Singular
    }
}

/// `x^e` for the weight exponents in use.
fn weight(ctx: &Precision, x: &Real, e: i32) -> Real {
    match e {
        -1 => ctx.one() / x.clone(),
        0 => int_like(x, 1),
        1 => x.clone(),
        _ => unreachable!("weight exponent out of range"),
    }
}

/// Interpolates the signed, weighted residual `(p(x) - f(x)) x^-e` as a
/// polynomial of `order` coefficients.
fn residual<F>(
    ctx: &Precision,
    p: &Polynomial,
    f: &mut F,
    domain: &Interval,
    e: i32,
    order: usize,
) -> Result<Polynomial, Singular>
where
    F: FnMut(&Real) -> Real,
{
    let mut g =
        |x: &Real| (p.eval(x) - f(x)) * weight(ctx, x, -e);

    interp::function_to_poly(ctx, &mut g, domain.left(), domain.right(), order)
}

/// Fits a polynomial of the given degree to `f` over `domain`, minimizing
/// the maximum weighted error.
///
/// `f` is a black-box evaluator at the working precision; it must be smooth
/// on the domain for the exchange to converge.
pub fn remez<F>(
    ctx: &Precision,
    f: F,
    domain: &Interval,
    degree: usize,
    weight: ErrorWeight,
    params: &RemezParams,
) -> Result<FitResult, RemezError>
where
    F: FnMut(&Real) -> Real,
{
    remez_exponent(ctx, f, domain, degree, weight.exponent(), params)
}

/// Fits an even function on `[-b, b]` through the substitution `u = x^2`,
/// returning the fit in `u`: the coefficients are the even-degree
/// coefficients of the full polynomial in `x`.
pub fn remez_even<F>(
    ctx: &Precision,
    mut f: F,
    b: &Real,
    degree: usize,
    weight: ErrorWeight,
    params: &RemezParams,
) -> Result<FitResult, RemezError>
where
    F: FnMut(&Real) -> Real,
{
    let domain = Interval::new(ctx.zero(), b.clone() * b.clone());
    let g = |u: &Real| f(&u.clone().sqrt());

    remez_exponent(ctx, g, &domain, degree, weight.exponent(), params)
}

/// Fits an odd function on `[-b, b]` through the substitution `u = x^2`
/// applied to `f(x)/x`, returning the fit in `u`: the coefficients are the
/// odd-degree coefficients of the full polynomial in `x`.
///
/// `f` is never evaluated at zero; the substituted domain starts at
/// `epsilon^2` instead (there is no way to take the limiting value of
/// `f(x)/x` at zero through a black-box evaluator).
///
/// # Panics
///
/// Panics if `weight` is [`ErrorWeight::InverseRelative`]; the division by
/// `x` already shifts the weight exponent down by one.
pub fn remez_odd<F>(
    ctx: &Precision,
    mut f: F,
    b: &Real,
    degree: usize,
    weight: ErrorWeight,
    params: &RemezParams,
    epsilon: f64,
) -> Result<FitResult, RemezError>
where
    F: FnMut(&Real) -> Real,
{
    assert!(
        weight != ErrorWeight::InverseRelative,
        "odd-function reduction already applies the inverse weighting"
    );

    let eps = ctx.real(epsilon);
    let domain =
        Interval::new(eps.clone() * eps, b.clone() * b.clone());

    let g = |u: &Real| {
        let x = u.clone().sqrt();

        f(&x) / x
    };

    remez_exponent(ctx, g, &domain, degree, weight.exponent() - 1, params)
}

fn remez_exponent<F>(
    ctx: &Precision,
    mut f: F,
    domain: &Interval,
    degree: usize,
    e: i32,
    params: &RemezParams,
) -> Result<FitResult, RemezError>
where
    F: FnMut(&Real) -> Real,
{
    let n_nodes = degree + 2;
    let err_order = params.residual_order(degree);

    let a = domain.left();
    let b = domain.right();
    let span = b.clone() - a.clone();

    // Seed nodes halfway between the Chebyshev nodes: the cosine spacing
    // avoids the clustering pathologies of an equally spaced seed.
    let mut x: Vec<Real> = (0..n_nodes)
        .map(|j| {
            let t =
                (j as f64 * std::f64::consts::PI / (n_nodes - 1) as f64).cos();

            a.clone() + span.clone() * ctx.real(0.5 + 0.5 * t)
        })
        .collect();

    let mut p = Polynomial::zero();

    for iter in 0..params.iters {
        // Interpolate f at the nodes with one extra unknown, the
        // oscillation amplitude, entering through an alternating column
        // weighted by x^e. Solving pins the fit to equal, sign-alternating
        // weighted errors at the nodes.
        let ys: Vec<Real> = x.iter().map(&mut f).collect();

        let mut m = interp::vandermonde(&x, degree + 1);

        for (i, row) in m.iter_mut().enumerate() {
            let sign = if i % 2 == 0 { 1 } else { -1 };

            row.push(int_like(&x[i], sign) * weight(ctx, &x[i], e));
        }

        let mut sol = linalg::solve(&m, &ys)?;
        let osc = sol.pop().unwrap();

        p = Polynomial::new(sol);

        debug!("iteration {iter}: oscillation {}", to_f64(&osc));

        // The roots of the weighted residual partition the domain into
        // intervals of constant sign.
        let q = residual(ctx, &p, &mut f, domain, e, err_order)?;

        let partition = roots::sign_partition(ctx, &q, a, b);
        let n_intervals = partition.len() - 1;

        // The oscillating solve forces the residual through at least
        // degree + 2 sign changes; fewer means the oscillation amplitude
        // drowned in precision error.
        if n_intervals < n_nodes {
            return Err(RemezError::Alternation {
                found: n_intervals,
                needed: n_nodes,
            });
        }

        // Rising or falling through each interior boundary determines each
        // interval's sign; the pattern must alternate.
        let dq = q.derivative();
        let zero = ctx.zero();

        let rising: Vec<bool> = partition[1..n_intervals]
            .iter()
            .map(|v| dq.eval(v) >= zero)
            .collect();

        let polarity = !rising[0];

        for (i, &r) in rising.iter().enumerate() {
            if (r != ((i & 1) == 1)) == polarity {
                return Err(RemezError::NotAlternating);
            }
        }

        // Within each interval, take the extremum matching its sign.
        let spans = roots::interval_extrema(ctx, &q, &partition);

        let mut ex = Vec::with_capacity(n_intervals);
        let mut ey = Vec::with_capacity(n_intervals);

        for (i, (xs, ys)) in spans.iter().enumerate() {
            let maximize = ((i & 1) == 1) != polarity;
            let mut best = 0;

            for k in 1..ys.len() {
                let better = if maximize {
                    ys[k] > ys[best]
                } else {
                    ys[k] < ys[best]
                };

                if better {
                    best = k;
                }
            }

            ex.push(xs[best].clone());
            ey.push(ys[best].clone());
        }

        // The fit may walk across the domain while converging, transiently
        // discovering surplus oscillations at an edge; drop from whichever
        // end carries the smaller extremum.
        while ex.len() > n_nodes {
            if abs(&ey[0]) >= abs(ey.last().unwrap()) {
                debug!("trimming right edge extremum");
                ex.pop();
                ey.pop();
            } else {
                debug!("trimming left edge extremum");
                ex.remove(0);
                ey.remove(0);
            }
        }

        x = ex;
    }

    // Final minimax error, from a freshly derived residual.
    let q = residual(ctx, &p, &mut f, domain, e, err_order)?;
    let (_, ys) = roots::extrema(ctx, &q, a, b);

    let mut error = ctx.zero();

    for y in &ys {
        let m = abs(y);

        if m > error {
            error = m;
        }
    }

    Ok(FitResult {
        polynomial: p,
        nodes: x,
        error,
        domain: domain.clone(),
    })
}
