use std::process::ExitCode;

use dashu::base::SquareRoot;

use remez_fixed::approx::{
    remez, remez_even, ErrorWeight, FitResult, RemezError, RemezParams,
};
use remez_fixed::fixed::{quantize, FixedPoly};
use remez_fixed::opts::{Curve, Opts, Weight};
use remez_fixed::utils::interval::Interval;
use remez_fixed::utils::real::{powf, to_f64, Precision, Real};

fn fit_curve(
    ctx: &Precision,
    curve: Curve,
    degree: usize,
    weight: ErrorWeight,
) -> Result<FitResult, RemezError> {
    let params = RemezParams::default();

    match curve {
        Curve::Sqrt1px2 => {
            let f =
                |x: &Real| (x.clone() * x.clone() + ctx.one()).sqrt();

            remez_even(ctx, f, &ctx.one(), degree, weight, &params)
        }
        Curve::GammaDecodeSrgb => {
            let d = ctx.real(1.055);
            let e = ctx.real(2.4);
            let f = |x: &Real| powf(&(x.clone() / d.clone()), &e);

            let domain = Interval::from_f64(ctx, 0.5, 1.0);

            remez(ctx, f, &domain, degree, weight, &params)
        }
        Curve::GammaEncodeSrgb => {
            let d = ctx.real(1.055);
            let e = ctx.one() / ctx.real(2.4);
            let f = |x: &Real| d.clone() * powf(x, &e);

            let domain = Interval::from_f64(ctx, 0.5, 1.0);

            remez(ctx, f, &domain, degree, weight, &params)
        }
    }
}

fn print_fit(fit: &FitResult) {
    println!("domain: {}", fit.domain);
    println!("error: {:e}", fit.error_f64());

    for (i, c) in fit.polynomial.coeffs().iter().enumerate() {
        println!("p[{i}] = {:e}", to_f64(c));
    }
}

fn print_fixed(fp: &FixedPoly) {
    println!("x exponent: {}", fp.x_exp);
    println!("result exponent: {}", fp.exponent);

    for (i, c) in fp.coeffs.iter().enumerate() {
        if i < fp.shifts.len() {
            println!("c[{i}] = {c:#x} (shift {})", fp.shifts[i]);
        } else {
            println!("c[{i}] = {c:#x}");
        }
    }
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    env_logger::Builder::new()
        .filter_level(opts.log_level)
        .init();

    let ctx = Precision::new(opts.precision);

    let degree = opts.degree.unwrap_or(opts.curve.default_degree());
    let weight =
        match opts.weight.unwrap_or(opts.curve.default_weight()) {
            Weight::Absolute => ErrorWeight::Absolute,
            Weight::Relative => ErrorWeight::Relative,
        };

    let fit = match fit_curve(&ctx, opts.curve, degree, weight) {
        Ok(fit) => fit,
        Err(err) => {
            eprintln!("error: {err}");

            return ExitCode::FAILURE;
        }
    };

    print_fit(&fit);

    if let Some(x_exp) = opts.x_exp {
        let fp = match quantize(
            &ctx,
            &fit.polynomial,
            &fit.domain,
            x_exp,
            opts.bits,
            opts.y_exp,
        ) {
            Ok(fp) => fp,
            Err(err) => {
                eprintln!("error: {err}");

                return ExitCode::FAILURE;
            }
        };

        print_fixed(&fp);
    }

    ExitCode::SUCCESS
}
