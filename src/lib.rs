//! Minimax polynomial fitting and fixed-point lowering.
//!
//! The [`approx`] module fits polynomials to black-box functions by Remez
//! exchange, minimizing the maximum (optionally weighted) error over an
//! interval. The [`fixed`] module lowers a fitted polynomial to integer
//! coefficients and per-stage shifts for integer-only Horner evaluation.
//! All fitting arithmetic runs at an explicit extended precision; see
//! [`utils::real`].

pub mod approx;
pub mod fixed;
pub mod opts;
pub mod poly;
pub mod utils;
