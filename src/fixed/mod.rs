//! Fixed-point lowering of fitted polynomials.

pub mod eval;
pub mod quantize;

pub use quantize::{quantize, FixedPoly, QuantizeError};
