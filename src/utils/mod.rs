pub mod interval;
pub mod linalg;
pub mod real;

pub use interval::{DomainError, Interval};
pub use real::{Precision, Real};
