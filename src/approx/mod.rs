//! Minimax approximation.

pub mod interp;
pub mod remez;

pub use remez::{
    remez, remez_even, remez_odd, ErrorWeight, FitResult, RemezError,
    RemezParams,
};
