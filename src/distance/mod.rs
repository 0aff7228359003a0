//! Cost matrices and the providers that compute them.

mod matrix;
mod provider;

pub use matrix::{Cost, CostMatrix};
pub use provider::{CostMatrixProvider, EuclideanMatrix, PrecomputedMatrix};
