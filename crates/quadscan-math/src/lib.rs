//! Numerical primitives for Quadscan.

pub mod linalg;
pub mod lstsq;
