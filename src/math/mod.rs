//! Numeric utilities: loose coercion and two-point interpolation.

pub mod interp;
pub mod numeric;

pub use interp::*;
pub use numeric::*;
