//! Energy model evaluation.
//!
//! Models are evaluated by small, pure functions so that the request path
//! stays allocation-light and safe to run from any number of threads.

pub mod curve;
pub mod model;

pub use curve::*;
pub use model::*;
