//! Input/output helpers.
//!
//! - endpoint configuration load + normalization (`config`)
//! - access-log CSV ingest for replay (`ingest`)
//! - per-request metrics export (`export`)

pub mod config;
pub mod export;
pub mod ingest;

pub use config::*;
pub use export::*;
pub use ingest::*;
