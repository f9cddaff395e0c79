//! `request-carbon` library crate.
//!
//! Estimates the energy and carbon cost of individual reverse-proxy requests
//! from per-endpoint energy models. The binary (`carbon`) is a thin wrapper
//! around this library so that:
//!
//! - the per-request evaluation is embeddable in a proxy hook
//! - core logic is testable without spawning processes

pub mod app;
pub mod cli;
pub mod context;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod settings;
