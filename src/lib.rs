//! `student-perf` library crate.
//!
//! The binary (`sperf`) is a thin wrapper around this library so that:
//!
//! - the inference pipeline is testable without spawning processes
//! - modules are reusable (e.g., a future web front-end over the same gateway)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod debug;
pub mod domain;
pub mod encode;
pub mod error;
pub mod io;
pub mod models;
pub mod report;
pub mod tui;
