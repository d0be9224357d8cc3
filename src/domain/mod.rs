//! Shared domain types.
//!
//! Everything the gateway, the CLI, and the TUI exchange lives here: the
//! fixed-field student record, the closed-domain attribute enums, and the
//! prediction output.

mod types;

pub use types::*;
