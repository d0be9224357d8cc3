//! Terminal output formatting.
//!
//! Formatting lives in one place so the gateway stays clean and testable and
//! output tweaks are localized.

mod format;

pub use format::*;
