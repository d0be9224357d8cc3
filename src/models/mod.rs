//! Fitted regression models.
//!
//! Today there is a single kind (linear regression over the encoded feature
//! vector); the module split keeps room for alternatives without touching the
//! gateway.

mod linear;

pub use linear::*;
