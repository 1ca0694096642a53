//! Scalar precision used throughout the crate.
//!
//! Mirrors the `double` feature convention used across the `cgmath`-based
//! physics ecosystem: `f32` by default, `f64` when precision matters more
//! than throughput.

#[cfg(not(feature = "double"))]
pub type Real = f32;

#[cfg(feature = "double")]
pub type Real = f64;
