//! # Workflows Module
//!
//! Top-level entry points. Each one drives the engine from raw input to a
//! finished result and reports through `tracing` spans.
//!
//! - **Record Construction** ([`from_arrays`]) - one domain, or the `efp` and `qm`
//!   domains of an input composed together
//! - **Alignment** ([`align`]) - raw geometries or validated records aligned onto a reference

pub mod align;
pub mod from_arrays;
