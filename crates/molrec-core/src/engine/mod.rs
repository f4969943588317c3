//! # Engine Module
//!
//! The computational layer behind the workflows: turns loose per-atom clues into
//! consistent nuclei and records, and searches for the best superposition of two
//! molecules.
//!
//! ## Architecture
//!
//! - **Nucleus Reconciliation** ([`nucleus`]) - label parsing, cross-checking of atom clues and a shared cache
//! - **Validation** ([`validation`]) - the ordered validation stages and the record builder
//! - **Alignment** ([`align`]) - candidate atom orderings, Kabsch superposition and the search loop
//! - **Configuration** ([`config`]) - validation options and alignment settings, loadable from TOML
//! - **Progress Monitoring** ([`progress`]) - event callbacks and cooperative cancellation
//! - **Error Handling** ([`error`]) - validation and alignment error types

pub mod align;
pub mod config;
pub mod error;
pub mod nucleus;
pub mod progress;
pub mod validation;
