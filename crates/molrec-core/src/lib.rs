//! # molrec-core
//!
//! Validation and normalization of molecular structure records, and best-fit
//! alignment of two molecules that may list their atoms in different orders.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Stateless value types (`Molrec`, `MoleculeArrays`,
//!   `AlignmentMill`), the element and isotope tables, formula utilities and
//!   geometry helpers.
//!
//! - **[`engine`]: The Logic Core.** The nucleus reconciler and its cache, the
//!   stage-by-stage validators, the charge/multiplicity solver and the alignment
//!   search with its matching and superposition algorithms.
//!
//! - **[`workflows`]: The Public API.** Entry points that drive the engine end to
//!   end: array bundles to canonical records, and record-to-record alignment.

pub mod core;
pub mod engine;
pub mod workflows;
