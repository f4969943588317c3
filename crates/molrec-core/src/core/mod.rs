//! # Core Module
//!
//! Stateless building blocks shared by the validation and alignment engines.
//!
//! ## Architecture
//!
//! - **Element Data** ([`elements`]) - symbols, atomic numbers and isotope masses
//! - **Records** ([`models`]) - input bundles, canonical records, nuclei and alignment mills
//! - **Formulas** ([`formula`]) - molecular formulas in alphabetical or Hill order
//! - **Geometry** ([`utils`]) - point-set helpers such as distance matrices and RMSD
//! - **Constants** ([`constants`]) - physical length conversions

pub mod constants;
pub mod elements;
pub mod formula;
pub mod models;
pub mod utils;
