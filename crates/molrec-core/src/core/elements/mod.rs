//! # Elements Module
//!
//! Element and isotope lookups consumed by the nucleus reconciler.
//!
//! ## Key Components
//!
//! - [`PeriodicTable`](table::PeriodicTable) - the lookup capability (symbol ↔ atomic number,
//!   default isotope mass number and mass, per-element isotope tables)
//! - [`NuclideTable`](table::NuclideTable) - the concrete table, either compiled in
//!   ([`NuclideTable::builtin`](table::NuclideTable::builtin)) or loaded from CSV
//! - [`symbols`] - compile-time symbol map used where no table instance is at hand

mod data;
pub mod symbols;
pub mod table;
