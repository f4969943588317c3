//! Physical constants (CODATA 2014).

/// Bohr radius in Ångström.
pub const BOHR_TO_ANGSTROM: f64 = 0.52917721067;

pub const ANGSTROM_TO_BOHR: f64 = 1.0 / BOHR_TO_ANGSTROM;
