use super::molrec::Provenance;
use serde::{Deserialize, Serialize};

/// Loosely specified, unvalidated description of one molecule as a bundle of
/// optional named arrays and scalars.
///
/// Any field may be absent; the validator decides which combinations are
/// sufficient. `elea` entries of `-1` mean "mass number unknown".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleculeArrays {
    pub geom: Option<Vec<f64>>,
    pub elea: Option<Vec<i32>>,
    pub elez: Option<Vec<i32>>,
    pub elem: Option<Vec<String>>,
    pub mass: Option<Vec<f64>>,
    pub real: Option<Vec<bool>>,
    pub elbl: Option<Vec<String>>,

    pub name: Option<String>,
    pub comment: Option<String>,
    pub provenance: Option<Provenance>,
    pub connectivity: Option<Vec<(i64, i64, f64)>>,

    pub units: Option<String>,
    pub input_units_to_au: Option<f64>,
    pub fix_com: Option<bool>,
    pub fix_orientation: Option<bool>,
    pub fix_symmetry: Option<String>,

    pub fragment_separators: Option<Vec<i64>>,
    pub fragment_charges: Option<Vec<Option<f64>>>,
    pub fragment_multiplicities: Option<Vec<Option<f64>>>,
    pub molecular_charge: Option<f64>,
    pub molecular_multiplicity: Option<f64>,

    pub fragment_files: Option<Vec<String>>,
    pub hint_types: Option<Vec<String>>,
    pub geom_hints: Option<Vec<Vec<f64>>>,

    pub geom_unsettled: Option<Vec<Vec<String>>>,
    pub variables: Option<Vec<(String, f64)>>,
}

impl MoleculeArrays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cartesian geometry plus element symbols; the most common starting point.
    pub fn from_symbols(geom: Vec<f64>, elem: &[&str]) -> Self {
        Self {
            geom: Some(geom),
            elem: Some(elem.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Cartesian geometry plus compact nucleus labels (`"@13C_mine"`, `"He4@4.01"`).
    pub fn from_labels(geom: Vec<f64>, elbl: &[&str]) -> Self {
        Self {
            geom: Some(geom),
            elbl: Some(elbl.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub(crate) fn has_efp_hints(&self) -> bool {
        self.geom_hints.as_ref().is_some_and(|h| !h.is_empty())
    }
}
