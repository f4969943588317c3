use crate::core::constants::ANGSTROM_TO_BOHR;
use crate::core::utils::geometry::points_from_flat;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Qm,
    Efp,
    Qmvz,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Domain::Qm => "qm",
            Domain::Efp => "efp",
            Domain::Qmvz => "qmvz",
        };
        f.write_str(s)
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qm" => Ok(Domain::Qm),
            "efp" => Ok(Domain::Efp),
            "qmvz" => Ok(Domain::Qmvz),
            _ => Err(format!(
                "Topology domain '{s}' not available for processing. Choose among qm, efp, qmvz"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Units {
    Angstrom,
    Bohr,
}

impl Units {
    /// Case-insensitive parse of `"Angstrom"` / `"Bohr"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "angstrom" => Some(Units::Angstrom),
            "bohr" => Some(Units::Bohr),
            _ => None,
        }
    }

    /// Physical factor from these units to atomic units of length.
    pub fn to_bohr(&self) -> f64 {
        match self {
            Units::Angstrom => ANGSTROM_TO_BOHR,
            Units::Bohr => 1.0,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Angstrom => f.write_str("Angstrom"),
            Units::Bohr => f.write_str("Bohr"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub creator: String,
    pub version: String,
    pub routine: String,
}

impl Provenance {
    /// Provenance naming this library and the given routine.
    pub fn stamp(routine: &str) -> Self {
        Self {
            creator: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            routine: routine.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    pub atom_a: usize,
    pub atom_b: usize,
    pub order: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintType {
    Xyzabc,
    Points,
    Rotmat,
}

impl HintType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "xyzabc" => Some(HintType::Xyzabc),
            "points" => Some(HintType::Points),
            "rotmat" => Some(HintType::Rotmat),
            _ => None,
        }
    }

    /// Number of floats a hint of this type carries.
    pub fn hint_len(&self) -> usize {
        match self {
            HintType::Xyzabc => 6,
            HintType::Points => 9,
            HintType::Rotmat => 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EfpHints {
    pub fragment_files: Vec<String>,
    pub hint_types: Vec<HintType>,
    pub geom_hints: Vec<Vec<f64>>,
}

impl EfpHints {
    pub fn is_empty(&self) -> bool {
        self.geom_hints.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnsettledGeometry {
    pub lines: Vec<Vec<String>>,
    pub variables: Vec<(String, f64)>,
}

/// Canonical, fully validated and defaulted molecule record.
///
/// Per-atom arrays (`elea` .. `elbl`) all have length `nat`. Geometry is kept in the
/// input `units`; `geom` is empty for `qmvz` records, whose coordinates live in
/// `geom_unsettled`. Records of a bare EFP domain carry no atoms and the neutral
/// singlet state of an empty molecule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molrec {
    pub domain: Domain,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub provenance: Provenance,
    pub units: Units,
    pub input_units_to_au: Option<f64>,
    pub fix_com: bool,
    pub fix_orientation: bool,
    pub fix_symmetry: Option<String>,
    pub connectivity: Option<Vec<Bond>>,
    pub geom: Vec<f64>,
    pub geom_unsettled: Option<UnsettledGeometry>,
    pub elea: Vec<i32>,
    pub elez: Vec<u32>,
    pub elem: Vec<String>,
    pub mass: Vec<f64>,
    pub real: Vec<bool>,
    pub elbl: Vec<String>,
    pub fragment_separators: Vec<usize>,
    pub fragment_charges: Vec<f64>,
    pub fragment_multiplicities: Vec<f64>,
    pub molecular_charge: f64,
    pub molecular_multiplicity: f64,
    pub efp: Option<EfpHints>,
}

impl Molrec {
    pub fn nat(&self) -> usize {
        self.elez.len()
    }

    pub fn nfragments(&self) -> usize {
        self.fragment_separators.len() + 1
    }

    /// Atom index ranges of each fragment, in order.
    pub fn fragment_ranges(&self) -> Vec<Range<usize>> {
        let mut bounds = Vec::with_capacity(self.nfragments() + 1);
        bounds.push(0);
        bounds.extend(self.fragment_separators.iter().copied());
        bounds.push(self.nat());
        bounds.windows(2).map(|w| w[0]..w[1]).collect()
    }

    /// Cartesian geometry in input units; `None` for records without one.
    pub fn geometry_points(&self) -> Option<Vec<Point3<f64>>> {
        if self.geom_unsettled.is_some() {
            return None;
        }
        points_from_flat(&self.geom)
    }

    /// Cartesian geometry in Bohr, honoring any `input_units_to_au` override.
    pub fn geometry_bohr(&self) -> Option<Vec<Point3<f64>>> {
        let factor = match self.units {
            Units::Angstrom => self.input_units_to_au.unwrap_or(ANGSTROM_TO_BOHR),
            Units::Bohr => 1.0,
        };
        self.geometry_points()
            .map(|pts| pts.into_iter().map(|p| p * factor).collect())
    }

    /// Per-atom classes of interchangeable atoms: element, mass and reality.
    pub fn shuffle_classes(&self) -> Vec<String> {
        (0..self.nat())
            .map(|i| {
                format!(
                    "{}_{:.6}_{}",
                    self.elem[i],
                    self.mass[i],
                    if self.real[i] { "r" } else { "g" }
                )
            })
            .collect()
    }
}
