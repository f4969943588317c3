use thiserror::Error;

use crate::core::elements::table::ElementError;
use crate::core::models::mill::MillError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Element identity error: {source}")]
    Element {
        #[from]
        source: ElementError,
    },

    #[error("Inconsistent or unspecified {field}: {inputs}")]
    Reconciliation { field: &'static str, inputs: String },

    #[error("Nucleus label '{label}' does not match the expected grammar")]
    LabelSyntax { label: String },

    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("Atoms closer than {tooclose} (atom, atom, distance): {pairs:?}")]
    GeometricOverlap {
        tooclose: f64,
        pairs: Vec<(usize, usize, f64)>,
    },

    #[error("Invalid fragmentation: {0}")]
    Fragmentation(String),

    #[error("Inconsistent or unspecified charge/multiplicity: {0}")]
    ChargeMultiplicity(String),

    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Conflicting values for '{field}': {existing} vs {incoming}")]
    Conflict {
        field: &'static str,
        existing: String,
        incoming: String,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignmentError {
    #[error("natom doesn't match: reference has {reference}, concern has {concern}")]
    ShapeMismatch { reference: usize, concern: usize },

    #[error("atom subclasses unequal:\n  {reference:?}\n  {concern:?}")]
    ShuffleClassMismatch {
        reference: Vec<String>,
        concern: Vec<String>,
    },

    #[error("Invalid transform: {source}")]
    Mill {
        #[from]
        source: MillError,
    },

    #[error("Invalid superposition weights: {0}")]
    InvalidWeights(String),

    #[error("Molecule has no Cartesian geometry to align")]
    NoGeometry,

    #[error("Alignment search cancelled after {evaluated} candidates without a result")]
    Cancelled { evaluated: usize },

    #[error("No plausible atom ordering between reference and concern")]
    NoCandidate,
}
