use crate::core::models::molrec::Molrec;
use crate::engine::align::search::{AlignmentOutcome, search_alignment};
use crate::engine::config::AlignmentConfig;
use crate::engine::error::AlignmentError;
use crate::engine::progress::ProgressReporter;
use nalgebra::Point3;
use tracing::{info, instrument};

/// A search outcome together with the concern geometry moved onto the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedGeometry {
    pub outcome: AlignmentOutcome,
    /// Concern geometry in reference atom order and frame, in Bohr.
    pub geometry: Vec<Point3<f64>>,
    pub shuffle_classes: Vec<String>,
}

/// Aligns `cgeom` onto `rgeom` (both in Bohr) and applies the winning transform.
#[instrument(skip_all, name = "align_geometries")]
pub fn align_geometries(
    rgeom: &[Point3<f64>],
    cgeom: &[Point3<f64>],
    runiq: &[String],
    cuniq: &[String],
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<AlignedGeometry, AlignmentError> {
    let outcome = search_alignment(rgeom, cgeom, runiq, cuniq, config, reporter)?;
    let (geometry, shuffle_classes) = outcome.mill.align_system(cgeom, cuniq, false)?;
    Ok(AlignedGeometry {
        outcome,
        geometry,
        shuffle_classes,
    })
}

/// Aligns the Cartesian geometry of `concern` onto that of `reference`, treating
/// atoms of equal element, mass and reality as interchangeable.
#[instrument(skip_all, name = "align_molrecs")]
pub fn align_molrecs(
    concern: &Molrec,
    reference: &Molrec,
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<AlignedGeometry, AlignmentError> {
    let rgeom = reference.geometry_bohr().ok_or(AlignmentError::NoGeometry)?;
    let cgeom = concern.geometry_bohr().ok_or(AlignmentError::NoGeometry)?;
    info!(
        reference = reference.name.as_deref().unwrap_or("<unnamed>"),
        concern = concern.name.as_deref().unwrap_or("<unnamed>"),
        nat = rgeom.len(),
        "Aligning molecule records."
    );
    align_geometries(
        &rgeom,
        &cgeom,
        &reference.shuffle_classes(),
        &concern.shuffle_classes(),
        config,
        reporter,
    )
}
