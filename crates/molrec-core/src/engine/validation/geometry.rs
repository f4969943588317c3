use crate::core::utils::geometry::{distance_matrix, points_from_flat};
use crate::engine::error::ValidationError;
use tracing::debug;

/// Checks that a flat Cartesian geometry reshapes to `(nat, 3)` and that no two
/// atoms sit closer than `tooclose`. Returns the number of atoms.
pub fn validate_geometry(geom: &[f64], tooclose: f64) -> Result<usize, ValidationError> {
    let points = points_from_flat(geom).ok_or_else(|| ValidationError::ShapeMismatch {
        what: "geometry length (multiple of 3)".to_string(),
        expected: geom.len().div_ceil(3) * 3,
        found: geom.len(),
    })?;

    let dm = distance_matrix(&points, &points);
    let pairs: Vec<(usize, usize, f64)> = (0..points.len())
        .flat_map(|i| (0..i).map(move |j| (i, j)))
        .filter_map(|(i, j)| {
            let d = dm[(i, j)];
            (d < tooclose).then_some((i, j, d))
        })
        .collect();

    if !pairs.is_empty() {
        return Err(ValidationError::GeometricOverlap { tooclose, pairs });
    }
    debug!(nat = points.len(), "Geometry passed overlap check.");
    Ok(points.len())
}
