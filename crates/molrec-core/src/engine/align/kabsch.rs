use crate::core::constants::BOHR_TO_ANGSTROM;
use crate::core::utils::geometry::{all_close, centroid};
use crate::engine::error::AlignmentError;
use nalgebra::{Matrix3, Matrix4, Point3, SymmetricEigen, Vector3};

/// Result of a rigid superposition of a concern geometry onto a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct KabschFit {
    /// RMSD in Ångström, assuming inputs in Bohr.
    pub rmsd: f64,
    /// Row-vector rotation: aligned = (concern - shift) · rotation.
    pub rotation: Matrix3<f64>,
    pub shift: Vector3<f64>,
}

impl KabschFit {
    fn identity() -> Self {
        Self {
            rmsd: 0.0,
            rotation: Matrix3::identity(),
            shift: Vector3::zeros(),
        }
    }
}

/// Optimal rotation taking centered `concern` onto centered `reference` from the
/// leading eigenvector of Horn's 4x4 quaternion key matrix.
fn quaternion_rotation(reference: &[Vector3<f64>], concern: &[Vector3<f64>]) -> Matrix3<f64> {
    // cov[a][b] = sum_i R[i][a] * C[i][b]
    let cov: Matrix3<f64> = reference
        .iter()
        .zip(concern)
        .fold(Matrix3::zeros(), |acc, (r, c)| acc + r * c.transpose());

    let mut f = Matrix4::zeros();
    f[(0, 0)] = cov[(0, 0)] + cov[(1, 1)] + cov[(2, 2)];
    f[(1, 1)] = cov[(0, 0)] - cov[(1, 1)] - cov[(2, 2)];
    f[(2, 2)] = -cov[(0, 0)] + cov[(1, 1)] - cov[(2, 2)];
    f[(3, 3)] = -cov[(0, 0)] - cov[(1, 1)] + cov[(2, 2)];
    let off = [
        ((1, 0), cov[(1, 2)] - cov[(2, 1)]),
        ((2, 0), cov[(2, 0)] - cov[(0, 2)]),
        ((3, 0), cov[(0, 1)] - cov[(1, 0)]),
        ((2, 1), cov[(0, 1)] + cov[(1, 0)]),
        ((3, 1), cov[(0, 2)] + cov[(2, 0)]),
        ((3, 2), cov[(1, 2)] + cov[(2, 1)]),
    ];
    for ((i, j), value) in off {
        f[(i, j)] = value;
        f[(j, i)] = value;
    }

    let eigen = SymmetricEigen::new(f);
    let lead = eigen.eigenvalues.imax();
    let q = eigen.eigenvectors.column(lead);
    let (q0, q1, q2, q3) = (q[0], q[1], q[2], q[3]);

    Matrix3::new(
        q0 * q0 + q1 * q1 - q2 * q2 - q3 * q3,
        2.0 * (q1 * q2 - q0 * q3),
        2.0 * (q1 * q3 + q0 * q2),
        2.0 * (q1 * q2 + q0 * q3),
        q0 * q0 - q1 * q1 + q2 * q2 - q3 * q3,
        2.0 * (q2 * q3 - q0 * q1),
        2.0 * (q1 * q3 - q0 * q2),
        2.0 * (q2 * q3 + q0 * q1),
        q0 * q0 - q1 * q1 - q2 * q2 + q3 * q3,
    )
}

fn check_weights(weights: &[f64], n: usize) -> Result<(), AlignmentError> {
    if weights.len() != n {
        return Err(AlignmentError::InvalidWeights(format!(
            "expected {n} weights, found {}",
            weights.len()
        )));
    }
    if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
        return Err(AlignmentError::InvalidWeights(format!(
            "weights must be finite and non-negative, found {w}"
        )));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(AlignmentError::InvalidWeights(
            "weights must not all be zero".to_string(),
        ));
    }
    Ok(())
}

/// Finds the translation and proper rotation minimizing `|R - (C - shift) · U|`.
///
/// Both geometries must already be in corresponding atom order. Optional
/// per-atom `weights` scale the contribution of each pair. Geometries that are
/// already equal return the identity transform without an eigendecomposition.
pub fn kabsch_align(
    reference: &[Point3<f64>],
    concern: &[Point3<f64>],
    weights: Option<&[f64]>,
) -> Result<KabschFit, AlignmentError> {
    let n = reference.len();
    if n != concern.len() {
        return Err(AlignmentError::ShapeMismatch {
            reference: n,
            concern: concern.len(),
        });
    }
    if let Some(w) = weights {
        check_weights(w, n)?;
    }
    if n == 0 || all_close(concern, reference, 1.0e-5, 1.0e-8) {
        return Ok(KabschFit::identity());
    }

    let r_center = centroid(reference, None).coords;
    let c_center = centroid(concern, None).coords;

    let scale = |i: usize| weights.map_or(1.0, |w| w[i].sqrt());
    let r: Vec<Vector3<f64>> = reference
        .iter()
        .enumerate()
        .map(|(i, p)| (p.coords - r_center) * scale(i))
        .collect();
    let c: Vec<Vector3<f64>> = concern
        .iter()
        .enumerate()
        .map(|(i, p)| (p.coords - c_center) * scale(i))
        .collect();

    let rotation = quaternion_rotation(&r, &c);
    let shift = c_center - rotation * r_center;

    let residual: f64 = r
        .iter()
        .zip(&c)
        .map(|(ri, ci)| (ri - rotation.transpose() * ci).norm_squared())
        .sum();
    let total_weight = weights.map_or(n as f64, |w| w.iter().sum());
    let rmsd = residual.sqrt() * BOHR_TO_ANGSTROM / total_weight.sqrt();

    Ok(KabschFit {
        rmsd,
        rotation,
        shift,
    })
}
