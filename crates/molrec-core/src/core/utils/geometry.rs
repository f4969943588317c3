use nalgebra::{DMatrix, Point3};

/// Reshapes a flat `[x0, y0, z0, x1, ...]` array into points.
/// Returns `None` when the length is not a multiple of three.
pub fn points_from_flat(flat: &[f64]) -> Option<Vec<Point3<f64>>> {
    if flat.len() % 3 != 0 {
        return None;
    }
    Some(
        flat.chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect(),
    )
}

pub fn centroid(points: &[Point3<f64>], weights: Option<&[f64]>) -> Point3<f64> {
    if points.is_empty() {
        return Point3::origin();
    }
    match weights {
        Some(w) => {
            let total: f64 = w.iter().sum();
            let sum = points
                .iter()
                .zip(w)
                .fold(nalgebra::Vector3::zeros(), |acc, (p, &wi)| {
                    acc + p.coords * wi
                });
            Point3::from(sum / total)
        }
        None => {
            let sum = points
                .iter()
                .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
            Point3::from(sum / points.len() as f64)
        }
    }
}

/// Full `a.len() x b.len()` matrix of Euclidean distances.
pub fn distance_matrix(a: &[Point3<f64>], b: &[Point3<f64>]) -> DMatrix<f64> {
    DMatrix::from_fn(a.len(), b.len(), |i, j| nalgebra::distance(&a[i], &b[j]))
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// Reflects through the xz-plane.
pub fn mirror_y(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    points.iter().map(|p| Point3::new(p.x, -p.y, p.z)).collect()
}

/// Element-wise closeness with the usual `|a - b| <= atol + rtol * |b|` rule.
pub fn all_close(a: &[Point3<f64>], b: &[Point3<f64>], rtol: f64, atol: f64) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(p, q)| {
            (0..3).all(|k| (p[k] - q[k]).abs() <= atol + rtol * q[k].abs())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(0.0, 2.0, 0.0),
        ]
    }

    #[test]
    fn points_from_flat_reshapes_triples() {
        let points = points_from_flat(&[0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 2.0, 0.0]).unwrap();
        assert_eq!(points, water());
    }

    #[test]
    fn points_from_flat_rejects_ragged_input() {
        assert!(points_from_flat(&[1.0, 2.0]).is_none());
        assert_eq!(points_from_flat(&[]).unwrap().len(), 0);
    }

    #[test]
    fn centroid_is_unweighted_mean_by_default() {
        let c = centroid(&water(), None);
        assert!((c - Point3::new(0.0, 2.0 / 3.0, 2.0 / 3.0)).norm() < 1e-12);
    }

    #[test]
    fn centroid_respects_weights() {
        let c = centroid(&water(), Some(&[1.0, 0.0, 0.0]));
        assert!((c - Point3::origin()).norm() < 1e-12);
    }

    #[test]
    fn distance_matrix_is_symmetric_with_zero_diagonal() {
        let pts = water();
        let dm = distance_matrix(&pts, &pts);
        assert_eq!(dm.shape(), (3, 3));
        for i in 0..3 {
            assert_eq!(dm[(i, i)], 0.0);
            for j in 0..3 {
                assert_eq!(dm[(i, j)], dm[(j, i)]);
            }
        }
        assert!((dm[(1, 2)] - 8.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn calculate_rmsd_returns_none_for_mismatched_lengths() {
        assert!(calculate_rmsd(&water(), &water()[..2]).is_none());
        assert!(calculate_rmsd(&[], &[]).is_none());
    }

    #[test]
    fn calculate_rmsd_of_uniform_shift_is_shift_length() {
        let shifted: Vec<_> = water()
            .iter()
            .map(|p| p + nalgebra::Vector3::new(0.0, 0.0, 1.0))
            .collect();
        assert!((calculate_rmsd(&water(), &shifted).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mirror_y_negates_only_y() {
        let m = mirror_y(&[Point3::new(1.0, 2.0, 3.0)]);
        assert_eq!(m[0], Point3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn all_close_uses_absolute_and_relative_tolerance() {
        let a = [Point3::new(1.0, 0.0, 0.0)];
        let b = [Point3::new(1.0 + 1e-9, 0.0, 0.0)];
        let c = [Point3::new(1.1, 0.0, 0.0)];
        assert!(all_close(&a, &b, 1e-5, 1e-8));
        assert!(!all_close(&a, &c, 1e-5, 1e-8));
    }
}
