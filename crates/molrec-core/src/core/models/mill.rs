use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MillError {
    #[error("Atom map {0:?} is not a permutation of its own indices")]
    InvalidAtomMap(Vec<usize>),
    #[error("Mill prepared for {expected} atoms applied to {found}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Rigid-body transform plus atom relabeling taking a concern geometry onto a reference.
///
/// Forward application mirrors (negates y) when `mirror` is set, subtracts `shift`,
/// applies `rotation` to row vectors (`x · rotation`) and finally reorders atoms so
/// that position `i` receives source atom `atommap[i]`. Reverse application is the
/// exact inverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentMill {
    pub shift: Vector3<f64>,
    pub rotation: Matrix3<f64>,
    pub atommap: Vec<usize>,
    pub mirror: bool,
}

impl AlignmentMill {
    pub fn new(
        shift: Vector3<f64>,
        rotation: Matrix3<f64>,
        atommap: Vec<usize>,
        mirror: bool,
    ) -> Result<Self, MillError> {
        let mut seen = vec![false; atommap.len()];
        for &idx in &atommap {
            if idx >= atommap.len() || seen[idx] {
                return Err(MillError::InvalidAtomMap(atommap));
            }
            seen[idx] = true;
        }
        Ok(Self {
            shift,
            rotation,
            atommap,
            mirror,
        })
    }

    pub fn identity(nat: usize) -> Self {
        Self {
            shift: Vector3::zeros(),
            rotation: Matrix3::identity(),
            atommap: (0..nat).collect(),
            mirror: false,
        }
    }

    pub fn nat(&self) -> usize {
        self.atommap.len()
    }

    fn check_len(&self, found: usize) -> Result<(), MillError> {
        if found != self.nat() {
            return Err(MillError::LengthMismatch {
                expected: self.nat(),
                found,
            });
        }
        Ok(())
    }

    pub fn align_coordinates(
        &self,
        geom: &[Point3<f64>],
        reverse: bool,
    ) -> Result<Vec<Point3<f64>>, MillError> {
        self.check_len(geom.len())?;
        if reverse {
            let mut unsorted = vec![Point3::origin(); geom.len()];
            for (i, &src) in self.atommap.iter().enumerate() {
                unsorted[src] = geom[i];
            }
            Ok(unsorted
                .into_iter()
                .map(|p| {
                    let q = Point3::from(self.rotation * p.coords + self.shift);
                    if self.mirror {
                        Point3::new(q.x, -q.y, q.z)
                    } else {
                        q
                    }
                })
                .collect())
        } else {
            let moved: Vec<Point3<f64>> = geom
                .iter()
                .map(|p| {
                    let p = if self.mirror {
                        Point3::new(p.x, -p.y, p.z)
                    } else {
                        *p
                    };
                    Point3::from(self.rotation.transpose() * (p.coords - self.shift))
                })
                .collect();
            Ok(self.atommap.iter().map(|&src| moved[src]).collect())
        }
    }

    /// Reorders any per-atom array into the target atom order.
    pub fn align_atoms<T: Clone>(&self, items: &[T]) -> Result<Vec<T>, MillError> {
        self.check_len(items.len())?;
        Ok(self.atommap.iter().map(|&src| items[src].clone()).collect())
    }

    /// Rotates a free vector (no shift, no relabeling).
    pub fn align_vector(&self, vec: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.transpose() * vec
    }

    /// Rotates and reorders a per-atom gradient.
    pub fn align_gradient(&self, grad: &[Vector3<f64>]) -> Result<Vec<Vector3<f64>>, MillError> {
        self.check_len(grad.len())?;
        Ok(self
            .atommap
            .iter()
            .map(|&src| self.align_vector(&grad[src]))
            .collect())
    }

    /// Transforms a geometry and reorders its shuffle classes alongside it.
    pub fn align_system(
        &self,
        geom: &[Point3<f64>],
        uniq: &[String],
        reverse: bool,
    ) -> Result<(Vec<Point3<f64>>, Vec<String>), MillError> {
        let nugeom = self.align_coordinates(geom, reverse)?;
        self.check_len(uniq.len())?;
        let nuuniq = if reverse {
            let mut out = vec![String::new(); uniq.len()];
            for (i, &src) in self.atommap.iter().enumerate() {
                out[src] = uniq[i].clone();
            }
            out
        } else {
            self.align_atoms(uniq)?
        };
        Ok((nugeom, nuuniq))
    }
}

impl fmt::Display for AlignmentMill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(40);
        writeln!(f, "{rule}")?;
        writeln!(f, "{:^40}", "AlignmentMill")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Mirror:   {}", self.mirror)?;
        writeln!(f, "Atom Map: {:?}", self.atommap)?;
        writeln!(
            f,
            "Shift:    [{:12.8} {:12.8} {:12.8}]",
            self.shift.x, self.shift.y, self.shift.z
        )?;
        writeln!(f, "Rotation:")?;
        for row in self.rotation.row_iter() {
            writeln!(f, "          [{:12.8} {:12.8} {:12.8}]", row[0], row[1], row[2])?;
        }
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    fn geometry() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.1, 0.2, 0.3),
            Point3::new(1.5, -0.4, 0.0),
            Point3::new(-0.7, 2.2, 1.1),
            Point3::new(0.0, 0.0, -1.9),
        ]
    }

    fn sample_mill(mirror: bool) -> AlignmentMill {
        let rotation = Rotation3::from_euler_angles(0.3, -1.1, 2.0).into_inner();
        AlignmentMill::new(
            Vector3::new(1.0, -2.0, 0.5),
            rotation,
            vec![2, 0, 3, 1],
            mirror,
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_non_permutation_atom_maps() {
        let result = AlignmentMill::new(Vector3::zeros(), Matrix3::identity(), vec![0, 0], false);
        assert!(matches!(result, Err(MillError::InvalidAtomMap(_))));
        let result = AlignmentMill::new(Vector3::zeros(), Matrix3::identity(), vec![0, 2], false);
        assert!(matches!(result, Err(MillError::InvalidAtomMap(_))));
    }

    #[test]
    fn identity_leaves_geometry_unchanged() {
        let geom = geometry();
        let out = AlignmentMill::identity(4)
            .align_coordinates(&geom, false)
            .unwrap();
        assert_eq!(out, geom);
    }

    #[test]
    fn reverse_undoes_forward() {
        for mirror in [false, true] {
            let mill = sample_mill(mirror);
            let geom = geometry();
            let forward = mill.align_coordinates(&geom, false).unwrap();
            let back = mill.align_coordinates(&forward, true).unwrap();
            for (a, b) in geom.iter().zip(&back) {
                assert!((a - b).norm() < 1e-10, "mirror={mirror}");
            }
        }
    }

    #[test]
    fn forward_reorders_by_atom_map() {
        let mill = AlignmentMill::new(Vector3::zeros(), Matrix3::identity(), vec![1, 0, 2, 3], false)
            .unwrap();
        let out = mill.align_coordinates(&geometry(), false).unwrap();
        assert_eq!(out[0], geometry()[1]);
        assert_eq!(out[1], geometry()[0]);
    }

    #[test]
    fn forward_preserves_interatomic_distances() {
        let mill = sample_mill(true);
        let geom = geometry();
        let out = mill.align_coordinates(&geom, false).unwrap();
        let d_in = nalgebra::distance(&geom[2], &geom[0]);
        let d_out = nalgebra::distance(&out[0], &out[1]);
        assert!((d_in - d_out).abs() < 1e-10);
    }

    #[test]
    fn align_coordinates_rejects_wrong_atom_count() {
        let mill = sample_mill(false);
        let result = mill.align_coordinates(&geometry()[..3], false);
        assert!(matches!(
            result,
            Err(MillError::LengthMismatch {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn align_atoms_follows_atom_map() {
        let mill = sample_mill(false);
        let out = mill.align_atoms(&["a", "b", "c", "d"]).unwrap();
        assert_eq!(out, vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn align_gradient_rotates_without_shift() {
        let mill = sample_mill(false);
        let grad = vec![Vector3::new(1.0, 0.0, 0.0); 4];
        let out = mill.align_gradient(&grad).unwrap();
        for g in out {
            assert!((g.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn align_system_round_trips_labels() {
        let mill = sample_mill(false);
        let uniq: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let (g, u) = mill.align_system(&geometry(), &uniq, false).unwrap();
        let (_, back) = mill.align_system(&g, &u, true).unwrap();
        assert_eq!(back, uniq);
    }

    #[test]
    fn display_lists_all_fields() {
        let text = sample_mill(true).to_string();
        assert!(text.contains("AlignmentMill"));
        assert!(text.contains("Mirror:   true"));
        assert!(text.contains("Atom Map: [2, 0, 3, 1]"));
    }
}
