use crate::core::models::mill::{AlignmentMill, MillError};
use nalgebra::{Matrix3, Vector3};
use rand::{Rng, seq::SliceRandom, thread_rng};
use std::f64::consts::PI;

/// How one component of a scrambling transform is chosen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scramble<T> {
    #[default]
    Random,
    Identity,
    Given(T),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrambleSpec {
    pub resort: Scramble<Vec<usize>>,
    pub shift: Scramble<Vector3<f64>>,
    pub rotate: Scramble<Matrix3<f64>>,
    /// Fraction of the full rotation space sampled by a random rotation, in `[0, 1]`.
    pub deflection: f64,
    pub mirror: bool,
}

impl Default for ScrambleSpec {
    fn default() -> Self {
        Self {
            resort: Scramble::Random,
            shift: Scramble::Random,
            rotate: Scramble::Random,
            deflection: 1.0,
            mirror: false,
        }
    }
}

/// Random rotation after Arvo, "Fast Random Rotation Matrices" (Graphics Gems III).
///
/// `deflection` of 1 covers all rotations uniformly; smaller values bound the
/// perturbation around a fixed pole.
pub fn random_rotation_matrix(deflection: f64, rng: &mut impl Rng) -> Matrix3<f64> {
    let theta = rng.r#gen::<f64>() * 2.0 * deflection * PI;
    let phi = rng.r#gen::<f64>() * 2.0 * PI;
    let z = rng.r#gen::<f64>() * 2.0 * deflection;

    let r = z.sqrt();
    let v = Vector3::new(phi.sin() * r, phi.cos() * r, (2.0 - z).sqrt());
    let (st, ct) = theta.sin_cos();
    let spin = Matrix3::new(ct, st, 0.0, -st, ct, 0.0, 0.0, 0.0, 1.0);

    (v * v.transpose() - Matrix3::identity()) * spin
}

/// Builds a mill that scrambles a geometry of `nat` atoms, drawing random
/// components from `rng`.
pub fn compute_scramble_with_rng(
    nat: usize,
    spec: &ScrambleSpec,
    rng: &mut impl Rng,
) -> Result<AlignmentMill, MillError> {
    let atommap = match &spec.resort {
        Scramble::Random => {
            let mut perm: Vec<usize> = (0..nat).collect();
            perm.shuffle(rng);
            perm
        }
        Scramble::Identity => (0..nat).collect(),
        Scramble::Given(perm) => {
            if perm.len() != nat {
                return Err(MillError::LengthMismatch {
                    expected: nat,
                    found: perm.len(),
                });
            }
            perm.clone()
        }
    };

    let shift = match &spec.shift {
        Scramble::Random => Vector3::from_fn(|_, _| 6.0 * rng.r#gen::<f64>() - 3.0),
        Scramble::Identity => Vector3::zeros(),
        Scramble::Given(v) => *v,
    };

    let rotation = match &spec.rotate {
        Scramble::Random => random_rotation_matrix(spec.deflection, rng),
        Scramble::Identity => Matrix3::identity(),
        Scramble::Given(m) => *m,
    };

    AlignmentMill::new(shift, rotation, atommap, spec.mirror)
}

/// [`compute_scramble_with_rng`] with the thread-local generator.
pub fn compute_scramble(nat: usize, spec: &ScrambleSpec) -> Result<AlignmentMill, MillError> {
    compute_scramble_with_rng(nat, spec, &mut thread_rng())
}
