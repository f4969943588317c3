use super::hungarian::linear_sum_assignment;
use super::uno::all_perfect_matchings;
use crate::core::utils::geometry::distance_matrix;
use crate::engine::config::OrderingAlgorithm;
use itertools::Itertools;
use nalgebra::{DMatrix, Point3};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Largest mismatch of consecutive intra-group distances the permutative screen accepts.
const PERMUTATIVE_ATOL: f64 = 1.0;

/// Scales the pseudo-repulsion sums to the magnitude of a neon-like nuclear charge.
const NRE_SCALE: f64 = 100.0;

/// Atoms sharing one shuffle class: reference indices paired positionally with
/// the concern indices that may fill them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleGroup {
    pub reference: Vec<usize>,
    pub concern: Vec<usize>,
}

/// Partitions atoms by shuffle class, in order of first appearance in the reference.
pub fn shuffle_groups(runiq: &[String], cuniq: &[String]) -> Vec<ShuffleGroup> {
    let mut groups: Vec<(String, ShuffleGroup)> = Vec::new();
    for (i, class) in runiq.iter().enumerate() {
        match groups.iter_mut().find(|(c, _)| c == class) {
            Some((_, group)) => group.reference.push(i),
            None => groups.push((
                class.clone(),
                ShuffleGroup {
                    reference: vec![i],
                    concern: Vec::new(),
                },
            )),
        }
    }
    for (i, class) in cuniq.iter().enumerate() {
        if let Some((_, group)) = groups.iter_mut().find(|(c, _)| c == class) {
            group.concern.push(i);
        }
    }
    groups.into_iter().map(|(_, g)| g).collect()
}

/// Element-wise reciprocal distances with a zero diagonal.
fn pseudo_repulsion(points: &[Point3<f64>]) -> DMatrix<f64> {
    distance_matrix(points, points).map(|d| if d > 0.0 { 1.0 / d } else { 0.0 })
}

struct Screen {
    rdist: DMatrix<f64>,
    cdist: DMatrix<f64>,
    rnre: DMatrix<f64>,
    cnre: DMatrix<f64>,
    uno_cutoff: f64,
    algorithm: OrderingAlgorithm,
}

impl Screen {
    /// Orderings of `group.concern` whose consecutive distances track the reference's.
    fn permutative(&self, group: &ShuffleGroup) -> Vec<Vec<usize>> {
        let rchain: Vec<f64> = group
            .reference
            .windows(2)
            .map(|w| self.rdist[(w[0], w[1])])
            .collect();
        group
            .concern
            .iter()
            .copied()
            .permutations(group.concern.len())
            .filter(|pm| {
                pm.windows(2)
                    .map(|w| self.cdist[(w[0], w[1])])
                    .zip(&rchain)
                    .all(|(c, &r)| (r - c).abs() <= PERMUTATIVE_ATOL + 1.0e-5 * c.abs())
            })
            .collect()
    }

    /// Every minimum-cost ordering under a cost built from each atom's summed
    /// pseudo nuclear repulsion within its group.
    fn hungarian_uno(&self, group: &ShuffleGroup) -> Vec<Vec<usize>> {
        let n = group.concern.len();
        let column_sums = |nre: &DMatrix<f64>, idx: &[usize]| -> Vec<f64> {
            idx.iter()
                .map(|&col| NRE_SCALE * idx.iter().map(|&row| nre[(row, col)]).sum::<f64>())
                .collect()
        };
        let csum = column_sums(&self.cnre, &group.concern);
        let rsum = column_sums(&self.rnre, &group.reference);
        let cost = DMatrix::from_fn(n, n, |i, j| (csum[i] - rsum[j]).powi(2));

        let Some(assignment) = linear_sum_assignment(&cost) else {
            return Vec::new();
        };
        trace!(total = assignment.total, "Seed assignment for group.");

        let edges: Vec<(usize, usize)> = (0..n)
            .cartesian_product(0..n)
            .filter(|&(i, j)| assignment.reduced[(i, j)] < self.uno_cutoff)
            .collect();
        let Some(matchings) = all_perfect_matchings(n, &edges, &assignment.row_to_col) else {
            return Vec::new();
        };

        matchings
            .map(|concern_to_ref| {
                let mut ordering = vec![0usize; n];
                for (i, &j) in concern_to_ref.iter().enumerate() {
                    ordering[j] = group.concern[i];
                }
                ordering
            })
            .collect()
    }

    fn screen(&self, group: &ShuffleGroup) -> Vec<Vec<usize>> {
        let found = match self.algorithm {
            OrderingAlgorithm::Permutative => self.permutative(group),
            OrderingAlgorithm::HungarianUno => self.hungarian_uno(group),
        };
        debug!(
            reference = ?group.reference,
            concern = ?group.concern,
            candidates = found.len(),
            "Screened shuffle group."
        );
        found
    }
}

/// Lazily yields full-molecule atom maps: entry `i` is the concern atom that
/// should sit at reference position `i`.
///
/// Candidates for each shuffle group are screened up front; their combination
/// across groups is a lazy Cartesian product in group order.
pub fn plausible_atom_orderings(
    rgeom: &[Point3<f64>],
    cgeom: &[Point3<f64>],
    groups: &[ShuffleGroup],
    algorithm: OrderingAlgorithm,
    uno_cutoff: f64,
) -> impl Iterator<Item = Vec<usize>> + use<> {
    let screen = Screen {
        rdist: distance_matrix(rgeom, rgeom),
        cdist: distance_matrix(cgeom, cgeom),
        rnre: pseudo_repulsion(rgeom),
        cnre: pseudo_repulsion(cgeom),
        uno_cutoff,
        algorithm,
    };

    #[cfg(not(feature = "parallel"))]
    let iterator = groups.iter();

    #[cfg(feature = "parallel")]
    let iterator = groups.par_iter();

    let per_group: Vec<Vec<Vec<usize>>> = iterator.map(|g| screen.screen(g)).collect();

    let nat = rgeom.len();
    let slots: Vec<Vec<usize>> = groups.iter().map(|g| g.reference.clone()).collect();
    per_group
        .into_iter()
        .multi_cartesian_product()
        .map(move |choice| {
            let mut atommap = vec![0usize; nat];
            for (positions, ordering) in slots.iter().zip(&choice) {
                for (&pos, &src) in positions.iter().zip(ordering) {
                    atommap[pos] = src;
                }
            }
            atommap
        })
}
