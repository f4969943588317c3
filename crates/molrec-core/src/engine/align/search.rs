use super::candidates::{plausible_atom_orderings, shuffle_groups};
use super::kabsch::kabsch_align;
use crate::core::constants::BOHR_TO_ANGSTROM;
use crate::core::models::mill::AlignmentMill;
use crate::core::utils::geometry::{calculate_rmsd, mirror_y};
use crate::engine::config::{AlignmentConfig, MolsAlign};
use crate::engine::error::AlignmentError;
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Either;
use nalgebra::Point3;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Tolerance under which a molecule counts as superimposable on its mirror image.
const MIRROR_SELF_TOLERANCE: f64 = 1.0e-6;
/// Looser cutoff for the mirror self-check so near-degenerate orderings are kept.
const MIRROR_SELF_UNO_CUTOFF: f64 = 0.1;
/// Largest final RMSD tolerated when the molecules are asserted to match exactly.
const EXACT_MATCH_TOLERANCE: f64 = 1.0e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every candidate was evaluated.
    Exhausted,
    /// The best RMSD fell below the convergence threshold.
    Converged,
    /// The caller's cancellation hook fired or the timeout elapsed.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutcome {
    /// RMSD in Ångström of the aligned concern against the reference.
    pub rmsd: f64,
    pub mill: AlignmentMill,
    pub candidates_evaluated: usize,
    pub termination: Termination,
}

struct Best {
    rmsd: f64,
    mill: AlignmentMill,
}

fn rmsd_angstrom(a: &[Point3<f64>], b: &[Point3<f64>]) -> f64 {
    let rmsd = calculate_rmsd(a, b).unwrap_or(0.0) * BOHR_TO_ANGSTROM;
    (rmsd * 1.0e8).round() / 1.0e8
}

fn check_inputs(
    rgeom: &[Point3<f64>],
    cgeom: &[Point3<f64>],
    runiq: &[String],
    cuniq: &[String],
) -> Result<(), AlignmentError> {
    if rgeom.len() != cgeom.len() {
        return Err(AlignmentError::ShapeMismatch {
            reference: rgeom.len(),
            concern: cgeom.len(),
        });
    }
    if runiq.len() != rgeom.len() {
        return Err(AlignmentError::ShapeMismatch {
            reference: rgeom.len(),
            concern: runiq.len(),
        });
    }
    if cuniq.len() != cgeom.len() {
        return Err(AlignmentError::ShapeMismatch {
            reference: cgeom.len(),
            concern: cuniq.len(),
        });
    }
    let mut rsorted = runiq.to_vec();
    let mut csorted = cuniq.to_vec();
    rsorted.sort();
    csorted.sort();
    if rsorted != csorted {
        return Err(AlignmentError::ShuffleClassMismatch {
            reference: runiq.to_vec(),
            concern: cuniq.to_vec(),
        });
    }
    Ok(())
}

/// Whether `geom` can be rotated onto its own mirror image. Shares the caller's
/// remaining time budget and cancellation hook.
fn is_mirror_superimposable(
    geom: &[Point3<f64>],
    uniq: &[String],
    config: &AlignmentConfig,
    remaining: Option<Duration>,
    reporter: &ProgressReporter,
) -> Result<bool, AlignmentError> {
    let self_check = AlignmentConfig {
        atoms_map: false,
        run_resorting: true,
        mols_align: MolsAlign::Threshold(MIRROR_SELF_TOLERANCE),
        run_to_completion: false,
        uno_cutoff: MIRROR_SELF_UNO_CUTOFF,
        run_mirror: false,
        timeout: remaining,
        ..config.clone()
    };
    let mirrored = mirror_y(geom);
    let cancel = ProgressReporter::new().with_cancel(Box::new(|| reporter.is_cancelled()));
    let outcome = search_alignment(geom, &mirrored, uniq, uniq, &self_check, &cancel)?;
    Ok(outcome.rmsd < MIRROR_SELF_TOLERANCE)
}

/// Finds the atom ordering and rigid transform (optionally including a
/// reflection) that best superimpose `cgeom` onto `rgeom`.
///
/// Both geometries are in Bohr; `runiq`/`cuniq` hold each atom's shuffle class
/// and must be equal as multisets. Candidate orderings are consumed lazily and
/// the search stops at the first one under the convergence threshold unless
/// `run_to_completion` is set. Cancellation and the timeout are polled between
/// candidates; a search stopped that way still returns its best result so far.
#[instrument(skip_all, name = "alignment_search")]
pub fn search_alignment(
    rgeom: &[Point3<f64>],
    cgeom: &[Point3<f64>],
    runiq: &[String],
    cuniq: &[String],
    config: &AlignmentConfig,
    reporter: &ProgressReporter,
) -> Result<AlignmentOutcome, AlignmentError> {
    check_inputs(rgeom, cgeom, runiq, cuniq)?;

    let nat = rgeom.len();
    if nat == 0 {
        return Ok(AlignmentOutcome {
            rmsd: 0.0,
            mill: AlignmentMill::identity(0),
            candidates_evaluated: 0,
            termination: Termination::Exhausted,
        });
    }

    let started = Instant::now();
    let remaining = config.timeout.map(|t| t.saturating_sub(started.elapsed()));
    let do_mirror = if config.run_mirror
        && is_mirror_superimposable(cgeom, cuniq, config, remaining, reporter)?
    {
        reporter.report(Progress::Message(
            "Molecule is superimposable on its mirror image; skipping mirror candidates.".to_string(),
        ));
        false
    } else {
        config.run_mirror
    };
    let mirrored = if do_mirror { mirror_y(cgeom) } else { Vec::new() };
    let convergence = config.mols_align.convergence_threshold();
    info!(
        nat,
        resort = config.resorts(),
        mirror = do_mirror,
        convergence,
        "Starting alignment search."
    );
    reporter.report(Progress::SearchStart { mirror: do_mirror });

    let orderings = if config.resorts() {
        let groups = shuffle_groups(runiq, cuniq);
        Either::Left(plausible_atom_orderings(
            rgeom,
            cgeom,
            &groups,
            config.algorithm,
            config.uno_cutoff,
        ))
    } else {
        Either::Right(std::iter::once((0..nat).collect::<Vec<usize>>()))
    };

    let mut best: Option<Best> = None;
    let mut evaluated = 0usize;
    let mut termination = Termination::Exhausted;

    'search: for ordering in orderings {
        let timed_out = config.timeout.is_some_and(|t| started.elapsed() >= t);
        if timed_out || reporter.is_cancelled() {
            warn!(evaluated, timed_out, "Alignment search stopped early.");
            termination = Termination::Cancelled;
            break;
        }

        let branches = [(false, cgeom), (true, mirrored.as_slice())];
        for (mirror, source) in branches.into_iter().filter(|(m, _)| !m || do_mirror) {
            let ordered: Vec<Point3<f64>> = ordering.iter().map(|&i| source[i]).collect();
            let fit = kabsch_align(rgeom, &ordered, None)?;
            let mill = AlignmentMill::new(fit.shift, fit.rotation, ordering.clone(), mirror)?;
            let tgeom = mill.align_coordinates(cgeom, false)?;
            let rmsd = rmsd_angstrom(&tgeom, rgeom);

            let index = evaluated;
            evaluated += 1;
            reporter.report(Progress::CandidateEvaluated {
                index,
                rmsd,
                mirror,
            });

            if best.as_ref().is_none_or(|b| rmsd < b.rmsd) {
                debug!(index, rmsd, mirror, atommap = ?mill.atommap, "New best candidate.");
                reporter.report(Progress::Improved {
                    index,
                    rmsd,
                    mirror,
                });
                best = Some(Best { rmsd, mill });
            }

            if !config.run_to_completion && best.as_ref().is_some_and(|b| b.rmsd < convergence) {
                termination = Termination::Converged;
                break 'search;
            }
        }
    }

    let Some(best) = best else {
        return Err(if termination == Termination::Cancelled {
            AlignmentError::Cancelled { evaluated }
        } else {
            AlignmentError::NoCandidate
        });
    };

    let (ageom, _) = best.mill.align_system(cgeom, cuniq, false)?;
    let rmsd = rmsd_angstrom(&ageom, rgeom);
    if config.mols_align.expects_exact_match() && rmsd > EXACT_MATCH_TOLERANCE {
        warn!(rmsd, "Molecules were asserted to match exactly but do not superimpose.");
    }

    reporter.report(Progress::SearchFinish {
        evaluated,
        best_rmsd: rmsd,
    });
    info!(
        rmsd,
        evaluated,
        mirror = best.mill.mirror,
        termination = ?termination,
        "Alignment search finished."
    );

    Ok(AlignmentOutcome {
        rmsd,
        mill: best.mill,
        candidates_evaluated: evaluated,
        termination,
    })
}
