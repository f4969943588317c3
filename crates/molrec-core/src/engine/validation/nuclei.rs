use crate::core::models::inputs::MoleculeArrays;
use crate::core::models::nucleus::Nucleus;
use crate::engine::config::ValidationOptions;
use crate::engine::error::ValidationError;
use crate::engine::nucleus::cache::NucleusQuery;
use crate::engine::nucleus::reconcile::NucleusReconciler;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Validated per-atom identity arrays, each of length `nat`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NucleiArrays {
    pub elea: Vec<i32>,
    pub elez: Vec<u32>,
    pub elem: Vec<String>,
    pub mass: Vec<f64>,
    pub real: Vec<bool>,
    pub elbl: Vec<String>,
}

fn check_len<T>(what: &str, values: Option<&Vec<T>>, nat: usize) -> Result<(), ValidationError> {
    match values {
        Some(v) if v.len() != nat => Err(ValidationError::ShapeMismatch {
            what: format!("per-atom array '{what}'"),
            expected: nat,
            found: v.len(),
        }),
        _ => Ok(()),
    }
}

fn query_for_atom(arrays: &MoleculeArrays, options: &ValidationOptions, at: usize) -> NucleusQuery {
    NucleusQuery {
        mass_number: arrays
            .elea
            .as_ref()
            .map(|v| i64::from(v[at]))
            .filter(|&a| a != i64::from(Nucleus::UNKNOWN_MASS_NUMBER)),
        atomic_number: arrays.elez.as_ref().map(|v| i64::from(v[at])),
        symbol: arrays.elem.as_ref().map(|v| v[at].clone()),
        mass: arrays.mass.as_ref().map(|v| v[at]),
        real: arrays.real.as_ref().map(|v| v[at]),
        label: arrays.elbl.as_ref().map(|v| v[at].clone()),
        speclabel: options.speclabel,
        nonphysical: options.nonphysical,
        mtol: options.mtol,
    }
}

/// Reconciles every atom's clues into one nucleus. Array lengths are checked
/// before any reconciliation; the first failing atom, in atom order, is reported.
pub fn validate_nuclei(
    nat: usize,
    arrays: &MoleculeArrays,
    options: &ValidationOptions,
    reconciler: &NucleusReconciler<'_>,
) -> Result<NucleiArrays, ValidationError> {
    check_len("elea", arrays.elea.as_ref(), nat)?;
    check_len("elez", arrays.elez.as_ref(), nat)?;
    check_len("elem", arrays.elem.as_ref(), nat)?;
    check_len("mass", arrays.mass.as_ref(), nat)?;
    check_len("real", arrays.real.as_ref(), nat)?;
    check_len("elbl", arrays.elbl.as_ref(), nat)?;

    let queries: Vec<NucleusQuery> = (0..nat)
        .map(|at| query_for_atom(arrays, options, at))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let iterator = queries.iter();

    #[cfg(feature = "parallel")]
    let iterator = queries.par_iter();

    let results: Vec<Result<Nucleus, ValidationError>> =
        iterator.map(|query| reconciler.reconcile(query)).collect();

    let mut out = NucleiArrays {
        elea: Vec::with_capacity(nat),
        elez: Vec::with_capacity(nat),
        elem: Vec::with_capacity(nat),
        mass: Vec::with_capacity(nat),
        real: Vec::with_capacity(nat),
        elbl: Vec::with_capacity(nat),
    };
    for result in results {
        let nucleus = result?;
        out.elea.push(nucleus.mass_number);
        out.elez.push(nucleus.atomic_number);
        out.elem.push(nucleus.symbol);
        out.mass.push(nucleus.mass);
        out.real.push(nucleus.real);
        out.elbl.push(nucleus.label);
    }
    debug!(nat, "Reconciled nuclei.");
    Ok(out)
}
