use crate::core::models::inputs::MoleculeArrays;
use crate::core::models::molrec::{Domain, Molrec, Provenance};
use crate::engine::config::{MissingPolicy, ValidationOptions};
use crate::engine::error::ValidationError;
use crate::engine::nucleus::reconcile::NucleusReconciler;
use crate::engine::validation::builder::MolrecBuilder;
use crate::engine::validation::chgmult::{ChargeMultiplicityInput, resolve_charge_multiplicity};
use crate::engine::validation::connectivity::validate_connectivity;
use crate::engine::validation::efp::validate_efp;
use crate::engine::validation::fragments::{FragmentLayout, validate_fragments};
use crate::engine::validation::frame::validate_frame;
use crate::engine::validation::geometry::validate_geometry;
use crate::engine::validation::nuclei::{NucleiArrays, validate_nuclei};
use crate::engine::validation::units::{validate_provenance, validate_units};
use crate::engine::validation::zmat::validate_unsettled_geometry;
use tracing::{debug, info, instrument};

const ROUTINE: &str = "molrec::workflows::from_arrays";

/// Which domains [`from_input_arrays`] processes and what each does when its
/// defining data is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainSelection {
    pub enable_qm: bool,
    pub enable_efp: bool,
    pub missing_qm: MissingPolicy,
    pub missing_efp: MissingPolicy,
}

impl Default for DomainSelection {
    fn default() -> Self {
        Self {
            enable_qm: true,
            enable_efp: true,
            missing_qm: MissingPolicy::Error,
            missing_efp: MissingPolicy::Omit,
        }
    }
}

/// Records produced for each enabled domain that had (or tolerated a lack of) data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposedMolrec {
    pub qm: Option<Molrec>,
    pub efp: Option<Molrec>,
}

/// Outcome of the missing-data check for one domain.
enum Presence {
    Present,
    Empty,
    Skip,
}

fn check_presence(
    domain: Domain,
    arrays: &MoleculeArrays,
    policy: MissingPolicy,
) -> Result<Presence, ValidationError> {
    let (present, key) = match domain {
        Domain::Qm => (arrays.geom.as_ref().is_some_and(|g| !g.is_empty()), "geom"),
        Domain::Efp => (arrays.has_efp_hints(), "geom_hints"),
        Domain::Qmvz => return Ok(Presence::Present),
    };
    if present {
        return Ok(Presence::Present);
    }
    match policy {
        MissingPolicy::Omit => Ok(Presence::Skip),
        MissingPolicy::Minimal => Ok(Presence::Empty),
        MissingPolicy::Error => Err(ValidationError::Domain(format!(
            "For domain '{domain}', `{key}` must be provided."
        ))),
    }
}

fn set_nuclei(builder: &mut MolrecBuilder, nuclei: NucleiArrays) -> Result<(), ValidationError> {
    builder
        .elea(nuclei.elea)?
        .elez(nuclei.elez)?
        .elem(nuclei.elem)?
        .mass(nuclei.mass)?
        .real(nuclei.real)?
        .elbl(nuclei.elbl)?;
    Ok(())
}

/// Solves charge and multiplicity over `layout` and stores the result.
fn set_charge_multiplicity(
    builder: &mut MolrecBuilder,
    zeff: &[f64],
    layout: FragmentLayout,
    arrays: &MoleculeArrays,
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    let solved = resolve_charge_multiplicity(&ChargeMultiplicityInput {
        zeff,
        fragment_separators: &layout.separators,
        molecular_charge: arrays.molecular_charge,
        fragment_charges: &layout.charges,
        molecular_multiplicity: arrays.molecular_multiplicity,
        fragment_multiplicities: &layout.multiplicities,
        zero_ghost_fragments: options.zero_ghost_fragments,
    })?;
    builder
        .fragment_separators(layout.separators)?
        .fragment_charges(solved.fragment_charges.into_iter().map(Some).collect())?
        .fragment_multiplicities(solved.fragment_multiplicities.into_iter().map(Some).collect())?
        .molecular_charge(solved.molecular_charge)?
        .molecular_multiplicity(solved.molecular_multiplicity)?;
    Ok(())
}

/// Validates one domain's worth of loosely specified molecule arrays into a
/// canonical [`Molrec`].
///
/// Returns `Ok(None)` only when the domain's defining data is missing and the
/// options' [`MissingPolicy`] is `Omit`. A `qm` domain requires `geom`, an
/// `efp` domain `geom_hints` and a `qmvz` domain `geom_unsettled`.
#[instrument(skip_all, name = "from_arrays", fields(domain = %domain))]
pub fn from_arrays(
    domain: Domain,
    arrays: &MoleculeArrays,
    options: &ValidationOptions,
) -> Result<Option<Molrec>, ValidationError> {
    let presence = check_presence(domain, arrays, options.missing_enabled_return)?;
    if matches!(presence, Presence::Skip) {
        debug!("Domain data absent; omitting record.");
        return Ok(None);
    }
    let mut builder = MolrecBuilder::new();
    builder.domain(domain)?;

    // === Stage 1: Units, labels and provenance ===
    let (units, input_units_to_au) =
        validate_units(arrays.units.as_deref(), arrays.input_units_to_au)?;
    builder.units(units)?;
    if let Some(factor) = input_units_to_au {
        builder.input_units_to_au(factor)?;
    }
    if let Some(name) = &arrays.name {
        builder.name(name.clone())?;
    }
    if let Some(comment) = &arrays.comment {
        builder.comment(comment.clone())?;
    }
    if let Some(provenance) = &arrays.provenance {
        validate_provenance(provenance)?;
    }
    builder.provenance(Provenance::stamp(ROUTINE))?;

    // === Stage 2: Effective fragments ===
    if domain == Domain::Efp {
        let efp = match presence {
            Presence::Empty => validate_efp(&[], &[], &[])?,
            _ => validate_efp(
                arrays.fragment_files.as_deref().unwrap_or_default(),
                arrays.hint_types.as_deref().unwrap_or_default(),
                arrays.geom_hints.as_deref().unwrap_or_default(),
            )?,
        };
        debug!(nfragments = efp.geom_hints.len(), "Validated effective fragments.");
        builder.efp(efp)?;
    }

    // === Stage 3: Atoms, fragments, charge and multiplicity ===
    let has_atoms = domain != Domain::Efp || arrays.geom.is_some();
    let nat = if has_atoms {
        let nat = match domain {
            Domain::Qmvz => {
                let lines = arrays.geom_unsettled.clone().ok_or_else(|| {
                    ValidationError::Domain(
                        "For domain 'qmvz', `geom_unsettled` must be provided.".to_string(),
                    )
                })?;
                let unsettled =
                    validate_unsettled_geometry(lines, arrays.variables.clone().unwrap_or_default())?;
                let nat = unsettled.lines.len();
                builder.geom_unsettled(unsettled)?;
                nat
            }
            _ => {
                let geom = arrays.geom.clone().unwrap_or_default();
                let nat = validate_geometry(&geom, options.tooclose)?;
                builder.geom(geom)?;
                nat
            }
        };

        let nuclei = validate_nuclei(nat, arrays, options, &NucleusReconciler::builtin())?;
        let zeff: Vec<f64> = nuclei
            .elez
            .iter()
            .zip(&nuclei.real)
            .map(|(&z, &real)| if real { f64::from(z) } else { 0.0 })
            .collect();
        set_nuclei(&mut builder, nuclei)?;

        let layout = validate_fragments(
            nat,
            arrays.fragment_separators.as_deref(),
            arrays.fragment_charges.as_deref(),
            arrays.fragment_multiplicities.as_deref(),
        )?;
        set_charge_multiplicity(&mut builder, &zeff, layout, arrays, options)?;
        nat
    } else {
        set_nuclei(&mut builder, NucleiArrays::default())?;
        let layout = FragmentLayout {
            separators: Vec::new(),
            charges: vec![None],
            multiplicities: vec![None],
        };
        set_charge_multiplicity(&mut builder, &[], layout, &MoleculeArrays::default(), options)?;
        0
    };

    if let Some(triples) = &arrays.connectivity {
        let bonds = validate_connectivity(triples)?;
        if let Some(bond) = bonds.iter().find(|b| b.atom_b >= nat) {
            return Err(ValidationError::InvalidField {
                field: "connectivity",
                reason: format!(
                    "bond ({}, {}) references an atom outside [0, {nat})",
                    bond.atom_a, bond.atom_b
                ),
            });
        }
        builder.connectivity(bonds)?;
    }

    // === Stage 4: Frame ===
    let frame = validate_frame(
        domain == Domain::Efp,
        arrays.fix_com,
        arrays.fix_orientation,
        arrays.fix_symmetry.as_deref(),
    )?;
    builder
        .fix_com(frame.fix_com)?
        .fix_orientation(frame.fix_orientation)?;
    if let Some(symmetry) = frame.fix_symmetry {
        builder.fix_symmetry(symmetry)?;
    }

    let molrec = builder.build()?;
    info!(
        nat = molrec.nat(),
        nfragments = molrec.nfragments(),
        charge = molrec.molecular_charge,
        multiplicity = molrec.molecular_multiplicity,
        "Validated molecule record."
    );
    Ok(Some(molrec))
}

/// Composes the `efp` and `qm` (or `qmvz`) domains of one input.
///
/// The EFP domain is processed first. If it places any fragments, the QM part is
/// pinned to their frame: `fix_com` and `fix_orientation` become true and
/// `fix_symmetry` becomes `"c1"`.
#[instrument(skip_all, name = "from_input_arrays")]
pub fn from_input_arrays(
    arrays: &MoleculeArrays,
    options: &ValidationOptions,
    selection: DomainSelection,
) -> Result<ComposedMolrec, ValidationError> {
    let mut composed = ComposedMolrec::default();
    let mut qm_arrays = MoleculeArrays {
        fragment_files: None,
        hint_types: None,
        geom_hints: None,
        ..arrays.clone()
    };

    if selection.enable_efp {
        let efp_arrays = MoleculeArrays {
            units: arrays.units.clone(),
            input_units_to_au: arrays.input_units_to_au,
            fix_com: arrays.fix_com,
            fix_orientation: arrays.fix_orientation,
            fix_symmetry: arrays.fix_symmetry.clone(),
            fragment_files: arrays.fragment_files.clone(),
            hint_types: arrays.hint_types.clone(),
            geom_hints: arrays.geom_hints.clone(),
            ..MoleculeArrays::default()
        };
        let efp_options = ValidationOptions {
            missing_enabled_return: selection.missing_efp,
            ..options.clone()
        };
        composed.efp = from_arrays(Domain::Efp, &efp_arrays, &efp_options)?;
    }

    let efp_present = composed
        .efp
        .as_ref()
        .and_then(|m| m.efp.as_ref())
        .is_some_and(|efp| !efp.is_empty());
    if efp_present {
        debug!("Effective fragments present; pinning the QM frame.");
        qm_arrays.fix_com = Some(true);
        qm_arrays.fix_orientation = Some(true);
        qm_arrays.fix_symmetry = Some("c1".to_string());
    }

    if selection.enable_qm {
        let domain = if qm_arrays.geom_unsettled.as_ref().is_some_and(|g| !g.is_empty()) {
            Domain::Qmvz
        } else {
            Domain::Qm
        };
        let qm_options = ValidationOptions {
            missing_enabled_return: selection.missing_qm,
            ..options.clone()
        };
        composed.qm = from_arrays(domain, &qm_arrays, &qm_options)?;
    }

    Ok(composed)
}
