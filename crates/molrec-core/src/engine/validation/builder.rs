use crate::core::models::molrec::{
    Bond, Domain, EfpHints, Molrec, Provenance, Units, UnsettledGeometry,
};
use crate::engine::error::ValidationError;
use std::fmt::Debug;

/// Stores `incoming` in an empty slot, accepts it if equal to what the slot
/// already holds, and reports a conflict otherwise.
fn merge_slot<T: PartialEq + Debug>(
    field: &'static str,
    slot: &mut Option<T>,
    incoming: T,
) -> Result<(), ValidationError> {
    match slot {
        None => {
            *slot = Some(incoming);
            Ok(())
        }
        Some(existing) if *existing == incoming => Ok(()),
        Some(existing) => Err(ValidationError::Conflict {
            field,
            existing: format!("{existing:?}"),
            incoming: format!("{incoming:?}"),
        }),
    }
}

/// Like [`merge_slot`] for lists with "not yet known" entries: an incoming list
/// of equal length may fill `None` entries but not contradict known ones.
fn merge_partial_slot<T: PartialEq + Clone + Debug>(
    field: &'static str,
    slot: &mut Option<Vec<Option<T>>>,
    incoming: Vec<Option<T>>,
) -> Result<(), ValidationError> {
    let Some(existing) = slot else {
        *slot = Some(incoming);
        return Ok(());
    };
    let compatible = existing.len() == incoming.len()
        && existing
            .iter()
            .zip(&incoming)
            .all(|(have, new)| have.is_none() || new.is_none() || have == new);
    if !compatible {
        return Err(ValidationError::Conflict {
            field,
            existing: format!("{existing:?}"),
            incoming: format!("{incoming:?}"),
        });
    }
    for (have, new) in existing.iter_mut().zip(incoming) {
        if have.is_none() {
            *have = new;
        }
    }
    Ok(())
}

macro_rules! slot_setters {
    ($($field:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $field(&mut self, value: $ty) -> Result<&mut Self, ValidationError> {
                merge_slot(stringify!($field), &mut self.$field, value)?;
                Ok(self)
            }
        )*
    };
}

/// Accumulates a [`Molrec`] stage by stage. Every field is a named slot that
/// may be set repeatedly only with the same value.
#[derive(Debug, Clone, Default)]
pub struct MolrecBuilder {
    domain: Option<Domain>,
    name: Option<String>,
    comment: Option<String>,
    provenance: Option<Provenance>,
    units: Option<Units>,
    input_units_to_au: Option<f64>,
    fix_com: Option<bool>,
    fix_orientation: Option<bool>,
    fix_symmetry: Option<String>,
    connectivity: Option<Vec<Bond>>,
    geom: Option<Vec<f64>>,
    geom_unsettled: Option<UnsettledGeometry>,
    elea: Option<Vec<i32>>,
    elez: Option<Vec<u32>>,
    elem: Option<Vec<String>>,
    mass: Option<Vec<f64>>,
    real: Option<Vec<bool>>,
    elbl: Option<Vec<String>>,
    fragment_separators: Option<Vec<usize>>,
    fragment_charges: Option<Vec<Option<f64>>>,
    fragment_multiplicities: Option<Vec<Option<f64>>>,
    molecular_charge: Option<f64>,
    molecular_multiplicity: Option<f64>,
    efp: Option<EfpHints>,
}

impl MolrecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    slot_setters! {
        domain: Domain,
        name: String,
        comment: String,
        provenance: Provenance,
        units: Units,
        input_units_to_au: f64,
        fix_com: bool,
        fix_orientation: bool,
        fix_symmetry: String,
        connectivity: Vec<Bond>,
        geom: Vec<f64>,
        geom_unsettled: UnsettledGeometry,
        elea: Vec<i32>,
        elez: Vec<u32>,
        elem: Vec<String>,
        mass: Vec<f64>,
        real: Vec<bool>,
        elbl: Vec<String>,
        fragment_separators: Vec<usize>,
        molecular_charge: f64,
        molecular_multiplicity: f64,
        efp: EfpHints,
    }

    pub fn fragment_charges(
        &mut self,
        value: Vec<Option<f64>>,
    ) -> Result<&mut Self, ValidationError> {
        merge_partial_slot("fragment_charges", &mut self.fragment_charges, value)?;
        Ok(self)
    }

    pub fn fragment_multiplicities(
        &mut self,
        value: Vec<Option<f64>>,
    ) -> Result<&mut Self, ValidationError> {
        merge_partial_slot(
            "fragment_multiplicities",
            &mut self.fragment_multiplicities,
            value,
        )?;
        Ok(self)
    }

    /// Per-fragment charges known so far, for stages that still need to solve them.
    pub fn pending_fragment_charges(&self) -> Option<&[Option<f64>]> {
        self.fragment_charges.as_deref()
    }

    pub fn build(self) -> Result<Molrec, ValidationError> {
        let elez = self.elez.ok_or(ValidationError::MissingField("elez"))?;
        let nat = elez.len();
        let elea = self.elea.ok_or(ValidationError::MissingField("elea"))?;
        let elem = self.elem.ok_or(ValidationError::MissingField("elem"))?;
        let mass = self.mass.ok_or(ValidationError::MissingField("mass"))?;
        let real = self.real.ok_or(ValidationError::MissingField("real"))?;
        let elbl = self.elbl.ok_or(ValidationError::MissingField("elbl"))?;
        for (what, len) in [
            ("elea", elea.len()),
            ("elem", elem.len()),
            ("mass", mass.len()),
            ("real", real.len()),
            ("elbl", elbl.len()),
        ] {
            if len != nat {
                return Err(ValidationError::ShapeMismatch {
                    what: format!("per-atom array '{what}'"),
                    expected: nat,
                    found: len,
                });
            }
        }

        let fragment_charges = self
            .fragment_charges
            .ok_or(ValidationError::MissingField("fragment_charges"))?
            .into_iter()
            .collect::<Option<Vec<f64>>>()
            .ok_or(ValidationError::MissingField("fragment_charges"))?;
        let fragment_multiplicities = self
            .fragment_multiplicities
            .ok_or(ValidationError::MissingField("fragment_multiplicities"))?
            .into_iter()
            .collect::<Option<Vec<f64>>>()
            .ok_or(ValidationError::MissingField("fragment_multiplicities"))?;

        Ok(Molrec {
            domain: self.domain.ok_or(ValidationError::MissingField("domain"))?,
            name: self.name,
            comment: self.comment,
            provenance: self
                .provenance
                .ok_or(ValidationError::MissingField("provenance"))?,
            units: self.units.ok_or(ValidationError::MissingField("units"))?,
            input_units_to_au: self.input_units_to_au,
            fix_com: self.fix_com.ok_or(ValidationError::MissingField("fix_com"))?,
            fix_orientation: self
                .fix_orientation
                .ok_or(ValidationError::MissingField("fix_orientation"))?,
            fix_symmetry: self.fix_symmetry,
            connectivity: self.connectivity,
            geom: self.geom.unwrap_or_default(),
            geom_unsettled: self.geom_unsettled,
            elea,
            elez,
            elem,
            mass,
            real,
            elbl,
            fragment_separators: self
                .fragment_separators
                .ok_or(ValidationError::MissingField("fragment_separators"))?,
            fragment_charges,
            fragment_multiplicities,
            molecular_charge: self
                .molecular_charge
                .ok_or(ValidationError::MissingField("molecular_charge"))?,
            molecular_multiplicity: self
                .molecular_multiplicity
                .ok_or(ValidationError::MissingField("molecular_multiplicity"))?,
            efp: self.efp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helium_builder() -> MolrecBuilder {
        let mut builder = MolrecBuilder::new();
        builder
            .domain(Domain::Qm)
            .unwrap()
            .provenance(Provenance::stamp("test"))
            .unwrap()
            .units(Units::Bohr)
            .unwrap()
            .fix_com(false)
            .unwrap()
            .fix_orientation(false)
            .unwrap()
            .geom(vec![0.0, 0.0, 0.0])
            .unwrap()
            .elea(vec![4])
            .unwrap()
            .elez(vec![2])
            .unwrap()
            .elem(vec!["He".to_string()])
            .unwrap()
            .mass(vec![4.00260325413])
            .unwrap()
            .real(vec![true])
            .unwrap()
            .elbl(vec![String::new()])
            .unwrap()
            .fragment_separators(vec![])
            .unwrap()
            .fragment_charges(vec![None])
            .unwrap()
            .fragment_multiplicities(vec![None])
            .unwrap();
        builder
    }

    #[test]
    fn equal_values_may_be_set_twice() {
        let mut builder = helium_builder();
        assert!(builder.units(Units::Bohr).is_ok());
        assert!(builder.elez(vec![2]).is_ok());
    }

    #[test]
    fn conflicting_values_are_reported_with_both_sides() {
        let mut builder = helium_builder();
        match builder.units(Units::Angstrom) {
            Err(ValidationError::Conflict {
                field,
                existing,
                incoming,
            }) => {
                assert_eq!(field, "units");
                assert_eq!(existing, "Bohr");
                assert_eq!(incoming, "Angstrom");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn partial_lists_fill_unknown_entries_only() {
        let mut builder = MolrecBuilder::new();
        builder.fragment_charges(vec![None, Some(1.0)]).unwrap();
        builder.fragment_charges(vec![Some(-1.0), Some(1.0)]).unwrap();
        assert_eq!(
            builder.pending_fragment_charges(),
            Some(&[Some(-1.0), Some(1.0)][..])
        );
        assert!(matches!(
            builder.fragment_charges(vec![Some(-1.0), Some(2.0)]),
            Err(ValidationError::Conflict { .. })
        ));
        assert!(builder.fragment_charges(vec![None]).is_err());
    }

    #[test]
    fn build_requires_resolved_charges() {
        let mut builder = helium_builder();
        assert!(matches!(
            builder.clone().build(),
            Err(ValidationError::MissingField("fragment_charges"))
        ));

        builder
            .fragment_charges(vec![Some(0.0)])
            .unwrap()
            .fragment_multiplicities(vec![Some(1.0)])
            .unwrap();
        assert!(matches!(
            builder.clone().build(),
            Err(ValidationError::MissingField("molecular_charge"))
        ));

        builder
            .molecular_charge(0.0)
            .unwrap()
            .molecular_multiplicity(1.0)
            .unwrap();
        let rec = builder.build().unwrap();
        assert_eq!(rec.nat(), 1);
        assert_eq!(rec.fragment_charges, vec![0.0]);
        assert!(rec.fix_symmetry.is_none());
    }

    #[test]
    fn build_rejects_ragged_atom_arrays() {
        let mut builder = helium_builder();
        builder
            .molecular_charge(0.0)
            .unwrap()
            .molecular_multiplicity(1.0)
            .unwrap();
        let mut ragged = builder.clone();
        ragged.mass = Some(vec![]);
        assert!(matches!(
            ragged.build(),
            Err(ValidationError::ShapeMismatch { .. })
        ));
    }
}
