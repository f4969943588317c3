use crate::core::models::molrec::Bond;
use crate::engine::error::ValidationError;

const MAX_BOND_ORDER: f64 = 5.0;

/// Canonicalizes `(atom, atom, order)` triples: lower index first, sorted by
/// the first index with ties kept in input order.
pub fn validate_connectivity(triples: &[(i64, i64, f64)]) -> Result<Vec<Bond>, ValidationError> {
    let mut bonds = Vec::with_capacity(triples.len());
    for &(a, b, order) in triples {
        let a = usize::try_from(a).map_err(|_| ValidationError::InvalidField {
            field: "connectivity",
            reason: format!("first atom should be an index in [0, nat): {a}"),
        })?;
        let b = usize::try_from(b).map_err(|_| ValidationError::InvalidField {
            field: "connectivity",
            reason: format!("second atom should be an index in [0, nat): {b}"),
        })?;
        if !(0.0..=MAX_BOND_ORDER).contains(&order) {
            return Err(ValidationError::InvalidField {
                field: "connectivity",
                reason: format!("bond order should be in [0, {MAX_BOND_ORDER}]: {order}"),
            });
        }
        bonds.push(Bond {
            atom_a: a.min(b),
            atom_b: a.max(b),
            order,
        });
    }
    bonds.sort_by_key(|bond| bond.atom_a);
    Ok(bonds)
}
