use crate::core::models::molrec::{EfpHints, HintType};
use crate::engine::error::ValidationError;

/// Validates effective-fragment placement data: one fragment file, hint type and
/// hint vector per fragment. File names are lowercased.
pub fn validate_efp(
    fragment_files: &[String],
    hint_types: &[String],
    geom_hints: &[Vec<f64>],
) -> Result<EfpHints, ValidationError> {
    if fragment_files.len() != hint_types.len() || hint_types.len() != geom_hints.len() {
        return Err(ValidationError::ShapeMismatch {
            what: format!(
                "efp quantities: fragment_files ({}), hint_types ({}), geom_hints",
                fragment_files.len(),
                hint_types.len()
            ),
            expected: fragment_files.len(),
            found: geom_hints.len(),
        });
    }

    let types = hint_types
        .iter()
        .map(|t| {
            HintType::parse(t).ok_or_else(|| ValidationError::InvalidField {
                field: "hint_types",
                reason: format!("'{t}' not among 'xyzabc', 'points', 'rotmat'"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (ifr, (hint, htype)) in geom_hints.iter().zip(&types).enumerate() {
        if hint.len() != htype.hint_len() {
            return Err(ValidationError::ShapeMismatch {
                what: format!("geom_hints[{ifr}] of type {htype:?}"),
                expected: htype.hint_len(),
                found: hint.len(),
            });
        }
        if hint.iter().any(|x| !x.is_finite()) {
            return Err(ValidationError::InvalidField {
                field: "geom_hints",
                reason: format!("non-finite entry in geom_hints[{ifr}]: {hint:?}"),
            });
        }
    }

    Ok(EfpHints {
        fragment_files: fragment_files.iter().map(|f| f.to_lowercase()).collect(),
        hint_types: types,
        geom_hints: geom_hints.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn valid_hints_are_normalized() {
        let hints = validate_efp(
            &strings(&["H2O", "NH3"]),
            &strings(&["xyzabc", "points"]),
            &[vec![0.0; 6], vec![1.0; 9]],
        )
        .unwrap();
        assert_eq!(hints.fragment_files, strings(&["h2o", "nh3"]));
        assert_eq!(hints.hint_types, vec![HintType::Xyzabc, HintType::Points]);
    }

    #[test]
    fn unequal_list_lengths_are_rejected() {
        let result = validate_efp(&strings(&["h2o"]), &strings(&[]), &[]);
        assert!(matches!(result, Err(ValidationError::ShapeMismatch { .. })));
    }

    #[test]
    fn unknown_hint_type_is_rejected() {
        let result = validate_efp(&strings(&["h2o"]), &strings(&["euler"]), &[vec![0.0; 6]]);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidField {
                field: "hint_types",
                ..
            })
        ));
    }

    #[test]
    fn hint_length_must_match_type() {
        let result = validate_efp(&strings(&["h2o"]), &strings(&["rotmat"]), &[vec![0.0; 9]]);
        assert!(matches!(
            result,
            Err(ValidationError::ShapeMismatch {
                expected: 12,
                found: 9,
                ..
            })
        ));
    }

    #[test]
    fn empty_lists_form_an_empty_domain() {
        let hints = validate_efp(&[], &[], &[]).unwrap();
        assert!(hints.is_empty());
    }
}
