use crate::engine::error::ValidationError;

/// Fragment boundaries plus per-fragment charge and multiplicity slots, where
/// `None` means "to be solved".
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentLayout {
    pub separators: Vec<usize>,
    pub charges: Vec<Option<f64>>,
    pub multiplicities: Vec<Option<f64>>,
}

impl FragmentLayout {
    pub fn nfragments(&self) -> usize {
        self.separators.len() + 1
    }
}

fn parse_separators(nat: usize, separators: &[i64]) -> Result<Vec<usize>, ValidationError> {
    let mut out = Vec::with_capacity(separators.len());
    let mut previous = 0usize;
    for &sep in separators {
        let sep = usize::try_from(sep).map_err(|_| {
            ValidationError::Fragmentation(format!(
                "fragment_separators {separators:?} contain a negative index"
            ))
        })?;
        if sep > nat {
            return Err(ValidationError::Fragmentation(format!(
                "fragment_separators {separators:?} run past the last of {nat} atoms"
            )));
        }
        if nat > 0 && (sep <= previous || sep == nat) {
            return Err(ValidationError::Fragmentation(format!(
                "fragment_separators {separators:?} yield empty or overlapping fragments, possibly unsorted"
            )));
        }
        previous = sep;
        out.push(sep);
    }
    Ok(out)
}

/// Checks fragment separators against the atom count and sizes the charge and
/// multiplicity lists. Scientific defaults are left to the charge/multiplicity solver.
pub fn validate_fragments(
    nat: usize,
    separators: Option<&[i64]>,
    charges: Option<&[Option<f64>]>,
    multiplicities: Option<&[Option<f64>]>,
) -> Result<FragmentLayout, ValidationError> {
    let Some(separators) = separators else {
        if charges.is_some() || multiplicities.is_some() {
            return Err(ValidationError::Fragmentation(format!(
                "fragment quantities given without separation info: charges ({charges:?}), multiplicities ({multiplicities:?})"
            )));
        }
        return Ok(FragmentLayout {
            separators: Vec::new(),
            charges: vec![None],
            multiplicities: vec![None],
        });
    };

    let separators = parse_separators(nat, separators)?;
    let nfr = separators.len() + 1;

    let charges = match charges {
        None => vec![None; nfr],
        Some(c) => {
            if c.iter().flatten().any(|q| !q.is_finite()) {
                return Err(ValidationError::Fragmentation(format!(
                    "fragment_charges not among None or finite numbers: {c:?}"
                )));
            }
            c.to_vec()
        }
    };
    let multiplicities = match multiplicities {
        None => vec![None; nfr],
        Some(m) => {
            if m.iter().flatten().any(|&x| !(x.is_finite() && x >= 1.0)) {
                return Err(ValidationError::Fragmentation(format!(
                    "fragment_multiplicities not among None or positive numbers: {m:?}"
                )));
            }
            m.to_vec()
        }
    };

    if charges.len() != nfr || multiplicities.len() != nfr {
        return Err(ValidationError::Fragmentation(format!(
            "dimension mismatch among fragment quantities: sep + 1 ({nfr}), charges ({}), multiplicities ({})",
            charges.len(),
            multiplicities.len()
        )));
    }

    Ok(FragmentLayout {
        separators,
        charges,
        multiplicities,
    })
}
