use crate::engine::error::ValidationError;

/// Resolved frame-fixing flags of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub fix_com: bool,
    pub fix_orientation: bool,
    pub fix_symmetry: Option<String>,
}

fn fixed_flag(
    field: &'static str,
    value: Option<bool>,
    external: bool,
) -> Result<bool, ValidationError> {
    match value {
        Some(true) => Ok(true),
        Some(false) if external => Err(ValidationError::InvalidField {
            field,
            reason: "cannot be unfixed for a molecule anchored by external fragments".to_string(),
        }),
        Some(false) => Ok(false),
        None => Ok(external),
    }
}

/// Resolves `fix_com`, `fix_orientation` and `fix_symmetry`.
///
/// An `external` molecule is positioned by pre-oriented fragment hints, so its
/// frame is fixed and its symmetry is trivial.
pub fn validate_frame(
    external: bool,
    fix_com: Option<bool>,
    fix_orientation: Option<bool>,
    fix_symmetry: Option<&str>,
) -> Result<Frame, ValidationError> {
    let fix_com = fixed_flag("fix_com", fix_com, external)?;
    let fix_orientation = fixed_flag("fix_orientation", fix_orientation, external)?;

    let fix_symmetry = if external {
        match fix_symmetry {
            None => Some("c1".to_string()),
            Some(sym) if sym.eq_ignore_ascii_case("c1") => Some("c1".to_string()),
            Some(sym) => {
                return Err(ValidationError::InvalidField {
                    field: "fix_symmetry",
                    reason: format!(
                        "'{sym}' requested, but only 'c1' is valid for a molecule anchored by external fragments"
                    ),
                });
            }
        }
    } else {
        fix_symmetry.map(str::to_lowercase)
    };

    Ok(Frame {
        fix_com,
        fix_orientation,
        fix_symmetry,
    })
}
