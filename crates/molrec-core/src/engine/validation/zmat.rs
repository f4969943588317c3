use crate::core::models::molrec::UnsettledGeometry;
use crate::engine::error::ValidationError;
use std::collections::HashSet;

/// Line lengths that may follow a line of the given length.
fn allowed_successors(len: usize) -> &'static [usize] {
    match len {
        0 => &[2],
        2 => &[4],
        3 => &[3, 6],
        4 => &[6],
        6 => &[3, 6],
        _ => &[],
    }
}

fn zmat_error(reason: String) -> ValidationError {
    ValidationError::InvalidField {
        field: "geom_unsettled",
        reason,
    }
}

/// Positions within a line that hold a coordinate value rather than an anchor.
fn value_positions(len: usize) -> Vec<usize> {
    match len {
        3 => vec![0, 1, 2],
        _ => (1..len).step_by(2).collect(),
    }
}

/// Checks the lower-triangular shape of a mixed Cartesian / Z-matrix geometry
/// and that every symbolic value names a defined variable.
pub fn validate_unsettled_geometry(
    lines: Vec<Vec<String>>,
    variables: Vec<(String, f64)>,
) -> Result<UnsettledGeometry, ValidationError> {
    let lens: Vec<usize> = lines.iter().map(Vec::len).collect();
    let Some(&first) = lens.first() else {
        return Err(zmat_error("at least one line is required".to_string()));
    };
    if first != 0 && first != 3 {
        return Err(zmat_error(
            "first line must be Cartesian or a single atom".to_string(),
        ));
    }
    if lens.contains(&3) && !lens.iter().all(|&l| l == 3 || l == 6) {
        return Err(zmat_error(
            "Cartesian and Z-matrix lines may only mix once an absolute frame is established"
                .to_string(),
        ));
    }
    for (idx, pair) in lens.windows(2).enumerate() {
        let allowed = allowed_successors(pair[0]);
        if !allowed.contains(&pair[1]) {
            return Err(zmat_error(format!(
                "line {} of length {} may be followed by lengths {:?}, not {}",
                idx,
                pair[0],
                allowed,
                pair[1]
            )));
        }
    }

    let mut defined = HashSet::new();
    for (name, value) in &variables {
        if !value.is_finite() {
            return Err(ValidationError::InvalidField {
                field: "variables",
                reason: format!("'{name}' has non-finite value {value}"),
            });
        }
        defined.insert(name.as_str());
    }
    for (idx, line) in lines.iter().enumerate() {
        for pos in value_positions(line.len()) {
            let token = line[pos].trim();
            if token.parse::<f64>().is_ok() {
                continue;
            }
            let name = token.strip_prefix('-').unwrap_or(token);
            if !defined.contains(name) {
                return Err(ValidationError::InvalidField {
                    field: "variables",
                    reason: format!("line {idx} references undefined variable '{token}'"),
                });
            }
        }
    }

    Ok(UnsettledGeometry { lines, variables })
}
