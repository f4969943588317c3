use crate::core::models::molrec::{Provenance, Units};
use crate::engine::error::ValidationError;

/// Largest accepted relative departure of a units override from the physical factor.
const MAX_OVERRIDE_DEVIATION: f64 = 0.05;

/// Parses the length units and checks any conversion-factor override.
///
/// Returns the override only when one was supplied, so records that never
/// carried one do not grow one.
pub fn validate_units(
    units: Option<&str>,
    input_units_to_au: Option<f64>,
) -> Result<(Units, Option<f64>), ValidationError> {
    let units = match units {
        None => Units::Angstrom,
        Some(text) => Units::parse(text).ok_or_else(|| ValidationError::InvalidField {
            field: "units",
            reason: format!("'{text}' is not one of Angstrom, Bohr"),
        })?,
    };

    let Some(factor) = input_units_to_au else {
        return Ok((units, None));
    };
    let physical = units.to_bohr();
    if !factor.is_finite() || (factor - physical).abs() >= MAX_OVERRIDE_DEVIATION * physical {
        return Err(ValidationError::InvalidField {
            field: "input_units_to_au",
            reason: format!("{factor} departs too far from the physical value {physical}"),
        });
    }
    Ok((units, Some(factor)))
}

pub fn validate_provenance(provenance: &Provenance) -> Result<(), ValidationError> {
    if provenance.creator.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "provenance",
            reason: "creator must name the creating program".to_string(),
        });
    }
    if provenance.routine.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "provenance",
            reason: "routine must name the creating function".to_string(),
        });
    }
    if !is_pep440_version(&provenance.version) {
        return Err(ValidationError::InvalidField {
            field: "provenance",
            reason: format!("version '{}' is not a valid PEP 440 string", provenance.version),
        });
    }
    Ok(())
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat_if(&mut self, pred: impl Fn(u8) -> bool) -> bool {
        match self.peek() {
            Some(b) if pred(b) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while self.eat_if(|b| b.is_ascii_digit()) {}
        self.pos - start
    }

    fn separator(&mut self) -> bool {
        self.eat_if(|b| matches!(b, b'.' | b'-' | b'_'))
    }

    /// Consumes the longest of `words` found at the cursor.
    fn keyword(&mut self, words: &[&str]) -> bool {
        let rest = &self.bytes[self.pos..];
        let best = words
            .iter()
            .filter(|w| rest.starts_with(w.as_bytes()))
            .map(|w| w.len())
            .max();
        match best {
            Some(len) => {
                self.pos += len;
                true
            }
            None => false,
        }
    }

    /// Optional separator, keyword, optional separator and optional number.
    /// Leaves the cursor untouched when the keyword is absent.
    fn tagged_segment(&mut self, words: &[&str]) -> bool {
        let start = self.pos;
        self.separator();
        if !self.keyword(words) {
            self.pos = start;
            return false;
        }
        let before_number = self.pos;
        self.separator();
        if self.digits() == 0 {
            self.pos = before_number;
        }
        true
    }
}

/// Public version identifier check following the PEP 440 permissive grammar
/// (epoch, release, pre, post, dev and local segments with alternate spellings).
pub fn is_pep440_version(version: &str) -> bool {
    let lowered = version.trim().to_ascii_lowercase();
    let mut s = Scanner {
        bytes: lowered.as_bytes(),
        pos: 0,
    };
    s.eat_if(|b| b == b'v');

    let start = s.pos;
    if s.digits() > 0 && !s.eat_if(|b| b == b'!') {
        s.pos = start;
    }

    if s.digits() == 0 {
        return false;
    }
    loop {
        let before = s.pos;
        if !s.eat_if(|b| b == b'.') || s.digits() == 0 {
            s.pos = before;
            break;
        }
    }

    s.tagged_segment(&["a", "b", "c", "rc", "alpha", "beta", "pre", "preview"]);

    let before_post = s.pos;
    if !(s.eat_if(|b| b == b'-') && s.digits() > 0) {
        s.pos = before_post;
        s.tagged_segment(&["post", "rev", "r"]);
    }

    s.tagged_segment(&["dev"]);

    if s.eat_if(|b| b == b'+') {
        loop {
            let start = s.pos;
            while s.eat_if(|b| b.is_ascii_alphanumeric()) {}
            if s.pos == start {
                return false;
            }
            if !s.separator() {
                break;
            }
        }
    }

    s.pos == s.bytes.len()
}
