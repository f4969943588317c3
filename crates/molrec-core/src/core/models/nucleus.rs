use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully resolved identity of one atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nucleus {
    /// Mass number, or [`Nucleus::UNKNOWN_MASS_NUMBER`] when the mass matches no tabulated nuclide.
    pub mass_number: i32,
    pub atomic_number: u32,
    pub symbol: String,
    pub mass: f64,
    pub real: bool,
    pub label: String,
}

impl Nucleus {
    pub const UNKNOWN_MASS_NUMBER: i32 = -1;

    #[inline]
    pub fn is_known_nuclide(&self) -> bool {
        self.mass_number != Self::UNKNOWN_MASS_NUMBER
    }

    /// Nuclear charge contributed to electron counting: zero for ghosts.
    #[inline]
    pub fn effective_charge(&self) -> f64 {
        if self.real {
            self.atomic_number as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for Nucleus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ghost = if self.real { "" } else { "@" };
        if self.is_known_nuclide() {
            write!(
                f,
                "{}{}{}{}@{:.8}",
                ghost, self.mass_number, self.symbol, self.label, self.mass
            )
        } else {
            write!(f, "{}{}{}@{:.8}", ghost, self.symbol, self.label, self.mass)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cobalt(mass_number: i32, real: bool) -> Nucleus {
        Nucleus {
            mass_number,
            atomic_number: 27,
            symbol: "Co".to_string(),
            mass: 58.93319429,
            real,
            label: "_a".to_string(),
        }
    }

    #[test]
    fn effective_charge_is_zero_for_ghosts() {
        assert_eq!(cobalt(59, true).effective_charge(), 27.0);
        assert_eq!(cobalt(59, false).effective_charge(), 0.0);
    }

    #[test]
    fn sentinel_mass_number_marks_unknown_nuclide() {
        assert!(cobalt(59, true).is_known_nuclide());
        assert!(!cobalt(-1, true).is_known_nuclide());
    }

    #[test]
    fn display_renders_compact_label() {
        assert_eq!(cobalt(59, true).to_string(), "59Co_a@58.93319429");
        assert_eq!(cobalt(-1, false).to_string(), "@Co_a@58.93319429");
    }
}
