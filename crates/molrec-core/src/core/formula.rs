use itertools::Itertools;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("{0} is not a valid molecular formula")]
    Malformed(String),
    #[error("Unsupported molecular formula order: {0} (expected 'alphabetical' or 'hill')")]
    UnknownOrder(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormulaOrder {
    #[default]
    Alphabetical,
    /// Carbon first, then hydrogen, then the rest alphabetically; purely
    /// alphabetical when there is no carbon.
    Hill,
}

impl FromStr for FormulaOrder {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alphabetical" => Ok(Self::Alphabetical),
            "hill" => Ok(Self::Hill),
            _ => Err(FormulaError::UnknownOrder(s.to_string())),
        }
    }
}

/// Capitalizes the first letter and lowercases the rest.
fn title_case(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn format_counts(counts: &BTreeMap<String, usize>, order: FormulaOrder) -> String {
    let mut elements: Vec<&str> = counts.keys().map(String::as_str).collect();
    if order == FormulaOrder::Hill && counts.contains_key("C") {
        let rank = |e: &str| match e {
            "C" => 0,
            "H" => 1,
            _ => 2,
        };
        elements.sort_by_key(|e| rank(e));
    }
    elements
        .into_iter()
        .map(|e| match counts[e] {
            1 => e.to_string(),
            n => format!("{e}{n}"),
        })
        .join("")
}

/// Molecular formula of a list of element symbols. Symbols are case-normalized
/// before counting, so `"HE"` and `"he"` both count as helium.
pub fn molecular_formula_from_symbols<S: AsRef<str>>(symbols: &[S], order: FormulaOrder) -> String {
    let mut counts = BTreeMap::new();
    for symbol in symbols {
        *counts.entry(title_case(symbol.as_ref())).or_insert(0) += 1;
    }
    format_counts(&counts, order)
}

/// Reorders a formula such as `"CBrH3"`, merging repeated elements.
///
/// Each token must be an uppercase letter, optional lowercase letters and an
/// optional count.
pub fn order_molecular_formula(formula: &str, order: FormulaOrder) -> Result<String, FormulaError> {
    let malformed = || FormulaError::Malformed(formula.to_string());
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut chars = formula.chars().peekable();

    while let Some(first) = chars.next() {
        if !first.is_ascii_uppercase() {
            return Err(malformed());
        }
        let mut symbol = first.to_string();
        while let Some(c) = chars.next_if(char::is_ascii_lowercase) {
            symbol.push(c);
        }
        let mut digits = String::new();
        while let Some(d) = chars.next_if(char::is_ascii_digit) {
            digits.push(d);
        }
        let n = if digits.is_empty() {
            1
        } else {
            digits.parse::<usize>().map_err(|_| malformed())?
        };
        *counts.entry(symbol).or_insert(0) += n;
    }

    Ok(format_counts(&counts, order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorders_formulas() {
        let cases = [
            ("NH3", "H3N", "H3N"),
            ("CH4", "CH4", "CH4"),
            ("IBr", "BrI", "BrI"),
            ("CCl4", "CCl4", "CCl4"),
            ("CBr4", "Br4C", "CBr4"),
            ("CBrH3", "BrCH3", "CH3Br"),
        ];
        for (input, alphabetical, hill) in cases {
            assert_eq!(
                order_molecular_formula(input, FormulaOrder::Alphabetical).unwrap(),
                alphabetical
            );
            assert_eq!(order_molecular_formula(input, FormulaOrder::Hill).unwrap(), hill);
        }
    }

    #[test]
    fn merges_repeated_elements() {
        assert_eq!(
            order_molecular_formula("CH3CH2OH", FormulaOrder::Hill).unwrap(),
            "C2H6O"
        );
    }

    #[test]
    fn rejects_malformed_formulas_and_orders() {
        assert!(matches!(
            order_molecular_formula("ch4", FormulaOrder::Hill),
            Err(FormulaError::Malformed(_))
        ));
        assert!(order_molecular_formula("C2-H", FormulaOrder::Hill).is_err());
        assert_eq!(
            "disorder".parse::<FormulaOrder>(),
            Err(FormulaError::UnknownOrder("disorder".to_string()))
        );
        assert_eq!("HILL".parse::<FormulaOrder>(), Ok(FormulaOrder::Hill));
    }

    #[test]
    fn formula_from_symbols_normalizes_case() {
        let symbols = ["O", "h", "H", "HE"];
        assert_eq!(
            molecular_formula_from_symbols(&symbols, FormulaOrder::Alphabetical),
            "H2HeO"
        );
        assert_eq!(molecular_formula_from_symbols::<&str>(&[], FormulaOrder::Hill), "");
    }

    #[test]
    fn formula_round_trips_through_symbols() {
        let formula = order_molecular_formula("C6H5OH", FormulaOrder::Hill).unwrap();
        let symbols: Vec<String> = ["C"; 6]
            .into_iter()
            .chain(["H"; 6])
            .chain(["O"])
            .map(String::from)
            .collect();
        assert_eq!(molecular_formula_from_symbols(&symbols, FormulaOrder::Hill), formula);
        assert_eq!(order_molecular_formula(&formula, FormulaOrder::Hill).unwrap(), formula);
    }
}
