use super::data::{DEFAULT_ISOTOPES, EXTRA_ISOTOPES};
use super::symbols;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ElementError {
    #[error("Not an element symbol: '{0}'")]
    UnknownSymbol(String),
    #[error("Not an atomic number: {0}")]
    UnknownAtomicNumber(i64),
    #[error("Isotope {symbol}{mass_number} is not tabulated")]
    UnknownIsotope { symbol: String, mass_number: i64 },
}

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Inconsistent nuclide table '{path}': {reason}")]
    Inconsistent { path: String, reason: String },
}

/// Lookup capability over element and isotope data.
///
/// Atomic and mass numbers are taken as `i64` so that out-of-range user input
/// surfaces as an [`ElementError`] rather than a conversion failure at the call site.
pub trait PeriodicTable: Send + Sync {
    /// Resolves a symbol to its atomic number. When `strict` is false, a trailing
    /// non-alphabetic suffix (`"C13"`, `"he_a"`) is ignored.
    fn to_z(&self, symbol: &str, strict: bool) -> Result<u32, ElementError>;

    fn to_e(&self, z: i64) -> Result<&str, ElementError>;

    /// Mass number of the element's default isotope.
    fn to_a(&self, z: i64) -> Result<u32, ElementError>;

    /// Mass of the element's default isotope.
    fn to_mass(&self, z: i64) -> Result<f64, ElementError>;

    fn isotopes(&self, z: i64) -> Result<&BTreeMap<u32, f64>, ElementError>;

    fn isotope_mass(&self, symbol: &str, mass_number: i64) -> Result<f64, ElementError> {
        let z = self.to_z(symbol, true)?;
        let isotopes = self.isotopes(i64::from(z))?;
        u32::try_from(mass_number)
            .ok()
            .and_then(|a| isotopes.get(&a).copied())
            .ok_or_else(|| ElementError::UnknownIsotope {
                symbol: symbols::canonical_case(symbol),
                mass_number,
            })
    }

    fn mass_number_range(&self, z: i64) -> Result<(u32, u32), ElementError> {
        let isotopes = self.isotopes(z)?;
        match (isotopes.keys().next(), isotopes.keys().next_back()) {
            (Some(&lo), Some(&hi)) => Ok((lo, hi)),
            _ => Err(ElementError::UnknownAtomicNumber(z)),
        }
    }

    fn mass_range(&self, z: i64) -> Result<(f64, f64), ElementError> {
        self.isotopes(z)?
            .values()
            .fold(None, |acc: Option<(f64, f64)>, &m| match acc {
                None => Some((m, m)),
                Some((lo, hi)) => Some((lo.min(m), hi.max(m))),
            })
            .ok_or(ElementError::UnknownAtomicNumber(z))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ElementEntry {
    symbol: String,
    default_mass_number: u32,
    isotopes: BTreeMap<u32, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NuclideTable {
    elements: BTreeMap<u32, ElementEntry>,
    atomic_numbers: HashMap<String, u32>,
}

#[derive(Debug, Deserialize)]
struct NuclideRecord {
    symbol: String,
    z: u32,
    mass_number: u32,
    mass: f64,
    #[serde(default)]
    dominant: bool,
}

static BUILTIN: Lazy<NuclideTable> = Lazy::new(NuclideTable::from_builtin_data);

impl NuclideTable {
    /// The process-wide table compiled into the library.
    pub fn builtin() -> &'static NuclideTable {
        &BUILTIN
    }

    fn from_builtin_data() -> Self {
        let mut elements = BTreeMap::new();
        for (idx, (&symbol, &(a, mass))) in symbols::SYMBOLS
            .iter()
            .zip(DEFAULT_ISOTOPES.iter())
            .enumerate()
        {
            let mut isotopes = BTreeMap::new();
            isotopes.insert(a, mass);
            elements.insert(
                idx as u32 + 1,
                ElementEntry {
                    symbol: symbol.to_string(),
                    default_mass_number: a,
                    isotopes,
                },
            );
        }
        for &(z, a, mass) in EXTRA_ISOTOPES {
            if let Some(entry) = elements.get_mut(&z) {
                entry.isotopes.insert(a, mass);
            }
        }
        Self::index(elements)
    }

    fn index(elements: BTreeMap<u32, ElementEntry>) -> Self {
        let atomic_numbers = elements
            .iter()
            .map(|(&z, entry)| (entry.symbol.to_ascii_lowercase(), z))
            .collect();
        Self {
            elements,
            atomic_numbers,
        }
    }

    /// Reads a table from CSV with the header `symbol,z,mass_number,mass,dominant`.
    /// Every element needs exactly one row flagged `dominant`.
    pub fn load(path: &Path) -> Result<Self, TableLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path).map_err(|e| TableLoadError::Csv {
            path: path_str.clone(),
            source: e,
        })?;

        let inconsistent = |reason: String| TableLoadError::Inconsistent {
            path: path_str.clone(),
            reason,
        };

        let mut elements: BTreeMap<u32, ElementEntry> = BTreeMap::new();
        let mut defaults: BTreeMap<u32, u32> = BTreeMap::new();
        for result in reader.deserialize::<NuclideRecord>() {
            let record = result.map_err(|e| TableLoadError::Csv {
                path: path_str.clone(),
                source: e,
            })?;
            let symbol = symbols::canonical_case(&record.symbol);
            if record.z == 0 || symbol.is_empty() {
                return Err(inconsistent(format!(
                    "invalid element row '{}' (Z={})",
                    record.symbol, record.z
                )));
            }

            let entry = elements.entry(record.z).or_insert_with(|| ElementEntry {
                symbol: symbol.clone(),
                default_mass_number: record.mass_number,
                isotopes: BTreeMap::new(),
            });
            if entry.symbol != symbol {
                return Err(inconsistent(format!(
                    "Z={} listed as both '{}' and '{}'",
                    record.z, entry.symbol, symbol
                )));
            }
            entry.isotopes.insert(record.mass_number, record.mass);

            if record.dominant {
                if let Some(previous) = defaults.insert(record.z, record.mass_number) {
                    if previous != record.mass_number {
                        return Err(inconsistent(format!(
                            "{} has two dominant isotopes ({} and {})",
                            symbol, previous, record.mass_number
                        )));
                    }
                }
                entry.default_mass_number = record.mass_number;
            }
        }

        for (z, entry) in &elements {
            if !defaults.contains_key(z) {
                return Err(inconsistent(format!(
                    "{} has no dominant isotope",
                    entry.symbol
                )));
            }
        }

        let table = Self::index(elements);
        if table.atomic_numbers.len() != table.elements.len() {
            return Err(inconsistent(
                "a symbol is assigned to more than one atomic number".to_string(),
            ));
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn entry(&self, z: i64) -> Result<&ElementEntry, ElementError> {
        u32::try_from(z)
            .ok()
            .and_then(|z| self.elements.get(&z))
            .ok_or(ElementError::UnknownAtomicNumber(z))
    }
}

impl PeriodicTable for NuclideTable {
    fn to_z(&self, symbol: &str, strict: bool) -> Result<u32, ElementError> {
        let trimmed = symbol.trim();
        let token = if strict {
            trimmed
        } else {
            let end = trimmed
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(trimmed.len());
            &trimmed[..end]
        };
        self.atomic_numbers
            .get(&token.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| ElementError::UnknownSymbol(symbol.to_string()))
    }

    fn to_e(&self, z: i64) -> Result<&str, ElementError> {
        self.entry(z).map(|e| e.symbol.as_str())
    }

    fn to_a(&self, z: i64) -> Result<u32, ElementError> {
        self.entry(z).map(|e| e.default_mass_number)
    }

    fn to_mass(&self, z: i64) -> Result<f64, ElementError> {
        let entry = self.entry(z)?;
        entry
            .isotopes
            .get(&entry.default_mass_number)
            .copied()
            .ok_or(ElementError::UnknownAtomicNumber(z))
    }

    fn isotopes(&self, z: i64) -> Result<&BTreeMap<u32, f64>, ElementError> {
        self.entry(z).map(|e| &e.isotopes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn builtin_table_covers_every_element() {
        let table = NuclideTable::builtin();
        assert_eq!(table.len(), 118);
        for z in 1..=118 {
            let a = table.to_a(z).unwrap();
            let mass = table.to_mass(z).unwrap();
            assert_eq!(mass.round() as u32, a, "Z={z}");
        }
    }

    #[test]
    fn builtin_cobalt_defaults_to_cobalt_59() {
        let table = NuclideTable::builtin();
        assert_eq!(table.to_z("Co", true).unwrap(), 27);
        assert_eq!(table.to_e(27).unwrap(), "Co");
        assert_eq!(table.to_a(27).unwrap(), 59);
        assert!((table.to_mass(27).unwrap() - 58.93319429).abs() < 1e-8);
    }

    #[test]
    fn isotope_mass_finds_tabulated_isotopes() {
        let table = NuclideTable::builtin();
        let co60 = table.isotope_mass("co", 60).unwrap();
        assert!((co60 - 59.93381630).abs() < 1e-8);
        let deuterium = table.isotope_mass("H", 2).unwrap();
        assert!((deuterium - 2.01410177812).abs() < 1e-10);
    }

    #[test]
    fn isotope_mass_fails_for_untabulated_isotope() {
        let table = NuclideTable::builtin();
        let result = table.isotope_mass("Co", 80);
        assert!(matches!(
            result,
            Err(ElementError::UnknownIsotope { mass_number: 80, .. })
        ));
    }

    #[test]
    fn isotope_mass_fails_for_unknown_symbol() {
        let table = NuclideTable::builtin();
        assert!(matches!(
            table.isotope_mass("Qq", 1),
            Err(ElementError::UnknownSymbol(_))
        ));
    }

    #[test]
    fn to_z_strict_rejects_suffixes_that_lenient_mode_ignores() {
        let table = NuclideTable::builtin();
        assert!(table.to_z("C13", true).is_err());
        assert_eq!(table.to_z("C13", false).unwrap(), 6);
        assert_eq!(table.to_z("he_a", false).unwrap(), 2);
    }

    #[test]
    fn lookups_fail_for_out_of_range_atomic_numbers() {
        let table = NuclideTable::builtin();
        assert!(matches!(
            table.to_a(-27),
            Err(ElementError::UnknownAtomicNumber(-27))
        ));
        assert!(table.to_e(0).is_err());
        assert!(table.to_mass(119).is_err());
    }

    #[test]
    fn ranges_span_all_tabulated_isotopes() {
        let table = NuclideTable::builtin();
        assert_eq!(table.mass_number_range(27).unwrap(), (57, 61));
        let (lo, hi) = table.mass_range(27).unwrap();
        assert!((lo - 56.93629057).abs() < 1e-8);
        assert!((hi - 60.93247662).abs() < 1e-8);
        assert_eq!(table.mass_number_range(9).unwrap(), (19, 19));
    }

    #[test]
    fn load_succeeds_with_valid_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nuclides.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "symbol,z,mass_number,mass,dominant").unwrap();
        writeln!(file, "H,1,1,1.00782503207,true").unwrap();
        writeln!(file, "H,1,2,2.01410177812,false").unwrap();
        writeln!(file, "he,2,4,4.00260325413,true").unwrap();

        let table = NuclideTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.to_z("He", true).unwrap(), 2);
        assert_eq!(table.to_e(2).unwrap(), "He");
        assert_eq!(table.mass_number_range(1).unwrap(), (1, 2));
        assert!(table.to_e(3).is_err());
    }

    #[test]
    fn load_fails_for_missing_file() {
        let result = NuclideTable::load(Path::new("non_existent_nuclides.csv"));
        assert!(matches!(result, Err(TableLoadError::Csv { .. })));
    }

    #[test]
    fn load_fails_when_element_lacks_dominant_isotope() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nuclides.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "symbol,z,mass_number,mass,dominant").unwrap();
        writeln!(file, "H,1,1,1.00782503207,false").unwrap();

        let result = NuclideTable::load(&path);
        assert!(matches!(result, Err(TableLoadError::Inconsistent { .. })));
    }

    #[test]
    fn load_fails_when_atomic_number_has_two_symbols() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nuclides.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "symbol,z,mass_number,mass,dominant").unwrap();
        writeln!(file, "H,1,1,1.00782503207,true").unwrap();
        writeln!(file, "D,1,2,2.01410177812,false").unwrap();

        let result = NuclideTable::load(&path);
        assert!(matches!(result, Err(TableLoadError::Inconsistent { .. })));
    }
}
