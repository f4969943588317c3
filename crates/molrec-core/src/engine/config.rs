use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration in '{path}': {source}")]
    Invalid { path: String, source: ConfigError },
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigLoadError::Toml {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

/// What to return when an enabled domain has no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// A fully valid but empty record.
    #[serde(rename = "minimal")]
    Minimal,
    /// No record at all.
    #[serde(rename = "none")]
    Omit,
    #[default]
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Interpret `elbl` as a full nucleus label rather than a bare user tag.
    pub speclabel: bool,
    /// Accept any mass number ≥ 1 and any mass > 0.5 for an element.
    pub nonphysical: bool,
    /// Tolerance when matching a mass to a tabulated isotope.
    pub mtol: f64,
    /// Minimum interatomic distance, in input units.
    pub tooclose: f64,
    pub zero_ghost_fragments: bool,
    pub missing_enabled_return: MissingPolicy,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            speclabel: true,
            nonphysical: false,
            mtol: 1.0e-3,
            tooclose: 0.1,
            zero_ghost_fragments: false,
            missing_enabled_return: MissingPolicy::Error,
        }
    }
}

impl ValidationOptions {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let options: Self = read_toml(path)?;
        options.validate().map_err(|e| ConfigLoadError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mtol.is_finite() && self.mtol > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "mtol",
                reason: format!("must be positive, got {}", self.mtol),
            });
        }
        if !(self.tooclose.is_finite() && self.tooclose >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "tooclose",
                reason: format!("must be non-negative, got {}", self.tooclose),
            });
        }
        Ok(())
    }
}

/// Whether the two molecules are expected to superimpose exactly, or the RMSD
/// below which the search may stop early.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MolsAlign {
    Exact(bool),
    Threshold(f64),
}

impl Default for MolsAlign {
    fn default() -> Self {
        MolsAlign::Exact(false)
    }
}

impl MolsAlign {
    /// Convergence threshold in Ångström; zero disables early termination.
    pub fn convergence_threshold(&self) -> f64 {
        match *self {
            MolsAlign::Exact(true) => 1.0e-3,
            MolsAlign::Exact(false) => 0.0,
            MolsAlign::Threshold(t) => t,
        }
    }

    pub fn expects_exact_match(&self) -> bool {
        matches!(self, MolsAlign::Exact(true))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingAlgorithm {
    #[default]
    HungarianUno,
    Permutative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Atoms of reference and concern already correspond one to one.
    pub atoms_map: bool,
    /// Search orderings even when `atoms_map` is set.
    pub run_resorting: bool,
    pub mols_align: MolsAlign,
    /// Evaluate every candidate even after convergence.
    pub run_to_completion: bool,
    pub algorithm: OrderingAlgorithm,
    /// Reduced-cost cutoff for the zero-cost subgraph fed to matching enumeration.
    pub uno_cutoff: f64,
    /// Also try the mirror image of the concern geometry.
    pub run_mirror: bool,
    /// Wall-clock budget checked between candidates.
    pub timeout: Option<Duration>,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            atoms_map: false,
            run_resorting: false,
            mols_align: MolsAlign::default(),
            run_to_completion: false,
            algorithm: OrderingAlgorithm::HungarianUno,
            uno_cutoff: 1.0e-3,
            run_mirror: false,
            timeout: None,
        }
    }
}

impl AlignmentConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let config: Self = read_toml(path)?;
        config.validate().map_err(|e| ConfigLoadError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.uno_cutoff.is_finite() && self.uno_cutoff > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "uno_cutoff",
                reason: format!("must be positive, got {}", self.uno_cutoff),
            });
        }
        if let MolsAlign::Threshold(t) = self.mols_align {
            if !(t.is_finite() && t >= 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name: "mols_align",
                    reason: format!("threshold must be non-negative, got {t}"),
                });
            }
        }
        Ok(())
    }

    /// Whether the ordering search runs at all.
    pub fn resorts(&self) -> bool {
        self.run_resorting || !self.atoms_map
    }
}

#[derive(Default)]
pub struct AlignmentConfigBuilder {
    atoms_map: Option<bool>,
    run_resorting: Option<bool>,
    mols_align: Option<MolsAlign>,
    run_to_completion: Option<bool>,
    algorithm: Option<OrderingAlgorithm>,
    uno_cutoff: Option<f64>,
    run_mirror: Option<bool>,
    timeout: Option<Duration>,
}

impl AlignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atoms_map(mut self, value: bool) -> Self {
        self.atoms_map = Some(value);
        self
    }
    pub fn run_resorting(mut self, value: bool) -> Self {
        self.run_resorting = Some(value);
        self
    }
    pub fn mols_align(mut self, value: MolsAlign) -> Self {
        self.mols_align = Some(value);
        self
    }
    pub fn run_to_completion(mut self, value: bool) -> Self {
        self.run_to_completion = Some(value);
        self
    }
    pub fn algorithm(mut self, value: OrderingAlgorithm) -> Self {
        self.algorithm = Some(value);
        self
    }
    pub fn uno_cutoff(mut self, value: f64) -> Self {
        self.uno_cutoff = Some(value);
        self
    }
    pub fn run_mirror(mut self, value: bool) -> Self {
        self.run_mirror = Some(value);
        self
    }
    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    pub fn build(self) -> Result<AlignmentConfig, ConfigError> {
        let defaults = AlignmentConfig::default();
        let config = AlignmentConfig {
            atoms_map: self.atoms_map.unwrap_or(defaults.atoms_map),
            run_resorting: self.run_resorting.unwrap_or(defaults.run_resorting),
            mols_align: self.mols_align.unwrap_or(defaults.mols_align),
            run_to_completion: self.run_to_completion.unwrap_or(defaults.run_to_completion),
            algorithm: self.algorithm.unwrap_or(defaults.algorithm),
            uno_cutoff: self.uno_cutoff.unwrap_or(defaults.uno_cutoff),
            run_mirror: self.run_mirror.unwrap_or(defaults.run_mirror),
            timeout: self.timeout.or(defaults.timeout),
        };
        config.validate()?;
        Ok(config)
    }
}
