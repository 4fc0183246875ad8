//! Check configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::RecordFilter;

/// Default cap on findings kept in a report.
pub const DEFAULT_MAX_FINDINGS: usize = 1024;

/// Options shared by the record checks, the incremental check and the removal strategy.
///
/// Loadable from TOML; missing keys take their defaults:
///
/// ```toml
/// max_findings = 64
/// chain_visit_budget = 100000
/// detect_cycles = true
/// filter = "relationships_only"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckOptions {
    /// Findings kept in a report; later ones are only counted.
    pub max_findings: usize,
    /// Records a single chain walk may collect, unbounded when `None`.
    pub chain_visit_budget: Option<usize>,
    /// Whether relationship checks walk their chains looking for cycles.
    pub detect_cycles: bool,
    /// Record categories the checks resolve.
    pub filter: RecordFilter,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            max_findings: DEFAULT_MAX_FINDINGS,
            chain_visit_budget: None,
            detect_cycles: true,
            filter: RecordFilter::Everything,
        }
    }
}

impl CheckOptions {
    /// Sets the findings cap.
    pub fn max_findings(mut self, max_findings: usize) -> Self {
        self.max_findings = max_findings;
        self
    }

    /// Sets the chain visit budget.
    pub fn chain_visit_budget(mut self, budget: Option<usize>) -> Self {
        self.chain_visit_budget = budget;
        self
    }

    /// Enables or disables cycle detection.
    pub fn detect_cycles(mut self, detect: bool) -> Self {
        self.detect_cycles = detect;
        self
    }

    /// Sets the record filter.
    pub fn filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Parses options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let options: CheckOptions =
            toml::from_str(text).map_err(|source| ConfigError::ParseInline { source })?;
        options.validate()
    }

    /// Reads options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let options: CheckOptions = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        options.validate()
    }

    /// Reads options from `explicit`, or else from [`default_config_path`], falling back
    /// to defaults when the file does not exist.
    pub fn load_or_default(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        match explicit.or_else(default_config_path) {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.max_findings == 0 {
            return Err(ConfigError::Invalid {
                key: "max_findings",
                reason: "must be at least 1",
            });
        }
        if self.chain_visit_budget == Some(0) {
            return Err(ConfigError::Invalid {
                key: "chain_visit_budget",
                reason: "must be at least 1 when set",
            });
        }
        Ok(self)
    }
}

/// Location of the per-user config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("sombra").join("consistency.toml"))
}

/// Errors raised while loading [`CheckOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read check config {path}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`CheckOptions`].
    #[error("failed to parse check config {path}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },
    /// Inline text is not valid TOML for [`CheckOptions`].
    #[error("failed to parse check config: {source}")]
    ParseInline {
        /// Underlying parse error.
        source: toml::de::Error,
    },
    /// A value parsed but is out of range.
    #[error("invalid check config value for {key}: {reason}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}
