//! Deployment configuration.
//!
//! ```toml
//! [limits.safe]
//! max_files = 100
//! max_lines = 5000
//!
//! [limits.hard]
//! max_files = 1000
//! max_lines = 50000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{budget::DiffLimits, Error, Result};

/// Settings shared by every render in a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Safe and hard render budgets.
    pub limits: DiffLimits,
}

impl Config {
    /// Parse configuration from TOML text; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the text is not valid TOML for this schema.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| Error::Config {
            path: origin.to_owned(),
            source,
        })?;
        config.check();
        Ok(config)
    }

    /// Load configuration from `path`, or the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and [`Error::Config`]
    /// when it cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("no configuration file, using defaults");
            return Ok(Self::default());
        };

        let origin = path.to_string_lossy().into_owned();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: origin.clone(),
            source,
        })?;
        debug!(path = %origin, "loaded configuration");
        Self::from_toml_str(&text, &origin)
    }

    fn check(&self) {
        let DiffLimits { safe, hard } = self.limits;
        if hard.max_files < safe.max_files || hard.max_lines < safe.max_lines {
            warn!(
                safe_files = safe.max_files,
                safe_lines = safe.max_lines,
                hard_files = hard.max_files,
                hard_lines = hard.max_lines,
                "hard diff budget is smaller than the safe budget"
            );
        }
    }
}
