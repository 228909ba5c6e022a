// crates/xbe-harness/src/config/file.rs
// ============================================================================
// Module: Harness Config File
// Description: Optional TOML file backing environment configuration.
// Purpose: Let shared environments pin fixture IDs and defaults in one place.
// Dependencies: serde, toml
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted config file size.
const MAX_CONFIG_BYTES: u64 = 256 * 1024;

// ============================================================================
// SECTION: File Schema
// ============================================================================

/// On-disk harness configuration. Every key is optional.
///
/// ```toml
/// xbe_bin = "xbe"
/// base_url = "https://staging.example.com"
/// timeout_sec = 60
///
/// [fixtures]
/// broker = "123"
/// trucker = "456"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// CLI command.
    #[serde(default)]
    pub xbe_bin: Option<String>,
    /// API base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-invocation timeout in seconds.
    #[serde(default)]
    pub timeout_sec: Option<u64>,
    /// Artifact directory.
    #[serde(default)]
    pub run_root: Option<PathBuf>,
    /// Fixture IDs keyed by fixture slug.
    #[serde(default)]
    pub fixtures: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the file is missing, too large,
    /// or not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let metadata = fs::metadata(path).map_err(|err| {
            HarnessError::Config(format!("config file {}: {err}", path.display()))
        })?;
        if metadata.len() > MAX_CONFIG_BYTES {
            return Err(HarnessError::Config(format!(
                "config file {} exceeds {MAX_CONFIG_BYTES} bytes",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path).map_err(|err| {
            HarnessError::Config(format!("config file {}: {err}", path.display()))
        })?;
        Self::parse(&contents)
            .map_err(|err| HarnessError::Config(format!("config file {}: {err}", path.display())))
    }

    /// Parses config file contents.
    ///
    /// # Errors
    ///
    /// Returns the TOML error message when parsing fails.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let mut file: Self = toml::from_str(contents).map_err(|err| err.to_string())?;
        file.fixtures.retain(|_, id| !id.trim().is_empty());
        Ok(file)
    }
}
