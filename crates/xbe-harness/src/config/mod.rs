// crates/xbe-harness/src/config/mod.rs
// ============================================================================
// Module: Harness Configuration
// Description: Centralized configuration for XBE conformance runs.
// Purpose: Provide typed access to environment settings, file values, and defaults.
// Dependencies: std, serde, toml, url
// ============================================================================

//! ## Overview
//! Harness configuration is read from environment variables, optionally
//! merged with a TOML file, and mapped into a typed structure shared by the
//! CLI runner, the API client, and the reporter.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod file;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::ConfigOverrides;
pub use env::DEFAULT_BASE_URL;
pub use env::DEFAULT_LOG_FILTER;
pub use env::DEFAULT_TIMEOUT;
pub use env::DEFAULT_XBE_BIN;
pub use env::HarnessConfig;
pub use env::HarnessEnv;
pub use env::read_env_strict;
pub use file::ConfigFile;
