//! Layered CLI settings
//!
//! Built-in defaults, then the settings file, then `VESPER_*`
//! environment variables (`__` separates nested keys, e.g.
//! `VESPER_USER__ATTESTER_ID`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vesper_core::UserConfig;
use vesper_prover::ProverConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the user state is persisted
    pub store_path: PathBuf,

    /// Attester, epoch length and circuit constants
    pub user: UserConfig,

    /// Proving backend
    pub prover: ProverConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(".vesper/state.json"),
            user: UserConfig::default(),
            prover: ProverConfig::default(),
        }
    }
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let base = Settings {
            prover: ProverConfig::from_env(),
            ..Default::default()
        };

        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("vesper").required(false),
        };

        let settings: Settings = config::Config::builder()
            .add_source(config::Config::try_from(&base)?)
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix("VESPER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("failed to load settings")?
            .try_deserialize()
            .context("invalid settings")?;

        settings.user.validate()?;
        Ok(settings)
    }
}
