//! CLI command implementations

pub mod proof;
pub mod status;
pub mod user;

use anyhow::{Context, Result};
use std::sync::Arc;
use vesper_prover::{Prover, ProverBackend};
use vesper_user::{FileStore, UserState};

use crate::settings::Settings;

/// Open the persisted user state described by `settings`
pub fn open_user(settings: &Settings) -> Result<UserState<FileStore>> {
    let store = FileStore::open(&settings.store_path)
        .with_context(|| format!("failed to open {}", settings.store_path.display()))?;
    let prover = open_prover(settings)?;
    Ok(UserState::load(settings.user.clone(), store, prover)?)
}

pub fn open_prover(settings: &Settings) -> Result<Arc<dyn Prover>> {
    let backend = ProverBackend::from_config(settings.prover.clone())?;
    tracing::debug!("Using {} prover", backend.name());
    Ok(Arc::new(backend))
}
