//! Proof generation and verification commands

use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use vesper_core::{AttestationRequest, DataProofPayload};
use vesper_prover::DataProof;
use vesper_user::unix_now;

use super::{open_prover, open_user};
use crate::action;
use crate::settings::Settings;

/// Prove that the committed data satisfies `claims`
pub async fn prove(
    settings: &Settings,
    claims: AttestationRequest,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut user = open_user(settings)?;
    let now = unix_now();

    let payload = action::run("Generating data proof...", async {
        Ok::<_, anyhow::Error>(user.prove_data(&claims, now).await?)
    })
    .await?;

    let json = serde_json::to_string_pretty(&payload)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            print_outcome(payload.valid);
            println!("  Saved to: {}", path.display());
        }
        None => {
            println!("{}", json);
        }
    }
    Ok(())
}

/// Verify a previously generated proof payload
pub async fn verify(settings: &Settings, proof_file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(proof_file)
        .with_context(|| format!("failed to read {}", proof_file.display()))?;
    let payload: DataProofPayload = serde_json::from_str(&contents)?;
    let prover = open_prover(settings)?;

    let proof = DataProof::from(payload);
    let valid = action::run("Verifying proof...", async {
        Ok::<_, anyhow::Error>(proof.verify(prover.as_ref()).await?)
    })
    .await?;

    print_outcome(valid);
    println!("  Public signals: {}", proof.public_signals.len());
    if !valid {
        anyhow::bail!("proof did not verify");
    }
    Ok(())
}

fn print_outcome(valid: bool) {
    if valid {
        println!("{} Proof is valid", style("✓").green().bold());
    } else {
        println!("{} Proof is NOT valid", style("✗").red().bold());
    }
}
