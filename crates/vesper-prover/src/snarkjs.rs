//! snarkjs Groth16 backend
//!
//! Requires snarkjs and the compiled circuit artifacts:
//! ```text
//! <circuits_path>/
//!   dataProof.wasm       witness generator
//!   dataProof.zkey       proving key
//!   dataProof.vkey.json  verification key
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;
use vesper_core::SnarkProof;

use crate::circuit::Circuit;
use crate::inputs::CircuitInputs;
use crate::prover::{ProofOutput, Prover, ProverError};

pub struct SnarkjsProver {
    snarkjs_path: PathBuf,
    circuits_path: PathBuf,
}

impl SnarkjsProver {
    pub fn new(snarkjs_path: PathBuf, circuits_path: PathBuf) -> Result<Self, ProverError> {
        if !circuits_path.is_dir() {
            return Err(ProverError::NotAvailable(format!(
                "circuit directory not found: {}",
                circuits_path.display()
            )));
        }

        Ok(Self {
            snarkjs_path,
            circuits_path,
        })
    }

    /// Path to a circuit artifact, which must exist
    fn artifact(&self, circuit: Circuit, extension: &str) -> Result<PathBuf, ProverError> {
        let path = self
            .circuits_path
            .join(format!("{}.{}", circuit.id(), extension));
        if !path.exists() {
            return Err(ProverError::ArtifactNotFound(path.display().to_string()));
        }
        Ok(path)
    }

    async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ProverError> {
        let json = serde_json::to_vec(value)
            .map_err(|e| ProverError::MalformedInputs(format!("serialization: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl Prover for SnarkjsProver {
    async fn generate_proof(
        &self,
        circuit: Circuit,
        inputs: &CircuitInputs,
    ) -> Result<ProofOutput, ProverError> {
        let wasm = self.artifact(circuit, "wasm")?;
        let zkey = self.artifact(circuit, "zkey")?;

        let missing = inputs.missing(circuit);
        if !missing.is_empty() {
            return Err(ProverError::MalformedInputs(format!(
                "missing signals: {}",
                missing.join(", ")
            )));
        }

        let start = Instant::now();
        let work_dir = tempfile::tempdir()?;
        let input_path = work_dir.path().join("input.json");
        let proof_path = work_dir.path().join("proof.json");
        let public_path = work_dir.path().join("public.json");

        Self::write_json(&input_path, inputs).await?;

        tracing::info!(
            "Invoking snarkjs groth16 fullprove for circuit '{}'",
            circuit.id()
        );

        let output = Command::new(&self.snarkjs_path)
            .arg("groth16")
            .arg("fullprove")
            .arg(&input_path)
            .arg(&wasm)
            .arg(&zkey)
            .arg(&proof_path)
            .arg(&public_path)
            .output()
            .await
            .map_err(|e| {
                ProverError::ProofGenerationFailed(format!("failed to execute snarkjs: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProverError::ProofGenerationFailed(format!(
                "snarkjs exited with {}: {}",
                output.status, stderr
            )));
        }

        let proof_bytes = tokio::fs::read(&proof_path).await?;
        let public_bytes = tokio::fs::read(&public_path).await?;
        let proof: SnarkProof = serde_json::from_slice(&proof_bytes)
            .map_err(|e| ProverError::ProofGenerationFailed(format!("proof.json: {}", e)))?;
        let public_signals: Vec<String> = serde_json::from_slice(&public_bytes)
            .map_err(|e| ProverError::ProofGenerationFailed(format!("public.json: {}", e)))?;

        tracing::info!(
            "snarkjs proof for '{}' completed in {}ms",
            circuit.id(),
            start.elapsed().as_millis()
        );

        Ok(ProofOutput {
            public_signals,
            proof,
        })
    }

    async fn verify_proof(
        &self,
        circuit: Circuit,
        public_signals: &[String],
        proof: &SnarkProof,
    ) -> Result<bool, ProverError> {
        let vkey = self.artifact(circuit, "vkey.json")?;

        let work_dir = tempfile::tempdir()?;
        let proof_path = work_dir.path().join("proof.json");
        let public_path = work_dir.path().join("public.json");
        Self::write_json(&proof_path, proof).await?;
        Self::write_json(&public_path, &public_signals).await?;

        let output = Command::new(&self.snarkjs_path)
            .arg("groth16")
            .arg("verify")
            .arg(&vkey)
            .arg(&public_path)
            .arg(&proof_path)
            .output()
            .await
            .map_err(|e| {
                ProverError::VerificationFailed(format!("failed to execute snarkjs: {}", e))
            })?;

        let valid = output.status.success();
        if !valid {
            tracing::warn!(
                "snarkjs rejected proof for '{}': {}",
                circuit.id(),
                String::from_utf8_lossy(&output.stdout).trim()
            );
        }
        Ok(valid)
    }

    fn name(&self) -> &str {
        "snarkjs"
    }

    fn is_available(&self) -> bool {
        self.circuits_path.is_dir()
    }
}
