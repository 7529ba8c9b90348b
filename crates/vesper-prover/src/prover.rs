//! Prover capability
//!
//! The user state never talks to a proving system directly; it goes
//! through this trait so backends can be swapped and mocked.

use async_trait::async_trait;
use thiserror::Error;
use vesper_core::{SnarkProof, VesperError};

use crate::circuit::Circuit;
use crate::inputs::CircuitInputs;

#[derive(Error, Debug)]
pub enum ProverError {
    #[error("Circuit artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Malformed circuit inputs: {0}")]
    MalformedInputs(String),

    #[error("Proof generation failed: {0}")]
    ProofGenerationFailed(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Backend not available: {0}")]
    NotAvailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProverError> for VesperError {
    fn from(err: ProverError) -> Self {
        VesperError::ProofGenerationFailed(err.to_string())
    }
}

/// Public signals and proof produced for a circuit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofOutput {
    pub public_signals: Vec<String>,
    pub proof: SnarkProof,
}

/// A proving system able to prove and verify named circuits
#[async_trait]
pub trait Prover: Send + Sync {
    /// Generate a proof. May take a long time.
    async fn generate_proof(
        &self,
        circuit: Circuit,
        inputs: &CircuitInputs,
    ) -> Result<ProofOutput, ProverError>;

    /// Verify a proof against the circuit's verification key.
    ///
    /// An invalid proof is `Ok(false)`; `Err` means verification could
    /// not be attempted.
    async fn verify_proof(
        &self,
        circuit: Circuit,
        public_signals: &[String],
        proof: &SnarkProof,
    ) -> Result<bool, ProverError>;

    /// Backend name
    fn name(&self) -> &str;

    /// Whether the backend can currently be used
    fn is_available(&self) -> bool;
}
