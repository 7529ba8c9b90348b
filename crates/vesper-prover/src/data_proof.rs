//! Data proof wrapper

use vesper_core::{DataProofPayload, SnarkProof};

use crate::circuit::Circuit;
use crate::prover::{ProofOutput, Prover, ProverError};

/// A generated data proof that can re-verify itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataProof {
    pub public_signals: Vec<String>,
    pub proof: SnarkProof,
}

impl DataProof {
    pub fn new(public_signals: Vec<String>, proof: SnarkProof) -> Self {
        Self {
            public_signals,
            proof,
        }
    }

    /// Verify against the data proof circuit's verification key
    pub async fn verify(&self, prover: &dyn Prover) -> Result<bool, ProverError> {
        prover
            .verify_proof(Circuit::DataProof, &self.public_signals, &self.proof)
            .await
    }

    /// Package with the verification outcome
    pub fn into_payload(self, valid: bool) -> DataProofPayload {
        DataProofPayload {
            public_signals: self.public_signals,
            proof: self.proof,
            valid,
        }
    }
}

impl From<ProofOutput> for DataProof {
    fn from(output: ProofOutput) -> Self {
        Self::new(output.public_signals, output.proof)
    }
}

impl From<DataProofPayload> for DataProof {
    fn from(payload: DataProofPayload) -> Self {
        Self::new(payload.public_signals, payload.proof)
    }
}
