//! Prover backend selection
//!
//! Supports two backends:
//! - Mock: for development and testing
//! - Snarkjs: Groth16 proving through the snarkjs toolchain
//!
//! # Usage
//!
//! ```rust,ignore
//! use vesper_prover::backend::{ProverBackend, ProverConfig};
//!
//! // Development mode (default)
//! let prover = ProverBackend::from_config(ProverConfig::default())?;
//!
//! // Real proofs
//! let prover = ProverBackend::from_config(
//!     ProverConfig::default().with_snarkjs("/usr/local/bin/snarkjs".into(), "./zk".into()),
//! )?;
//! ```

use async_trait::async_trait;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::path::PathBuf;
use vesper_core::{FieldElement, SnarkProof};
use vesper_crypto::{state_tree_leaf, MerkleWitness};

use crate::circuit::Circuit;
use crate::inputs::CircuitInputs;
use crate::prover::{ProofOutput, Prover, ProverError};
use crate::snarkjs::SnarkjsProver;

/// Prover backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Backend type: "mock" or "snarkjs"
    pub backend: String,

    /// Path to the snarkjs executable
    pub snarkjs_path: Option<PathBuf>,

    /// Directory holding `<circuit>.wasm`, `.zkey` and `.vkey.json`
    pub circuits_path: Option<PathBuf>,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            backend: "mock".to_string(),
            snarkjs_path: None,
            circuits_path: None,
        }
    }
}

impl ProverConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        Self {
            backend: std::env::var("VESPER_PROVER_BACKEND").unwrap_or_else(|_| "mock".to_string()),
            snarkjs_path: std::env::var("SNARKJS_PATH").ok().map(PathBuf::from),
            circuits_path: std::env::var("VESPER_CIRCUITS_PATH")
                .ok()
                .map(PathBuf::from),
        }
    }

    /// Use the snarkjs backend
    pub fn with_snarkjs(mut self, snarkjs_path: PathBuf, circuits_path: PathBuf) -> Self {
        self.backend = "snarkjs".to_string();
        self.snarkjs_path = Some(snarkjs_path);
        self.circuits_path = Some(circuits_path);
        self
    }
}

/// Mock prover for development.
///
/// Recomputes the state-tree root from the private inputs, exposes it
/// with the claim vector, attester and epoch as public signals, and
/// binds a deterministic proof to those signals.
#[derive(Debug, Clone, Default)]
pub struct MockProver;

impl MockProver {
    pub fn new() -> Self {
        Self
    }

    fn data_proof_signals(inputs: &CircuitInputs) -> Result<Vec<String>, ProverError> {
        let secret: FieldElement = scalar(inputs, "identity_secret")?
            .parse()
            .map_err(|_| ProverError::MalformedInputs("identity_secret".into()))?;
        let attester_id = scalar(inputs, "attester_id")?;
        let epoch: u64 = scalar(inputs, "epoch")?
            .parse()
            .map_err(|_| ProverError::MalformedInputs("epoch".into()))?;
        let data = parse_array(inputs, "data")?;

        let leaf = state_tree_leaf(&secret, attester_id, epoch, &data);
        let siblings = parse_array(inputs, "state_tree_elements")?
            .into_iter()
            .map(FieldElement::new)
            .collect::<Vec<_>>();
        let path_indices = parse_array(inputs, "state_tree_indexes")?
            .into_iter()
            .map(|i| i.to_u8().filter(|i| *i <= 1))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| ProverError::MalformedInputs("state_tree_indexes".into()))?;
        if siblings.len() != path_indices.len() {
            return Err(ProverError::MalformedInputs(
                "state tree path and siblings differ in length".into(),
            ));
        }

        let values = parse_array(inputs, "value")?;
        if values.len() != data.len() {
            return Err(ProverError::MalformedInputs(
                "value and data differ in length".into(),
            ));
        }

        let root = MerkleWitness {
            leaf,
            index: 0,
            path_indices,
            siblings,
        }
        .compute_root();

        let mut signals = Vec::with_capacity(values.len() + 3);
        signals.push(root.to_string());
        signals.extend(values.iter().map(|v| v.to_string()));
        signals.push(epoch.to_string());
        signals.push(attester_id.to_string());
        Ok(signals)
    }
}

fn scalar<'a>(inputs: &'a CircuitInputs, name: &str) -> Result<&'a str, ProverError> {
    inputs
        .scalar(name)
        .ok_or_else(|| ProverError::MalformedInputs(format!("{} must be a scalar", name)))
}

fn parse_array(inputs: &CircuitInputs, name: &str) -> Result<Vec<BigUint>, ProverError> {
    let values = inputs
        .array(name)
        .ok_or_else(|| ProverError::MalformedInputs(format!("{} must be an array", name)))?;
    values
        .iter()
        .map(|v| {
            BigUint::parse_bytes(v.as_bytes(), 10).ok_or_else(|| {
                ProverError::MalformedInputs(format!("{} holds a non-decimal value", name))
            })
        })
        .collect()
}

/// Deterministic proof bound to a circuit and its public signals
fn mock_proof(circuit: Circuit, public_signals: &[String]) -> SnarkProof {
    let mut hasher = Sha3_256::new();
    hasher.update(b"mock_groth16:");
    hasher.update(circuit.id().as_bytes());
    for signal in public_signals {
        hasher.update(signal.as_bytes());
        hasher.update([0u8]);
    }
    let seed: [u8; 32] = hasher.finalize().into();

    let element = |i: u8| {
        let mut h = Sha3_256::new();
        h.update(seed);
        h.update([i]);
        let digest: [u8; 32] = h.finalize().into();
        FieldElement::from_bytes_be(&digest).to_string()
    };

    SnarkProof {
        pi_a: vec![element(0), element(1), "1".to_string()],
        pi_b: vec![
            vec![element(2), element(3)],
            vec![element(4), element(5)],
            vec!["1".to_string(), "0".to_string()],
        ],
        pi_c: vec![element(6), element(7), "1".to_string()],
        protocol: "groth16".to_string(),
        curve: "bn128".to_string(),
    }
}

#[async_trait]
impl Prover for MockProver {
    async fn generate_proof(
        &self,
        circuit: Circuit,
        inputs: &CircuitInputs,
    ) -> Result<ProofOutput, ProverError> {
        let missing = inputs.missing(circuit);
        if !missing.is_empty() {
            return Err(ProverError::MalformedInputs(format!(
                "missing signals: {}",
                missing.join(", ")
            )));
        }

        let public_signals = match circuit {
            Circuit::DataProof => Self::data_proof_signals(inputs)?,
        };
        let proof = mock_proof(circuit, &public_signals);

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
        Ok(proof == &mock_proof(circuit, public_signals))
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Prover backend chosen at runtime
pub enum ProverBackend {
    Mock(MockProver),
    Snarkjs(SnarkjsProver),
}

impl Default for ProverBackend {
    fn default() -> Self {
        ProverBackend::Mock(MockProver::new())
    }
}

impl ProverBackend {
    /// Create from configuration
    pub fn from_config(config: ProverConfig) -> Result<Self, ProverError> {
        match config.backend.as_str() {
            "mock" => Ok(ProverBackend::Mock(MockProver::new())),
            "snarkjs" => {
                let circuits_path = config.circuits_path.ok_or_else(|| {
                    ProverError::ConfigError("circuits_path required for snarkjs backend".into())
                })?;
                let snarkjs_path = config
                    .snarkjs_path
                    .unwrap_or_else(|| PathBuf::from("snarkjs"));
                Ok(ProverBackend::Snarkjs(SnarkjsProver::new(
                    snarkjs_path,
                    circuits_path,
                )?))
            }
            other => Err(ProverError::ConfigError(format!(
                "Unknown backend: {}",
                other
            ))),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, ProverError> {
        Self::from_config(ProverConfig::from_env())
    }
}

#[async_trait]
impl Prover for ProverBackend {
    async fn generate_proof(
        &self,
        circuit: Circuit,
        inputs: &CircuitInputs,
    ) -> Result<ProofOutput, ProverError> {
        match self {
            ProverBackend::Mock(b) => b.generate_proof(circuit, inputs).await,
            ProverBackend::Snarkjs(b) => b.generate_proof(circuit, inputs).await,
        }
    }

    async fn verify_proof(
        &self,
        circuit: Circuit,
        public_signals: &[String],
        proof: &SnarkProof,
    ) -> Result<bool, ProverError> {
        match self {
            ProverBackend::Mock(b) => b.verify_proof(circuit, public_signals, proof).await,
            ProverBackend::Snarkjs(b) => b.verify_proof(circuit, public_signals, proof).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            ProverBackend::Mock(b) => b.name(),
            ProverBackend::Snarkjs(b) => b.name(),
        }
    }

    fn is_available(&self) -> bool {
        match self {
            ProverBackend::Mock(b) => b.is_available(),
            ProverBackend::Snarkjs(b) => b.is_available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::DataProofInputs;
    use vesper_crypto::{CommitmentTree, IncrementalMerkleTree};

    fn data_inputs() -> (CircuitInputs, FieldElement) {
        let secret = FieldElement::from_u64(11);
        let data = vec![BigUint::from(4u8), BigUint::from(0u8)];
        let leaf = state_tree_leaf(&secret, "1234", 1, &data);
        let mut tree = IncrementalMerkleTree::new(5);
        let index = tree.insert(leaf).unwrap();

        let inputs = DataProofInputs {
            identity_secret: secret,
            witness: tree.create_proof(index).unwrap(),
            data,
            epoch: 1,
            attester_id: FieldElement::from_u64(1234),
            values: vec![BigUint::from(2u8), BigUint::from(0u8)],
        };
        (inputs.to_circuit_inputs(), tree.root())
    }

    #[tokio::test]
    async fn test_mock_prove_and_verify() {
        let prover = MockProver::new();
        let (inputs, root) = data_inputs();

        let output = prover
            .generate_proof(Circuit::DataProof, &inputs)
            .await
            .unwrap();

        assert_eq!(output.public_signals[0], root.to_string());
        assert_eq!(&output.public_signals[1..3], &["2", "0"]);
        assert_eq!(&output.public_signals[3..], &["1", "1234"]);

        let valid = prover
            .verify_proof(Circuit::DataProof, &output.public_signals, &output.proof)
            .await
            .unwrap();
        assert!(valid);
    }

    #[tokio::test]
    async fn test_mock_rejects_tampered_signals() {
        let prover = MockProver::new();
        let (inputs, _) = data_inputs();
        let output = prover
            .generate_proof(Circuit::DataProof, &inputs)
            .await
            .unwrap();

        let mut signals = output.public_signals.clone();
        signals[1] = "999".to_string();
        let valid = prover
            .verify_proof(Circuit::DataProof, &signals, &output.proof)
            .await
            .unwrap();
        assert!(!valid);
    }

    #[tokio::test]
    async fn test_mock_rejects_missing_inputs() {
        let prover = MockProver::new();
        let mut inputs = CircuitInputs::new();
        inputs.insert_scalar("epoch", 0);

        let result = prover.generate_proof(Circuit::DataProof, &inputs).await;
        assert!(matches!(result, Err(ProverError::MalformedInputs(_))));
    }

    #[test]
    fn test_prover_backend_from_config() {
        let backend = ProverBackend::from_config(ProverConfig::default()).unwrap();
        assert_eq!(backend.name(), "mock");
        assert!(backend.is_available());

        let unknown = ProverConfig {
            backend: "plonk".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ProverBackend::from_config(unknown),
            Err(ProverError::ConfigError(_))
        ));
    }

    #[test]
    fn test_snarkjs_requires_circuits_path() {
        let config = ProverConfig {
            backend: "snarkjs".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ProverBackend::from_config(config),
            Err(ProverError::ConfigError(_))
        ));
    }
}
