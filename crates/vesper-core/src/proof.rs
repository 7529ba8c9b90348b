//! Proof payload types
//!
//! Groth16 proofs and the payload handed back to callers after a data
//! proof request. All numbers are canonical decimal strings.

use serde::{Deserialize, Serialize};

/// A Groth16 proof in the JSON shape produced by snarkjs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnarkProof {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default = "default_curve")]
    pub curve: String,
}

fn default_protocol() -> String {
    "groth16".to_string()
}

fn default_curve() -> String {
    "bn128".to_string()
}

/// Result of a data proof request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProofPayload {
    /// Public signals of the circuit
    pub public_signals: Vec<String>,

    /// The proof itself
    pub proof: SnarkProof,

    /// Whether the proof verified against its public signals
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_preserves_large_integers() {
        let big = "21888242871839275222246405745257275088548364400416722507709233000001";
        let payload = DataProofPayload {
            public_signals: vec![big.to_string(), "0".to_string()],
            proof: SnarkProof {
                pi_a: vec![big.to_string(), "2".to_string(), "1".to_string()],
                pi_b: vec![
                    vec!["3".to_string(), "4".to_string()],
                    vec!["5".to_string(), "6".to_string()],
                    vec!["1".to_string(), "0".to_string()],
                ],
                pi_c: vec!["7".to_string(), "8".to_string(), "1".to_string()],
                protocol: default_protocol(),
                curve: default_curve(),
            },
            valid: true,
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("publicSignals"));
        let back: DataProofPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
        assert_eq!(back.public_signals[0], big);
    }

    #[test]
    fn test_proof_defaults_protocol_and_curve() {
        let proof: SnarkProof =
            serde_json::from_str(r#"{"pi_a":["1"],"pi_b":[["2"]],"pi_c":["3"]}"#).unwrap();
        assert_eq!(proof.protocol, "groth16");
        assert_eq!(proof.curve, "bn128");
    }
}
