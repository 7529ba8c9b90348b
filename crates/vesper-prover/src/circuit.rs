//! Circuit definitions and metadata

use serde::{Deserialize, Serialize};

/// Circuits the client can request proofs for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Circuit {
    /// Proves properties of the user's committed data at an epoch
    DataProof,
}

impl Circuit {
    /// Circuit identifier, also the artifact file stem
    pub fn id(&self) -> &'static str {
        match self {
            Circuit::DataProof => "dataProof",
        }
    }

    /// Parse from identifier
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "dataProof" => Some(Circuit::DataProof),
            _ => None,
        }
    }

    /// Input signals the circuit expects
    pub fn required_inputs(&self) -> &'static [&'static str] {
        match self {
            Circuit::DataProof => &[
                "identity_secret",
                "state_tree_indexes",
                "state_tree_elements",
                "data",
                "epoch",
                "attester_id",
                "value",
            ],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Circuit::DataProof => "Proves committed data satisfies a claim vector at an epoch",
        }
    }
}

impl std::fmt::Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
