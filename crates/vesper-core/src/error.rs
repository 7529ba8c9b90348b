//! Error types for Vesper

use thiserror::Error;

/// Main error type for Vesper operations
#[derive(Error, Debug)]
pub enum VesperError {
    #[error("No data in the attestation")]
    EmptyAttestation,

    #[error("Field index {index} out of range (field count {field_count})")]
    FieldOutOfRange { index: usize, field_count: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Epoch key nonce {nonce} out of range (max {max})")]
    InvalidEpochKeyNonce { nonce: u8, max: u8 },

    #[error("Proof generation failed: {0}")]
    ProofGenerationFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for VesperError {
    fn from(err: serde_json::Error) -> Self {
        VesperError::Serialization(err.to_string())
    }
}
