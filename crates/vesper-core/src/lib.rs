//! Vesper Core
//!
//! Core domain types for the Vesper epoch attestation client.
//! This crate defines the data structures shared by the crypto,
//! prover and user-state crates.

pub mod attestation;
pub mod config;
pub mod error;
pub mod field;
pub mod proof;

pub use attestation::{AttestationRequest, AttestationValue};
pub use config::{ProtocolConfig, UserConfig};
pub use error::VesperError;
pub use field::{FieldElement, SNARK_SCALAR_FIELD_HEX};
pub use proof::{DataProofPayload, SnarkProof};
