//! Vesper Prover
//!
//! Groth16 prover/verifier integration for Vesper.
//! This crate defines the prover capability the user state talks to,
//! the circuits it knows about, and the backends that implement it.

pub mod backend;
pub mod circuit;
pub mod data_proof;
pub mod inputs;
pub mod prover;
pub mod snarkjs;

pub use backend::{MockProver, ProverBackend, ProverConfig};
pub use circuit::Circuit;
pub use data_proof::DataProof;
pub use inputs::{CircuitInputs, DataProofInputs, InputValue};
pub use prover::{ProofOutput, Prover, ProverError};
pub use snarkjs::SnarkjsProver;
