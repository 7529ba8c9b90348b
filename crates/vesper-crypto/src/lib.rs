//! Vesper Crypto
//!
//! Identity, commitment hashing and the state tree used by Vesper.
//! The hash is a SHA3-based stand-in reduced into the SNARK scalar field;
//! circuits use their native Poseidon.

pub mod commitment;
pub mod hash;
pub mod identity;
pub mod merkle;

pub use commitment::{attester_field, epoch_key, state_tree_leaf};
pub use hash::{hash_fields, hash_pair, sha3_256};
pub use identity::{Identity, IdentityError};
pub use merkle::{CommitmentTree, IncrementalMerkleTree, MerkleWitness, TreeError};
