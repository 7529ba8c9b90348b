//! Hash functions for Vesper
//!
//! Provides SHA3-256 and a field-valued hash with a Poseidon-shaped API.

use sha3::{Digest, Sha3_256};
use vesper_core::FieldElement;

/// Compute SHA3-256 hash
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash a sequence of field elements into a field element.
///
/// Arity is part of the input, so `[a]` and `[a, 0]` hash differently,
/// matching the fixed-arity Poseidon instances the circuits use.
pub fn hash_fields(inputs: &[FieldElement]) -> FieldElement {
    let mut hasher = Sha3_256::new();
    hasher.update(b"vesper:poseidon:");
    hasher.update((inputs.len() as u32).to_be_bytes());
    for input in inputs {
        hasher.update(input.to_bytes32());
    }
    let digest: [u8; 32] = hasher.finalize().into();
    FieldElement::from_bytes_be(&digest)
}

/// Hash of two field elements
pub fn hash_pair(a: &FieldElement, b: &FieldElement) -> FieldElement {
    hash_fields(&[a.clone(), b.clone()])
}
